//! Derive macro for `env_override_shared::EnvOverride`.
//!
//! The derive emits a `static` field table per type plus the write access the
//! override engine needs, so no field discovery happens at runtime.

use proc_macro::TokenStream;
use proc_macro2::{Literal, Span};
use quote::{ToTokens, quote};
use syn::{
    Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr, Path, PathArguments,
    Type,
};

/// Derive `env_override_shared::EnvOverride` and `FieldAccess`.
///
/// Field attributes:
/// - `#[env_override(required)]`: the field must be overridden in every pass.
/// - `#[env_override(parent)]`: the field embeds the parent type.
/// - `#[env_override(skip)]`: the field is not overridable.
/// - `#[env_override(rename = "name")]`: property name instead of the
///   camel-cased identifier.
///
/// Container attribute `#[env_override(clone_with = "path")]` replaces
/// `Clone::clone` with `fn(&Self) -> Result<Self, CloneFailure>`.
#[proc_macro_derive(EnvOverride, attributes(env_override))]
pub fn derive_env_override(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand_env_override(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand_env_override(input: &DeriveInput) -> Result<proc_macro2::TokenStream, syn::Error> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "EnvOverride cannot be derived for generic types",
        ));
    }
    let clone_with = parse_container_attrs(&input.attrs)?;
    let Data::Struct(struct_data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "EnvOverride can only be derived for structs",
        ));
    };

    let fields = match &struct_data.fields {
        Fields::Named(fields) => &fields.named,
        _ => {
            return Err(syn::Error::new_spanned(
                &struct_data.fields,
                "EnvOverride requires named fields",
            ));
        },
    };

    let mut parent: Option<(&Ident, &Type)> = None;
    let mut overridable = Vec::new();
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let options = parse_field_options(&field.attrs)?;
        match options.role {
            FieldRole::Skip => {},
            FieldRole::Parent => {
                if parent.is_some() {
                    return Err(syn::Error::new_spanned(
                        ident,
                        "only one field may be marked #[env_override(parent)]",
                    ));
                }
                if option_inner(&field.ty).is_some() {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "the embedded parent cannot be an Option",
                    ));
                }
                parent = Some((ident, &field.ty));
            },
            FieldRole::Value { required } => {
                let property = match options.rename {
                    Some(rename) => rename,
                    None => default_property(ident)?,
                };
                if overridable
                    .iter()
                    .any(|existing: &OverridableField<'_>| existing.property == property)
                {
                    return Err(syn::Error::new_spanned(
                        ident,
                        format!("duplicate override property `{property}`"),
                    ));
                }
                overridable.push(OverridableField {
                    ident,
                    ty: &field.ty,
                    property,
                    required,
                });
            },
        }
    }

    let shared = quote! { ::env_override_shared };
    let name = &input.ident;
    let type_name = LitStr::new(&name.to_string(), Span::call_site());
    let field_count = Literal::usize_unsuffixed(overridable.len());

    let descriptors = overridable.iter().map(|field| {
        let ty = field.ty;
        let property = LitStr::new(&field.property, Span::call_site());
        let rust_name = LitStr::new(&ident_name(field.ident), Span::call_site());
        let declared = LitStr::new(&type_display(ty), Span::call_site());
        let required = field.required;
        quote! {
            #shared::FieldDescriptor::new(
                #property,
                #rust_name,
                #declared,
                <#ty as #shared::FieldType>::KIND,
                <#ty as #shared::FieldType>::OPTIONAL,
                #required,
            )
        }
    });

    let setters = overridable.iter().map(|field| {
        let ident = field.ident;
        let ty = field.ty;
        let property = LitStr::new(&field.property, Span::call_site());
        quote! {
            #property => {
                self.#ident = <#ty as #shared::FieldType>::from_field_value(value)?;
                ::core::result::Result::Ok(())
            },
        }
    });

    let (parent_link, parent_access) = match parent {
        Some((ident, ty)) => {
            let field_name = LitStr::new(&ident_name(ident), Span::call_site());
            (
                quote! {
                    ::core::option::Option::Some(#shared::ParentLink::new(
                        #field_name,
                        <#ty as #shared::EnvOverride>::schema,
                    ))
                },
                quote! {
                    let parent: &mut dyn #shared::FieldAccess = &mut self.#ident;
                    ::core::option::Option::Some(parent)
                },
            )
        },
        None => (
            quote! { ::core::option::Option::None },
            quote! { ::core::option::Option::None },
        ),
    };

    let clone_body = clone_with.map_or_else(
        || quote! { ::core::result::Result::Ok(::core::clone::Clone::clone(self)) },
        |path| quote! { #path(self) },
    );

    Ok(quote! {
        impl #shared::FieldAccess for #name {
            fn type_schema(&self) -> &'static #shared::TypeSchema {
                <Self as #shared::EnvOverride>::schema()
            }

            fn set_own_field(
                &mut self,
                property: &str,
                value: ::core::option::Option<#shared::FieldValue>,
            ) -> ::core::result::Result<(), #shared::FieldAccessError> {
                match property {
                    #(#setters)*
                    _ => {
                        let _ = value;
                        ::core::result::Result::Err(
                            #shared::FieldAccessError::unknown_field(#type_name, property),
                        )
                    },
                }
            }

            fn parent_mut(&mut self) -> ::core::option::Option<&mut dyn #shared::FieldAccess> {
                #parent_access
            }
        }

        impl #shared::EnvOverride for #name {
            fn schema() -> &'static #shared::TypeSchema {
                static FIELDS: [#shared::FieldDescriptor; #field_count] = [#(#descriptors),*];
                static SCHEMA: #shared::TypeSchema =
                    #shared::TypeSchema::new(#type_name, &FIELDS, #parent_link);
                &SCHEMA
            }

            fn try_clone(&self) -> ::core::result::Result<Self, #shared::CloneFailure> {
                #clone_body
            }
        }
    })
}

struct OverridableField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
    property: String,
    required: bool,
}

#[derive(Debug)]
enum FieldRole {
    Value { required: bool },
    Parent,
    Skip,
}

#[derive(Debug)]
struct FieldOptions {
    role: FieldRole,
    rename: Option<String>,
}

fn parse_container_attrs(attrs: &[Attribute]) -> Result<Option<Path>, syn::Error> {
    let mut clone_with: Option<Path> = None;
    for attr in attrs {
        if !attr.path().is_ident("env_override") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("clone_with") {
                let value: LitStr = meta.value()?.parse()?;
                let parsed: Path = value.parse()?;
                if clone_with.is_some() {
                    return Err(meta.error("duplicate env_override(clone_with = ...)"));
                }
                clone_with = Some(parsed);
                return Ok(());
            }
            Err(meta.error("unsupported env_override attribute on container"))
        })?;
    }
    Ok(clone_with)
}

fn parse_field_options(attrs: &[Attribute]) -> Result<FieldOptions, syn::Error> {
    let mut required = false;
    let mut parent = false;
    let mut skip = false;
    let mut rename: Option<String> = None;
    for attr in attrs {
        if !attr.path().is_ident("env_override") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("required") {
                required = true;
                return Ok(());
            }
            if meta.path.is_ident("parent") {
                parent = true;
                return Ok(());
            }
            if meta.path.is_ident("skip") {
                skip = true;
                return Ok(());
            }
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                if rename.is_some() {
                    return Err(meta.error("duplicate env_override(rename = ...)"));
                }
                if value.value().is_empty() {
                    return Err(meta.error("env_override(rename = ...) must be non-empty"));
                }
                rename = Some(value.value());
                return Ok(());
            }
            Err(meta.error("unsupported env_override attribute on field"))
        })?;
    }

    let role = match (parent, skip) {
        (true, true) => {
            return Err(syn::Error::new(
                Span::call_site(),
                "env_override(parent) and env_override(skip) are mutually exclusive",
            ));
        },
        (true, false) if required || rename.is_some() => {
            return Err(syn::Error::new(
                Span::call_site(),
                "env_override(parent) does not accept required or rename",
            ));
        },
        (true, false) => FieldRole::Parent,
        (false, true) if required || rename.is_some() => {
            return Err(syn::Error::new(
                Span::call_site(),
                "env_override(skip) does not accept required or rename",
            ));
        },
        (false, true) => FieldRole::Skip,
        (false, false) => FieldRole::Value { required },
    };
    Ok(FieldOptions { role, rename })
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| match arg {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    })
}

fn ident_name(ident: &Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map_or(name.clone(), str::to_string)
}

fn type_display(ty: &Type) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}

// snake_case identifiers are camel-cased; lowerCamelCase ones are kept as is.
// Anything else cannot be reached from an env key, so it needs a rename.
fn default_property(ident: &Ident) -> Result<String, syn::Error> {
    let name = ident_name(ident);
    if !name.chars().any(char::is_uppercase) {
        return Ok(lower_camel_case(&name));
    }
    let lower_camel = name.chars().next().is_some_and(char::is_lowercase) && !name.contains('_');
    if lower_camel {
        Ok(name)
    } else {
        Err(syn::Error::new_spanned(
            ident,
            "field name is neither snake_case nor lowerCamelCase; \
             add #[env_override(rename = \"...\")]",
        ))
    }
}

// Same rule the engine applies to env key suffixes, so `big_decimal_value`
// and `BIG_DECIMAL_VALUE` land on the same property.
fn lower_camel_case(snake: &str) -> String {
    let lower = snake.to_lowercase();
    let mut output = String::with_capacity(lower.len());
    let mut upper_next = false;
    for (index, ch) in lower.chars().enumerate() {
        if upper_next {
            output.extend(ch.to_uppercase());
            upper_next = false;
        } else if ch == '_' && index > 0 {
            upper_next = true;
        } else {
            output.push(ch);
        }
    }
    output
}
