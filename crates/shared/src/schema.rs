//! Static field metadata for overridable configuration types.
//!
//! Every `#[derive(EnvOverride)]` type owns one `static TypeSchema` holding
//! its own fields in declaration order and an optional link to the embedded
//! parent type. The override engine reads these tables instead of inspecting
//! values at runtime.

use crate::value::{FieldKind, FieldValue};
use serde::Serialize;

/// Describes one overridable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    property: &'static str,
    field: &'static str,
    type_name: &'static str,
    kind: FieldKind,
    optional: bool,
    required: bool,
}

impl FieldDescriptor {
    /// Build a descriptor; used by the derive macro in `static` context.
    #[must_use]
    pub const fn new(
        property: &'static str,
        field: &'static str,
        type_name: &'static str,
        kind: FieldKind,
        optional: bool,
        required: bool,
    ) -> Self {
        Self {
            property,
            field,
            type_name,
            kind,
            optional,
            required,
        }
    }

    /// Lower camel case property name matched against translated env keys.
    #[must_use]
    pub const fn property(&self) -> &'static str {
        self.property
    }

    /// Rust field identifier.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Declared Rust type, as written in the struct.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Kind raw values are coerced into.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Whether the field is an `Option<_>`.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether the field carries the required-override marker.
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }
}

/// Link from a type to the parent type it embeds.
#[derive(Debug, Clone, Copy)]
pub struct ParentLink {
    field: &'static str,
    schema: fn() -> &'static TypeSchema,
}

impl ParentLink {
    /// Build a parent link from the embedding field and the parent's schema accessor.
    #[must_use]
    pub const fn new(field: &'static str, schema: fn() -> &'static TypeSchema) -> Self {
        Self { field, schema }
    }

    /// Rust identifier of the embedding field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Schema of the embedded parent type.
    #[must_use]
    pub fn schema(&self) -> &'static TypeSchema {
        (self.schema)()
    }
}

/// Field table for one configuration type.
#[derive(Debug)]
pub struct TypeSchema {
    type_name: &'static str,
    fields: &'static [FieldDescriptor],
    parent: Option<ParentLink>,
}

impl TypeSchema {
    /// Build a schema; used by the derive macro in `static` context.
    #[must_use]
    pub const fn new(
        type_name: &'static str,
        fields: &'static [FieldDescriptor],
        parent: Option<ParentLink>,
    ) -> Self {
        Self {
            type_name,
            fields,
            parent,
        }
    }

    /// Name of the configuration type.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Own (non-inherited) fields in declaration order.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Own field with the given property name.
    #[must_use]
    pub fn own_field(&self, property: &str) -> Option<&'static FieldDescriptor> {
        self.fields
            .iter()
            .find(|descriptor| descriptor.property == property)
    }

    /// Own fields carrying the required-override marker, in declaration order.
    pub fn required(&self) -> impl Iterator<Item = &'static FieldDescriptor> + use<> {
        self.fields.iter().filter(|descriptor| descriptor.required)
    }

    /// Link to the embedded parent, if any.
    #[must_use]
    pub const fn parent_link(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    /// Schema of the embedded parent, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&'static Self> {
        self.parent.as_ref().map(ParentLink::schema)
    }

    /// This schema followed by each parent schema, innermost first.
    pub fn chain(&self) -> SchemaChain<'_> {
        SchemaChain {
            next: Some(self),
        }
    }
}

/// Iterator over a type schema and its parents.
#[derive(Debug, Clone)]
pub struct SchemaChain<'a> {
    next: Option<&'a TypeSchema>,
}

impl<'a> Iterator for SchemaChain<'a> {
    type Item = &'a TypeSchema;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Failures when writing a coerced value into a field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldAccessError {
    /// The type has no own field with this property name.
    #[error("{type_name} has no field named `{property}`")]
    UnknownField {
        /// Type that was written to.
        type_name: &'static str,
        /// Property name that was requested.
        property: String,
    },
    /// The value kind does not fit the field.
    #[error("expected a {expected} value, got {}", .found.map_or("no value", FieldKind::as_str))]
    Mismatch {
        /// Kind declared by the field.
        expected: FieldKind,
        /// Kind supplied, or `None` when no value was supplied.
        found: Option<FieldKind>,
    },
    /// A resolution pointed past the end of the embedding chain.
    #[error("{type_name} does not embed a parent type")]
    MissingParent {
        /// Type without a parent link.
        type_name: &'static str,
    },
}

impl FieldAccessError {
    /// Build an unknown-field error.
    pub fn unknown_field(type_name: &'static str, property: impl Into<String>) -> Self {
        Self::UnknownField {
            type_name,
            property: property.into(),
        }
    }

    /// Build a kind mismatch error.
    #[must_use]
    pub fn mismatch(expected: FieldKind, found: Option<&FieldValue>) -> Self {
        Self::Mismatch {
            expected,
            found: found.map(FieldValue::kind),
        }
    }
}

/// Failure reported by a custom clone hook.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct CloneFailure {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl CloneFailure {
    /// Failure with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Failure wrapping the underlying cause.
    pub fn with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Object-safe write access to a configuration value.
pub trait FieldAccess {
    /// Schema of the concrete type.
    fn type_schema(&self) -> &'static TypeSchema;

    /// Write a value into one of this type's own fields.
    fn set_own_field(
        &mut self,
        property: &str,
        value: Option<FieldValue>,
    ) -> Result<(), FieldAccessError>;

    /// The embedded parent value, if this type embeds one.
    fn parent_mut(&mut self) -> Option<&mut dyn FieldAccess>;
}

/// A configuration type the override engine can copy and rewrite.
///
/// Implemented by `#[derive(EnvOverride)]`.
pub trait EnvOverride: FieldAccess + Sized {
    /// The static field table for this type.
    fn schema() -> &'static TypeSchema;

    /// Produce an independent copy to write overrides into.
    fn try_clone(&self) -> Result<Self, CloneFailure>;
}
