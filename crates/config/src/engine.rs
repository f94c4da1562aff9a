//! The override pass: copy, collect, resolve, coerce, write, validate.

use crate::coerce::{CoercionFailure, coerce};
use crate::env::EnvVars;
use crate::error::OverrideError;
use crate::keys::collect_overrides;
use crate::options::OverrideOptions;
use crate::resolve::{Resolution, ResolutionRecord, resolve};
use crate::validate::check_required;
use env_override_shared::{
    EnvOverride, FieldAccess, FieldAccessError, FieldKind, FieldValue, redact_if_secret,
};
use serde::Serialize;

/// A field written by an override pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
    /// Translated property name.
    pub property: String,
    /// Environment key that supplied the value.
    pub env_key: String,
    /// Type declaring the field.
    pub owner: &'static str,
    /// Rust field name on the owner.
    pub field: &'static str,
    /// Field type as written in the owner's declaration.
    pub declared_type: &'static str,
    /// Declared kind of the field.
    pub kind: FieldKind,
}

/// A matching key whose property exists nowhere in the embedding chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedKey {
    /// Translated property name.
    pub property: String,
    /// Environment key it came from.
    pub env_key: String,
}

/// What an override pass did, in property-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverrideReport {
    /// Fields that were written.
    pub applied: Vec<AppliedOverride>,
    /// Keys that matched the prefix but no field.
    pub unresolved: Vec<UnresolvedKey>,
    /// Whether the required-override check was skipped.
    pub validation_skipped: bool,
}

/// An overridden copy together with its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Overridden<T> {
    config: T,
    report: OverrideReport,
}

impl<T> Overridden<T> {
    /// The overridden copy.
    pub const fn config(&self) -> &T {
        &self.config
    }

    /// The pass report.
    pub const fn report(&self) -> &OverrideReport {
        &self.report
    }

    /// Discard the report.
    pub fn into_inner(self) -> T {
        self.config
    }

    /// Split into copy and report.
    pub fn into_parts(self) -> (T, OverrideReport) {
        (self.config, self.report)
    }
}

/// Return a copy of `config` with every `prefix`-matching entry of `env`
/// applied, using the process-wide validation mode.
///
/// `config` is never modified. Any failure aborts the pass; no partially
/// overridden copy is returned.
///
/// ```
/// use env_override_config::{EnvOverride, EnvVars, override_from_env};
///
/// #[derive(Debug, Clone, EnvOverride)]
/// struct ServerConfig {
///     host: String,
///     max_connections: u32,
/// }
///
/// let defaults = ServerConfig { host: "localhost".into(), max_connections: 16 };
/// let env = EnvVars::from_pairs([("APP_MAX_CONNECTIONS", "64")]);
///
/// let config = override_from_env(&defaults, "APP", &env)?;
/// assert_eq!(config.max_connections, 64);
/// assert_eq!(config.host, "localhost");
/// assert_eq!(defaults.max_connections, 16);
/// # Ok::<(), env_override_config::OverrideError>(())
/// ```
pub fn override_from_env<T: EnvOverride>(
    config: &T,
    prefix: &str,
    env: &EnvVars,
) -> Result<T, OverrideError> {
    override_from_env_with(config, prefix, env, &OverrideOptions::new()).map(Overridden::into_inner)
}

/// [`override_from_env`] over the process environment.
pub fn override_from_std_env<T: EnvOverride>(config: &T, prefix: &str) -> Result<T, OverrideError> {
    override_from_env(config, prefix, &EnvVars::from_std_env())
}

/// [`override_from_env`] with explicit options, returning the pass report.
pub fn override_from_env_with<T: EnvOverride>(
    config: &T,
    prefix: &str,
    env: &EnvVars,
    options: &OverrideOptions,
) -> Result<Overridden<T>, OverrideError> {
    let schema = T::schema();
    let mut copy = config.try_clone().map_err(|source| OverrideError::Clone {
        type_name: schema.type_name(),
        source,
    })?;

    let mut record = ResolutionRecord::default();
    let mut report = OverrideReport::default();

    for (property, pending) in collect_overrides(env, prefix) {
        let Some(resolution) = resolve(schema, &property) else {
            tracing::warn!(
                config = schema.type_name(),
                property = %property,
                env_key = pending.env_key,
                "no field matches environment override"
            );
            report.unresolved.push(UnresolvedKey {
                property,
                env_key: pending.env_key.to_owned(),
            });
            continue;
        };

        let descriptor = resolution.descriptor;
        let coercion_error = |source: CoercionFailure| OverrideError::Coercion {
            property: property.clone(),
            env_key: pending.env_key.to_owned(),
            owner: resolution.owner,
            kind: descriptor.kind(),
            value: pending
                .value
                .map(|raw| redact_if_secret(pending.env_key, raw)),
            source,
        };

        let value = coerce(pending.value, descriptor).map_err(&coercion_error)?;
        write_field(&mut copy, &resolution, value)
            .map_err(|source| coercion_error(CoercionFailure::Rejected(source)))?;
        record.insert(&resolution);

        tracing::debug!(
            config = schema.type_name(),
            property = %property,
            env_key = pending.env_key,
            owner = resolution.owner,
            field = descriptor.field(),
            declared_type = descriptor.type_name(),
            kind = %descriptor.kind(),
            "applied environment override"
        );
        report.applied.push(AppliedOverride {
            property,
            env_key: pending.env_key.to_owned(),
            owner: resolution.owner,
            field: descriptor.field(),
            declared_type: descriptor.type_name(),
            kind: descriptor.kind(),
        });
    }

    report.validation_skipped = check_required(schema, &record, options.validation_mode())?;

    Ok(Overridden {
        config: copy,
        report,
    })
}

fn write_field(
    target: &mut dyn FieldAccess,
    resolution: &Resolution,
    value: Option<FieldValue>,
) -> Result<(), FieldAccessError> {
    write_at_depth(target, resolution.depth, resolution.descriptor.property(), value)
}

fn write_at_depth(
    target: &mut dyn FieldAccess,
    depth: usize,
    property: &str,
    value: Option<FieldValue>,
) -> Result<(), FieldAccessError> {
    if depth == 0 {
        return target.set_own_field(property, value);
    }
    let type_name = target.type_schema().type_name();
    match target.parent_mut() {
        Some(parent) => write_at_depth(parent, depth - 1, property, value),
        None => Err(FieldAccessError::MissingParent { type_name }),
    }
}

/// Method-style entry points for any [`EnvOverride`] type.
pub trait EnvOverrideExt: EnvOverride {
    /// See [`override_from_env`]. Reads the process environment when `env`
    /// is `None`.
    fn with_env_overrides(
        &self,
        prefix: &str,
        env: Option<&EnvVars>,
    ) -> Result<Self, OverrideError> {
        match env {
            Some(env) => override_from_env(self, prefix, env),
            None => override_from_std_env(self, prefix),
        }
    }

    /// Run `defaults` on `self`, then override it like
    /// [`EnvOverrideExt::with_env_overrides`].
    fn with_env_overrides_and_defaults<F>(
        mut self,
        prefix: &str,
        env: Option<&EnvVars>,
        defaults: F,
    ) -> Result<Self, OverrideError>
    where
        F: FnOnce(&mut Self),
    {
        defaults(&mut self);
        self.with_env_overrides(prefix, env)
    }
}

impl<T: EnvOverride> EnvOverrideExt for T {}
