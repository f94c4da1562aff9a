//! # env-override-config
//!
//! Applies prefix-selected environment variables to a copy of a strongly
//! typed configuration struct. Types opt in with `#[derive(EnvOverride)]`;
//! the derive and the field model live in `env-override-derive` and
//! `env-override-shared`.

/// Raw value coercion.
pub mod coerce;
/// The override pass and its report.
pub mod engine;
/// Environment snapshots.
pub mod env;
/// Override failures and envelope mapping.
pub mod error;
/// Prefix filtering and key translation.
pub mod keys;
/// Per-call options and the process-wide validation mode.
pub mod options;
/// Field resolution along the embedding chain.
pub mod resolve;
/// Required-override validation.
pub mod validate;

pub use coerce::{CoercionFailure, coerce, coerce_str};
pub use engine::{
    AppliedOverride, EnvOverrideExt, OverrideReport, Overridden, UnresolvedKey, override_from_env,
    override_from_env_with, override_from_std_env,
};
pub use env::EnvVars;
pub use env_override_derive::EnvOverride;
pub use env_override_shared::{
    CloneFailure, EnvOverride, ErrorEnvelope, FieldAccess, FieldAccessError, FieldDescriptor,
    FieldKind, FieldType, FieldValue, TypeSchema,
};
pub use error::OverrideError;
pub use keys::{PendingOverride, collect_overrides, strip_prefix, to_lower_camel_case};
pub use options::{
    OverrideOptions, VALIDATION_FLAG_VAR, ValidationMode, init_global_validation_mode,
};
pub use resolve::{Resolution, ResolutionRecord, resolve};
pub use validate::{check_required, missing_required};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
