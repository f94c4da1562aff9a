//! # env-override-shared
//!
//! Foundational types shared by the override engine and the derive macro:
//!
//! - Static field schemas and the `EnvOverride` / `FieldAccess` traits
//! - Field kinds, coerced values, and `FieldType` conversions
//! - The structured `ErrorEnvelope` and secret redaction helpers
//!
//! Code emitted by `#[derive(EnvOverride)]` refers to this crate by path, so
//! crates deriving the trait depend on it directly.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod errors;
pub mod redaction;
pub mod schema;
pub mod value;

pub use errors::{ErrorCode, ErrorEnvelope, ErrorKind, ErrorMetadata};
pub use redaction::{REDACTED, is_secret_key, redact_if_secret};
pub use rust_decimal::Decimal;
pub use schema::{
    CloneFailure, EnvOverride, FieldAccess, FieldAccessError, FieldDescriptor, ParentLink,
    SchemaChain, TypeSchema,
};
pub use value::{FieldKind, FieldType, FieldValue};

/// Returns the shared crate version.
#[must_use]
pub const fn shared_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
