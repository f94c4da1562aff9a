//! Override pass failures and their envelope mapping.

use crate::coerce::CoercionFailure;
use crate::options::VALIDATION_FLAG_VAR;
use env_override_shared::{CloneFailure, ErrorCode, ErrorEnvelope, FieldKind};

/// Fatal failure of an override pass. No partial result accompanies it.
#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    /// A raw value could not be converted to its field's kind.
    #[error("cannot override `{property}` from {env_key}: {source}")]
    Coercion {
        /// Translated property name.
        property: String,
        /// Environment key that supplied the value.
        env_key: String,
        /// Type declaring the field.
        owner: &'static str,
        /// Declared kind of the field.
        kind: FieldKind,
        /// Raw value, redacted when the key looks secret.
        value: Option<String>,
        /// Underlying conversion failure.
        #[source]
        source: CoercionFailure,
    },
    /// The configuration object could not be copied.
    #[error("cannot copy {type_name}: {source}")]
    Clone {
        /// Type being copied.
        type_name: &'static str,
        /// Failure reported by the clone hook.
        #[source]
        source: CloneFailure,
    },
    /// Required-override fields were not set while validation is enabled.
    #[error(
        "Missing required overridden properties: {names}\nIf this is a dev environment, you can disable validation by setting {flag}=false",
        names = .missing.join(", "),
        flag = VALIDATION_FLAG_VAR
    )]
    Validation {
        /// Missing property names in declaration order.
        missing: Vec<&'static str>,
    },
}

impl OverrideError {
    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Coercion { .. } => ErrorCode::env_override("invalid_value"),
            Self::Clone { .. } => ErrorCode::env_override("clone_failed"),
            Self::Validation { .. } => ErrorCode::env_override("missing_required"),
        }
    }
}

impl From<OverrideError> for ErrorEnvelope {
    fn from(error: OverrideError) -> Self {
        let code = error.error_code();
        let message = error.to_string();

        match error {
            OverrideError::Coercion {
                property,
                env_key,
                owner,
                kind,
                value,
                ..
            } => {
                let mut envelope = Self::expected(code, message)
                    .with_metadata("env_var", env_key)
                    .with_metadata("property", property)
                    .with_metadata("owner", owner)
                    .with_metadata("kind", kind.as_str());
                if let Some(value) = value {
                    envelope = envelope.with_metadata("value", value);
                }
                envelope
            },
            OverrideError::Clone { type_name, .. } => {
                Self::unexpected(code, message).with_metadata("type", type_name)
            },
            OverrideError::Validation { missing } => {
                Self::expected(code, message).with_metadata("missing", missing.join(","))
            },
        }
    }
}
