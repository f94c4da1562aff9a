//! Required-override validation.

use crate::error::OverrideError;
use crate::options::{VALIDATION_FLAG_VAR, ValidationMode};
use crate::resolve::ResolutionRecord;
use env_override_shared::{FieldDescriptor, TypeSchema};

/// Required fields declared on `schema` itself that `record` never wrote,
/// in declaration order. Markers on embedded parents are not consulted.
pub fn missing_required(schema: &TypeSchema, record: &ResolutionRecord) -> Vec<&'static str> {
    schema
        .required()
        .filter(|descriptor| !record.contains_own(descriptor))
        .map(FieldDescriptor::property)
        .collect()
}

/// Enforce required overrides under `mode`.
///
/// Returns `Ok(true)` when the check was skipped because validation is
/// disabled, `Ok(false)` when it ran and passed.
pub fn check_required(
    schema: &TypeSchema,
    record: &ResolutionRecord,
    mode: ValidationMode,
) -> Result<bool, OverrideError> {
    if !mode.is_enabled() {
        tracing::info!(
            config = schema.type_name(),
            flag = VALIDATION_FLAG_VAR,
            "required-override validation disabled"
        );
        return Ok(true);
    }

    let missing = missing_required(schema, record);
    if missing.is_empty() {
        Ok(false)
    } else {
        Err(OverrideError::Validation { missing })
    }
}
