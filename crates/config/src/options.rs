//! Per-call options and the process-wide validation mode.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Env var that disables required-override validation when set to `false`.
pub const VALIDATION_FLAG_VAR: &str = "ENV_OVERRIDE_VALIDATION_ENABLED";

static GLOBAL_VALIDATION_MODE: OnceLock<ValidationMode> = OnceLock::new();

/// Whether required-override fields are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Missing required overrides fail the pass.
    #[default]
    Enabled,
    /// The required-override check is skipped.
    Disabled,
}

impl ValidationMode {
    /// Interpret a flag value: `"false"` (any case) disables validation,
    /// anything else (including no value) enables it.
    #[must_use]
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some(value) if value.eq_ignore_ascii_case("false") => Self::Disabled,
            _ => Self::Enabled,
        }
    }

    /// Read the flag from `ENV_OVERRIDE_VALIDATION_ENABLED`.
    #[must_use]
    pub fn from_std_env() -> Self {
        Self::from_flag(std::env::var(VALIDATION_FLAG_VAR).ok().as_deref())
    }

    /// The process-wide mode.
    ///
    /// Fixed by `init_global_validation_mode`; if that was never called, the
    /// environment flag is read once on first use.
    #[must_use]
    pub fn global() -> Self {
        *GLOBAL_VALIDATION_MODE.get_or_init(Self::from_std_env)
    }

    /// Whether missing required overrides fail the pass.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

/// Fix the process-wide validation mode. Call once at startup.
///
/// Returns the mode already in effect when it was fixed earlier (explicitly
/// or by a first read).
pub fn init_global_validation_mode(mode: ValidationMode) -> Result<(), ValidationMode> {
    GLOBAL_VALIDATION_MODE
        .set(mode)
        .map_err(|_| ValidationMode::global())
}

/// Options for one override pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverrideOptions {
    validation: Option<ValidationMode>,
}

impl OverrideOptions {
    /// Options that defer to the process-wide validation mode.
    #[must_use]
    pub const fn new() -> Self {
        Self { validation: None }
    }

    /// Use an explicit validation mode for this pass.
    #[must_use]
    pub const fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = Some(mode);
        self
    }

    /// The mode this pass uses. Falls back to `ValidationMode::global`.
    #[must_use]
    pub fn validation_mode(&self) -> ValidationMode {
        self.validation.unwrap_or_else(ValidationMode::global)
    }
}
