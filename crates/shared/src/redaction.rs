//! Secret detection and redaction utilities.
//!
//! Environment overrides routinely carry credentials, so any raw value that
//! ends up in an error message or log field goes through these helpers first.

/// The redacted placeholder string.
pub const REDACTED: &str = "[REDACTED]";

/// Checks if a key/variable name likely refers to a secret.
///
/// Uses case-insensitive pattern matching to detect common secret-related
/// naming conventions.
///
/// # Examples
///
/// ```
/// use env_override_shared::is_secret_key;
///
/// assert!(is_secret_key("APP_API_KEY"));
/// assert!(is_secret_key("password"));
/// assert!(is_secret_key("APP_DB_AUTH"));
/// assert!(!is_secret_key("APP_LOG_LEVEL"));
/// ```
pub fn is_secret_key(key: &str) -> bool {
    let key = key.to_ascii_uppercase();
    key.contains("KEY")
        || key.contains("TOKEN")
        || key.contains("SECRET")
        || key.contains("PASSWORD")
        || key.contains("CREDENTIAL")
        || key.contains("AUTH")
}

/// Redacts a value if the key is likely a secret.
///
/// # Examples
///
/// ```
/// use env_override_shared::redact_if_secret;
///
/// assert_eq!(redact_if_secret("APP_API_KEY", "sk-123"), "[REDACTED]");
/// assert_eq!(redact_if_secret("APP_LOG_LEVEL", "debug"), "debug");
/// ```
pub fn redact_if_secret(key: &str, value: &str) -> String {
    if is_secret_key(key) {
        REDACTED.to_string()
    } else {
        value.to_string()
    }
}
