//! Prefix filtering and env-key to property-name translation.

use crate::env::EnvVars;
use std::collections::BTreeMap;

/// One matching environment entry, keyed by its translated property name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingOverride<'a> {
    /// Full environment key the value came from.
    pub env_key: &'a str,
    /// Raw value; `None` when the entry carries no value.
    pub value: Option<&'a str>,
}

/// Select entries under `prefix` and key them by translated property name.
///
/// A key matches when it starts with `prefix` (case-sensitive). The prefix
/// plus one separator character is stripped before translation; the
/// separator itself is not checked. Non-matching keys are dropped silently.
/// When two keys translate to the same property, the later key in map order
/// wins.
pub fn collect_overrides<'a>(
    env: &'a EnvVars,
    prefix: &str,
) -> BTreeMap<String, PendingOverride<'a>> {
    let mut overrides = BTreeMap::new();
    for (env_key, value) in env.iter() {
        let Some(suffix) = strip_prefix(env_key, prefix) else {
            continue;
        };
        overrides.insert(
            to_lower_camel_case(suffix),
            PendingOverride { env_key, value },
        );
    }
    overrides
}

/// Remove `prefix` and the single separator character that follows it.
///
/// Returns `None` when `key` does not start with `prefix`.
pub fn strip_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = key.strip_prefix(prefix)?;
    let mut chars = rest.chars();
    chars.next();
    Some(chars.as_str())
}

/// Translate an upper-snake-case suffix into a lower camel case property name.
///
/// The input is lower-cased, then every underscore other than a leading one
/// is dropped and the character after it upper-cased. A trailing underscore
/// is dropped.
///
/// ```
/// use env_override_config::to_lower_camel_case;
///
/// assert_eq!(to_lower_camel_case("BIG_DECIMAL_VALUE"), "bigDecimalValue");
/// assert_eq!(to_lower_camel_case("_PRIVATE"), "_private");
/// ```
pub fn to_lower_camel_case(upper_snake: &str) -> String {
    let lower = upper_snake.to_lowercase();
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
