//! Integration tests for the override pass.

use env_override_config::{
    CloneFailure, CoercionFailure, EnvOverride, EnvOverrideExt, EnvVars, FieldAccessError,
    OverrideError, OverrideOptions, ValidationMode, override_from_env, override_from_env_with,
};
use rust_decimal::Decimal;
use std::error::Error;

#[derive(Debug, Clone, PartialEq, EnvOverride)]
struct TestAppConfig {
    untouched_value: String,
    string_value: String,
    int_value: i32,
    long_value: i64,
    char_value: char,
    double_value: f64,
    big_decimal_value: Decimal,
}

impl Default for TestAppConfig {
    fn default() -> Self {
        Self {
            untouched_value: "untouched".to_string(),
            string_value: "test".to_string(),
            int_value: 1,
            long_value: 1,
            char_value: 'a',
            double_value: 1.3,
            big_decimal_value: Decimal::ONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, EnvOverride)]
struct RequiresOverrideAppConfig {
    untouched_value: String,
    #[env_override(required)]
    string_value: String,
    #[env_override(required)]
    int_value: i32,
}

impl Default for RequiresOverrideAppConfig {
    fn default() -> Self {
        Self {
            untouched_value: "untouched".to_string(),
            string_value: "test".to_string(),
            int_value: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, EnvOverride)]
struct ParentConfig {
    string_value: String,
}

#[derive(Debug, Clone, PartialEq, EnvOverride)]
struct ChildConfig {
    #[env_override(parent)]
    parent: ParentConfig,
    int_value: i32,
}

impl Default for ChildConfig {
    fn default() -> Self {
        Self {
            parent: ParentConfig {
                string_value: "a".to_string(),
            },
            int_value: 1,
        }
    }
}

fn enabled() -> OverrideOptions {
    OverrideOptions::new().with_validation(ValidationMode::Enabled)
}

fn disabled() -> OverrideOptions {
    OverrideOptions::new().with_validation(ValidationMode::Disabled)
}

#[test]
fn non_matching_env_vars_do_not_override() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("JUNK_STRING_VALUE", "b")]);

    let config = override_from_env(&TestAppConfig::default(), "TEST", &env)?;

    assert_eq!(config, TestAppConfig::default());
    Ok(())
}

#[test]
fn every_supported_kind_is_overridden() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([
        ("TEST_STRING_VALUE", "b"),
        ("TEST_INT_VALUE", "2"),
        ("TEST_LONG_VALUE", "2"),
        ("TEST_CHAR_VALUE", "b"),
        ("TEST_DOUBLE_VALUE", "2.0"),
        ("TEST_BIG_DECIMAL_VALUE", "2.0"),
    ]);

    let config = override_from_env(&TestAppConfig::default(), "TEST", &env)?;

    assert_eq!(config.untouched_value, "untouched");
    assert_eq!(config.string_value, "b");
    assert_eq!(config.int_value, 2);
    assert_eq!(config.long_value, 2);
    assert_eq!(config.char_value, 'b');
    assert!((config.double_value - 2.0).abs() < f64::EPSILON);
    assert_eq!(config.big_decimal_value, Decimal::new(20, 1));
    assert_eq!(config.big_decimal_value.to_string(), "2.0");
    Ok(())
}

#[test]
fn over_precise_decimals_fail_instead_of_rounding() {
    let env = EnvVars::from_pairs([("TEST_BIG_DECIMAL_VALUE", "1.000000000000000000000000000001")]);

    let error = override_from_env(&TestAppConfig::default(), "TEST", &env).err();

    assert!(matches!(
        error,
        Some(OverrideError::Coercion {
            ref property,
            source: CoercionFailure::InvalidDecimal(_),
            ..
        }) if property == "bigDecimalValue"
    ));
}

#[test]
fn unknown_keys_are_reported_but_not_fatal() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST_UNKNOWN_VALUE", "a")]);

    let (config, report) =
        override_from_env_with(&TestAppConfig::default(), "TEST", &env, &enabled())?.into_parts();

    assert_eq!(config, TestAppConfig::default());
    assert!(report.applied.is_empty());
    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].property, "unknownValue");
    assert_eq!(report.unresolved[0].env_key, "TEST_UNKNOWN_VALUE");
    Ok(())
}

#[test]
fn missing_required_overrides_fail_with_guidance() {
    let env = EnvVars::from_pairs([("TEST_UNKNOWN_VALUE", "a")]);

    let result = override_from_env_with(
        &RequiresOverrideAppConfig::default(),
        "TEST",
        &env,
        &enabled(),
    );

    let message = result.err().map(|error| error.to_string());
    assert_eq!(
        message.as_deref(),
        Some(
            "Missing required overridden properties: stringValue, intValue\n\
             If this is a dev environment, you can disable validation by setting \
             ENV_OVERRIDE_VALIDATION_ENABLED=false"
        )
    );
}

#[test]
fn disabled_validation_returns_the_copy() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST_UNKNOWN_VALUE", "a")]);

    let overridden = override_from_env_with(
        &RequiresOverrideAppConfig::default(),
        "TEST",
        &env,
        &disabled(),
    )?;

    assert_eq!(overridden.config(), &RequiresOverrideAppConfig::default());
    assert!(overridden.report().validation_skipped);
    Ok(())
}

#[test]
fn overriding_every_required_field_succeeds() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST_STRING_VALUE", "modified"), ("TEST_INT_VALUE", "2")]);

    let overridden = override_from_env_with(
        &RequiresOverrideAppConfig::default(),
        "TEST",
        &env,
        &enabled(),
    )?;

    assert_eq!(overridden.config().string_value, "modified");
    assert_eq!(overridden.config().int_value, 2);
    assert!(!overridden.report().validation_skipped);
    Ok(())
}

#[test]
fn overriding_with_an_identical_value_still_counts() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST_STRING_VALUE", "test"), ("TEST_INT_VALUE", "1")]);

    let config = override_from_env_with(
        &RequiresOverrideAppConfig::default(),
        "TEST",
        &env,
        &enabled(),
    )?
    .into_inner();

    assert_eq!(config, RequiresOverrideAppConfig::default());
    Ok(())
}

#[test]
fn embedded_parent_fields_are_overridden() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST_STRING_VALUE", "modified"), ("TEST_INT_VALUE", "2")]);

    let config = override_from_env(&ChildConfig::default(), "TEST", &env)?;

    assert_eq!(config.parent.string_value, "modified");
    assert_eq!(config.int_value, 2);
    Ok(())
}

#[test]
fn the_original_is_left_untouched() -> Result<(), Box<dyn Error>> {
    let original = ChildConfig::default();
    let env = EnvVars::from_pairs([("TEST_STRING_VALUE", "modified"), ("TEST_INT_VALUE", "2")]);

    let copy = original.with_env_overrides("TEST", Some(&env))?;

    assert_eq!(original, ChildConfig::default());
    assert_ne!(copy, original);
    Ok(())
}

#[test]
fn malformed_values_abort_the_pass() {
    let env = EnvVars::from_pairs([("TEST_STRING_VALUE", "b"), ("TEST_INT_VALUE", "two")]);

    let error = override_from_env(&TestAppConfig::default(), "TEST", &env).err();

    assert!(matches!(
        error,
        Some(OverrideError::Coercion {
            ref property,
            ref env_key,
            source: CoercionFailure::InvalidInt { .. },
            ..
        }) if property == "intValue" && env_key == "TEST_INT_VALUE"
    ));
}

#[test]
fn multi_character_char_values_are_rejected() {
    let env = EnvVars::from_pairs([("TEST_CHAR_VALUE", "bb")]);

    let error = override_from_env(&TestAppConfig::default(), "TEST", &env).err();

    assert!(matches!(
        error,
        Some(OverrideError::Coercion {
            source: CoercionFailure::InvalidChar { count: 2 },
            ..
        })
    ));
}

#[test]
fn prefix_only_key_is_unresolved() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST", "value")]);

    let report = override_from_env_with(&TestAppConfig::default(), "TEST", &env, &disabled())?
        .report()
        .clone();

    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].property, "");
    Ok(())
}

#[derive(Debug, Clone, PartialEq, EnvOverride)]
struct TunedConfig {
    #[env_override(rename = "maxConn")]
    max_connections: u32,
    #[env_override(skip)]
    build_id: String,
    label: Option<String>,
    retries: Option<u8>,
    verbose: bool,
}

impl Default for TunedConfig {
    fn default() -> Self {
        Self {
            max_connections: 8,
            build_id: "b-1".to_string(),
            label: Some("primary".to_string()),
            retries: None,
            verbose: false,
        }
    }
}

#[test]
fn renamed_and_skipped_fields() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([
        ("TUNED_MAX_CONN", "32"),
        ("TUNED_MAX_CONNECTIONS", "64"),
        ("TUNED_BUILD_ID", "b-2"),
    ]);

    let (config, report) =
        override_from_env_with(&TunedConfig::default(), "TUNED", &env, &disabled())?.into_parts();

    assert_eq!(config.max_connections, 32);
    assert_eq!(config.build_id, "b-1");
    let unresolved: Vec<&str> = report
        .unresolved
        .iter()
        .map(|key| key.property.as_str())
        .collect();
    assert_eq!(unresolved, vec!["buildId", "maxConnections"]);
    Ok(())
}

#[test]
fn optional_fields_are_set_and_cleared() -> Result<(), Box<dyn Error>> {
    let mut env = EnvVars::from_pairs([("TUNED_RETRIES", " 3 "), ("TUNED_VERBOSE", "on")]);
    env.insert_unset("TUNED_LABEL");

    let config = override_from_env(&TunedConfig::default(), "TUNED", &env)?;

    assert_eq!(config.label, None);
    assert_eq!(config.retries, Some(3));
    assert!(config.verbose);
    Ok(())
}

#[test]
fn unset_values_on_plain_fields_are_errors() {
    let mut env = EnvVars::new();
    env.insert_unset("TUNED_VERBOSE");

    let error = override_from_env(&TunedConfig::default(), "TUNED", &env).err();

    assert!(matches!(
        error,
        Some(OverrideError::Coercion {
            source: CoercionFailure::MissingValue { .. },
            value: None,
            ..
        })
    ));
}

#[test]
fn defaults_closure_feeds_the_pass() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST_LONG_VALUE", "9000000000")]);

    let config = TestAppConfig::default().with_env_overrides_and_defaults(
        "TEST",
        Some(&env),
        |config| {
            config.long_value = 5;
            config.string_value = "from defaults".to_string();
        },
    )?;

    assert_eq!(config.long_value, 9_000_000_000);
    assert_eq!(config.string_value, "from defaults");
    Ok(())
}

#[derive(Debug, PartialEq)]
struct PoolHandle(u32);

#[derive(Debug, PartialEq, EnvOverride)]
#[env_override(clone_with = "copy_pooled")]
struct PooledConfig {
    #[env_override(skip)]
    handle: PoolHandle,
    pool_size: u16,
}

fn copy_pooled(config: &PooledConfig) -> Result<PooledConfig, CloneFailure> {
    if config.handle.0 == 0 {
        return Err(CloneFailure::new("pool handle is not initialised"));
    }
    Ok(PooledConfig {
        handle: PoolHandle(config.handle.0),
        pool_size: config.pool_size,
    })
}

#[test]
fn clone_hook_is_used_for_the_copy() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("POOL_POOL_SIZE", "20")]);
    let original = PooledConfig {
        handle: PoolHandle(7),
        pool_size: 4,
    };

    let config = override_from_env(&original, "POOL", &env)?;

    assert_eq!(config.handle, PoolHandle(7));
    assert_eq!(config.pool_size, 20);
    assert_eq!(original.pool_size, 4);
    Ok(())
}

#[test]
fn clone_hook_failure_is_fatal() {
    let env = EnvVars::from_pairs([("POOL_POOL_SIZE", "20")]);
    let original = PooledConfig {
        handle: PoolHandle(0),
        pool_size: 4,
    };

    let error = override_from_env(&original, "POOL", &env).err();

    assert!(matches!(
        error,
        Some(OverrideError::Clone {
            type_name: "PooledConfig",
            ..
        })
    ));
}

#[test]
fn schema_lists_required_fields_in_declaration_order() {
    let schema = RequiresOverrideAppConfig::schema();
    let required: Vec<&str> = schema.required().map(|field| field.property()).collect();

    assert_eq!(required, vec!["stringValue", "intValue"]);
    assert_eq!(
        ChildConfig::schema()
            .chain()
            .map(|schema| schema.type_name())
            .collect::<Vec<_>>(),
        vec!["ChildConfig", "ParentConfig"]
    );
}

#[test]
fn unknown_field_writes_are_rejected_by_the_accessor() {
    use env_override_config::FieldAccess;

    let mut config = ChildConfig::default();

    let result = config.set_own_field("stringValue", None);

    assert_eq!(
        result,
        Err(FieldAccessError::UnknownField {
            type_name: "ChildConfig",
            property: "stringValue".to_string(),
        })
    );
}

#[allow(non_snake_case, reason = "camelCase field names map to properties unchanged")]
#[derive(Debug, Clone, PartialEq, EnvOverride)]
struct CamelCaseConfig {
    stringValue: String,
    retry_count: u8,
}

#[test]
fn camel_case_field_names_are_kept_as_properties() -> Result<(), Box<dyn Error>> {
    let env = EnvVars::from_pairs([("TEST_STRING_VALUE", "modified"), ("TEST_RETRY_COUNT", "3")]);
    let defaults = CamelCaseConfig {
        stringValue: "a".to_string(),
        retry_count: 0,
    };

    let config = override_from_env(&defaults, "TEST", &env)?;

    assert_eq!(config.stringValue, "modified");
    assert_eq!(config.retry_count, 3);
    Ok(())
}
