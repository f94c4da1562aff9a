//! Raw string to typed field value coercion.

use env_override_shared::{FieldAccessError, FieldDescriptor, FieldKind, FieldValue};
use rust_decimal::Decimal;
use std::num::{ParseFloatError, ParseIntError};
use std::str::FromStr;

/// Why a raw environment value could not be converted.
#[derive(Debug, thiserror::Error)]
pub enum CoercionFailure {
    /// The entry carried no value and the field is not an `Option`.
    #[error("no value supplied for a non-optional {kind} field")]
    MissingValue {
        /// Declared kind of the field.
        kind: FieldKind,
    },
    /// Boolean literal not recognised.
    #[error("expected a boolean (true/false, 1/0, yes/no, on/off)")]
    InvalidBool,
    /// A `char` field needs exactly one character.
    #[error("expected exactly one character, got {count}")]
    InvalidChar {
        /// Number of characters supplied.
        count: usize,
    },
    /// Integer literal malformed or out of range.
    #[error("invalid {kind} literal")]
    InvalidInt {
        /// Target integer kind.
        kind: FieldKind,
        /// Parser failure.
        #[source]
        source: ParseIntError,
    },
    /// Float literal malformed.
    #[error("invalid {kind} literal")]
    InvalidFloat {
        /// Target float kind.
        kind: FieldKind,
        /// Parser failure.
        #[source]
        source: ParseFloatError,
    },
    /// Decimal literal malformed, out of range, or too precise to hold
    /// without rounding.
    #[error("invalid decimal literal")]
    InvalidDecimal(#[source] rust_decimal::Error),
    /// Scientific literal whose digits would be rounded away.
    #[error("decimal literal has more significant digits than a decimal field holds")]
    InexactDecimal,
    /// The field rejected the coerced value.
    #[error("field rejected the coerced value")]
    Rejected(#[source] FieldAccessError),
}

/// Convert a raw value into the kind declared by `descriptor`.
///
/// Returns `Ok(None)` when the raw value is absent and the field is optional.
/// Text and char values are taken verbatim; every other kind is trimmed
/// before parsing.
pub fn coerce(
    raw: Option<&str>,
    descriptor: &FieldDescriptor,
) -> Result<Option<FieldValue>, CoercionFailure> {
    match raw {
        Some(raw) => coerce_str(raw, descriptor.kind()).map(Some),
        None if descriptor.is_optional() => Ok(None),
        None => Err(CoercionFailure::MissingValue {
            kind: descriptor.kind(),
        }),
    }
}

/// Convert a present raw value into `kind`.
pub fn coerce_str(raw: &str, kind: FieldKind) -> Result<FieldValue, CoercionFailure> {
    let trimmed = raw.trim();
    let value = match kind {
        FieldKind::Text => FieldValue::Text(raw.to_owned()),
        FieldKind::Char => FieldValue::Char(parse_char(raw)?),
        FieldKind::Bool => FieldValue::Bool(parse_bool(trimmed)?),
        FieldKind::I8 => FieldValue::I8(parse_int(trimmed, kind)?),
        FieldKind::I16 => FieldValue::I16(parse_int(trimmed, kind)?),
        FieldKind::I32 => FieldValue::I32(parse_int(trimmed, kind)?),
        FieldKind::I64 => FieldValue::I64(parse_int(trimmed, kind)?),
        FieldKind::I128 => FieldValue::I128(parse_int(trimmed, kind)?),
        FieldKind::Isize => FieldValue::Isize(parse_int(trimmed, kind)?),
        FieldKind::U8 => FieldValue::U8(parse_int(trimmed, kind)?),
        FieldKind::U16 => FieldValue::U16(parse_int(trimmed, kind)?),
        FieldKind::U32 => FieldValue::U32(parse_int(trimmed, kind)?),
        FieldKind::U64 => FieldValue::U64(parse_int(trimmed, kind)?),
        FieldKind::U128 => FieldValue::U128(parse_int(trimmed, kind)?),
        FieldKind::Usize => FieldValue::Usize(parse_int(trimmed, kind)?),
        FieldKind::F32 => FieldValue::F32(parse_float(trimmed, kind)?),
        FieldKind::F64 => FieldValue::F64(parse_float(trimmed, kind)?),
        FieldKind::Decimal => FieldValue::Decimal(parse_decimal(trimmed)?),
    };
    Ok(value)
}

fn parse_char(raw: &str) -> Result<char, CoercionFailure> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(CoercionFailure::InvalidChar {
            count: raw.chars().count(),
        }),
    }
}

fn parse_bool(trimmed: &str) -> Result<bool, CoercionFailure> {
    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CoercionFailure::InvalidBool),
    }
}

fn parse_int<T>(trimmed: &str, kind: FieldKind) -> Result<T, CoercionFailure>
where
    T: FromStr<Err = ParseIntError>,
{
    trimmed
        .parse::<T>()
        .map_err(|source| CoercionFailure::InvalidInt { kind, source })
}

fn parse_float<T>(trimmed: &str, kind: FieldKind) -> Result<T, CoercionFailure>
where
    T: FromStr<Err = ParseFloatError>,
{
    trimmed
        .parse::<T>()
        .map_err(|source| CoercionFailure::InvalidFloat { kind, source })
}

// Values are never rounded: a literal either fits exactly or is rejected.
fn parse_decimal(trimmed: &str) -> Result<Decimal, CoercionFailure> {
    let plain_error = match Decimal::from_str_exact(trimmed) {
        Ok(value) => return Ok(value),
        Err(error) => error,
    };
    let Some((mantissa, _)) = trimmed.split_once(['e', 'E']) else {
        return Err(CoercionFailure::InvalidDecimal(plain_error));
    };
    let value = Decimal::from_scientific(trimmed).map_err(CoercionFailure::InvalidDecimal)?;
    let parsed = value.normalize().mantissa().unsigned_abs().to_string();
    if significant_digits(mantissa) == significant_digits(&parsed) {
        Ok(value)
    } else {
        Err(CoercionFailure::InexactDecimal)
    }
}

fn significant_digits(literal: &str) -> String {
    let digits: String = literal.chars().filter(char::is_ascii_digit).collect();
    digits.trim_start_matches('0').trim_end_matches('0').to_owned()
}
