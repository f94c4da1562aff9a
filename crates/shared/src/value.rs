//! Field kinds, coerced values, and the conversions between them and Rust
//! field types.

use crate::schema::FieldAccessError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared kind of an overridable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// `String` or `Box<str>`.
    Text,
    /// `bool`.
    Bool,
    /// `char`.
    Char,
    /// `i8`.
    I8,
    /// `i16`.
    I16,
    /// `i32`.
    I32,
    /// `i64`.
    I64,
    /// `i128`.
    I128,
    /// `isize`.
    Isize,
    /// `u8`.
    U8,
    /// `u16`.
    U16,
    /// `u32`.
    U32,
    /// `u64`.
    U64,
    /// `u128`.
    U128,
    /// `usize`.
    Usize,
    /// `f32`.
    F32,
    /// `f64`.
    F64,
    /// `rust_decimal::Decimal`.
    Decimal,
}

impl FieldKind {
    /// Short lowercase name used in messages and metadata.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::I128 => "i128",
            Self::Isize => "isize",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::Usize => "usize",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Decimal => "decimal",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A value already converted to the kind of its target field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Single character.
    Char(char),
    /// `i8` value.
    I8(i8),
    /// `i16` value.
    I16(i16),
    /// `i32` value.
    I32(i32),
    /// `i64` value.
    I64(i64),
    /// `i128` value.
    I128(i128),
    /// `isize` value.
    Isize(isize),
    /// `u8` value.
    U8(u8),
    /// `u16` value.
    U16(u16),
    /// `u32` value.
    U32(u32),
    /// `u64` value.
    U64(u64),
    /// `u128` value.
    U128(u128),
    /// `usize` value.
    Usize(usize),
    /// `f32` value.
    F32(f32),
    /// `f64` value.
    F64(f64),
    /// Decimal value.
    Decimal(Decimal),
}

impl FieldValue {
    /// Kind of the carried value.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Bool(_) => FieldKind::Bool,
            Self::Char(_) => FieldKind::Char,
            Self::I8(_) => FieldKind::I8,
            Self::I16(_) => FieldKind::I16,
            Self::I32(_) => FieldKind::I32,
            Self::I64(_) => FieldKind::I64,
            Self::I128(_) => FieldKind::I128,
            Self::Isize(_) => FieldKind::Isize,
            Self::U8(_) => FieldKind::U8,
            Self::U16(_) => FieldKind::U16,
            Self::U32(_) => FieldKind::U32,
            Self::U64(_) => FieldKind::U64,
            Self::U128(_) => FieldKind::U128,
            Self::Usize(_) => FieldKind::Usize,
            Self::F32(_) => FieldKind::F32,
            Self::F64(_) => FieldKind::F64,
            Self::Decimal(_) => FieldKind::Decimal,
        }
    }
}

/// A Rust type that can sit behind an overridable field.
///
/// `KIND` and `OPTIONAL` are read in const context by the derive macro to
/// build the static field table, so implementing this trait is all a type
/// needs to become overridable.
pub trait FieldType: Sized {
    /// Kind the raw environment string is coerced into.
    const KIND: FieldKind;
    /// Whether an unset environment value clears the field.
    const OPTIONAL: bool = false;

    /// Convert a coerced value into the field type.
    ///
    /// `None` means the environment entry carried no value.
    fn from_field_value(value: Option<FieldValue>) -> Result<Self, FieldAccessError>;
}

macro_rules! scalar_field_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$variant;

                fn from_field_value(value: Option<FieldValue>) -> Result<Self, FieldAccessError> {
                    match value {
                        Some(FieldValue::$variant(inner)) => Ok(inner),
                        other => Err(FieldAccessError::mismatch(Self::KIND, other.as_ref())),
                    }
                }
            }
        )*
    };
}

scalar_field_type! {
    String => Text,
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
}

impl FieldType for Box<str> {
    const KIND: FieldKind = FieldKind::Text;

    fn from_field_value(value: Option<FieldValue>) -> Result<Self, FieldAccessError> {
        String::from_field_value(value).map(String::into_boxed_str)
    }
}

impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const OPTIONAL: bool = true;

    fn from_field_value(value: Option<FieldValue>) -> Result<Self, FieldAccessError> {
        match value {
            None => Ok(None),
            Some(value) => T::from_field_value(Some(value)).map(Some),
        }
    }
}
