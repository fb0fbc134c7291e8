//! Property value codec
//!
//! The string contract every generated accessor follows when it talks to the
//! property store, implemented once in Rust so values can be checked at build
//! time (see [`crate::audit`]):
//!
//! | type    | accepted                                  | canonical          |
//! |---------|-------------------------------------------|--------------------|
//! | Boolean | `1`, `0`, `true`, `false` (any case)      | `true` / `false`, or `1` / `0` with `integer_as_bool` |
//! | numbers | decimal, range-checked                    | decimal            |
//! | Double  | finite decimal float, no inf/nan/hex      | shortest round-trip|
//! | String  | anything                                  | unchanged          |
//! | Enum    | exactly one of the declared tokens        | the token          |
//! | lists   | comma-separated elements, empty = no item | comma-joined       |
//!
//! Generated C++ formats doubles with `max_digits10` digits (`0.1` is written
//! as `0.10000000000000001`); both spellings parse back to the same value, so
//! only the accepted set is shared, not the canonical text.

use thiserror::Error;

use crate::schema::{Property, ScalarType};

/// A raw value that does not fit its declared type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{raw}' is not a valid {expected}")]
pub struct ValueError {
    pub raw: String,
    pub expected: String,
}

impl ValueError {
    fn new(raw: &str, expected: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            expected: expected.into(),
        }
    }
}

/// One element value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Long(i64),
    ULong(u64),
    Double(f64),
    Str(String),
    Enum(String),
}

impl Scalar {
    /// Parse one element. Enum tokens match case-sensitively.
    pub fn parse(ty: ScalarType, enum_values: &[String], raw: &str) -> Result<Self, ValueError> {
        match ty {
            ScalarType::Boolean => parse_bool(raw).map(Scalar::Bool),
            ScalarType::Integer => raw
                .parse()
                .map(Scalar::Int)
                .map_err(|_| ValueError::new(raw, "Integer")),
            ScalarType::UInt => raw
                .parse()
                .map(Scalar::UInt)
                .map_err(|_| ValueError::new(raw, "UInt")),
            ScalarType::Long => raw
                .parse()
                .map(Scalar::Long)
                .map_err(|_| ValueError::new(raw, "Long")),
            ScalarType::ULong => raw
                .parse()
                .map(Scalar::ULong)
                .map_err(|_| ValueError::new(raw, "ULong")),
            ScalarType::Double => match raw.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(Scalar::Double(v)),
                _ => Err(ValueError::new(raw, "Double")),
            },
            ScalarType::String => Ok(Scalar::Str(raw.to_string())),
            ScalarType::Enum => enum_values
                .iter()
                .find(|token| token.as_str() == raw)
                .map(|token| Scalar::Enum(token.clone()))
                .ok_or_else(|| ValueError::new(raw, format!("value of {}", enum_values.join("|")))),
        }
    }

    pub fn format(&self, integer_as_bool: bool) -> String {
        match self {
            Scalar::Bool(v) if integer_as_bool => (if *v { "1" } else { "0" }).to_string(),
            Scalar::Bool(v) => v.to_string(),
            Scalar::Int(v) => v.to_string(),
            Scalar::UInt(v) => v.to_string(),
            Scalar::Long(v) => v.to_string(),
            Scalar::ULong(v) => v.to_string(),
            Scalar::Double(v) => v.to_string(),
            Scalar::Str(v) | Scalar::Enum(v) => v.clone(),
        }
    }
}

fn parse_bool(raw: &str) -> Result<bool, ValueError> {
    if raw == "1" || raw.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if raw == "0" || raw.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ValueError::new(raw, "Boolean"))
    }
}

/// A typed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl PropValue {
    /// Parse a raw store value according to the property's declared type
    pub fn parse(prop: &Property, raw: &str) -> Result<Self, ValueError> {
        let ty = prop.prop_type.scalar();

        if !prop.prop_type.is_list() {
            return Scalar::parse(ty, &prop.enum_values, raw).map(PropValue::Scalar);
        }

        if raw.is_empty() {
            return Ok(PropValue::List(Vec::new()));
        }

        raw.split(',')
            .map(|element| Scalar::parse(ty, &prop.enum_values, element))
            .collect::<Result<Vec<_>, _>>()
            .map(PropValue::List)
    }

    /// Serialize back to the store representation
    pub fn format(&self, prop: &Property) -> String {
        match self {
            PropValue::Scalar(v) => v.format(prop.integer_as_bool),
            PropValue::List(items) => items
                .iter()
                .map(|v| v.format(prop.integer_as_bool))
                .collect::<Vec<_>>()
                .join(","),
        }
    }
}
