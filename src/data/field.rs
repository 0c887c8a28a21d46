//! Field Access Module
//! Typed field values and the `Record` trait the aggregations are written against.

use std::borrow::Cow;

/// Key used when a counted field is absent on a record.
pub const MISSING_KEY: &str = "(missing)";

/// Scalar value of one record field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Flag(bool),
    Missing,
}

impl<'a> FieldValue<'a> {
    /// Borrowed text value.
    pub fn text(value: &'a str) -> Self {
        FieldValue::Text(Cow::Borrowed(value))
    }

    /// Owned text value (formatted dates, ids).
    pub fn owned(value: String) -> Self {
        FieldValue::Text(Cow::Owned(value))
    }

    /// Empty text, zero, NaN, `false` and missing values are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            FieldValue::Text(s) => !s.is_empty(),
            FieldValue::Number(n) => *n != 0.0 && !n.is_nan(),
            FieldValue::Flag(b) => *b,
            FieldValue::Missing => false,
        }
    }

    /// Numeric view of the value. Text, flags and NaN are not numbers.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) if !n.is_nan() => Some(*n),
            _ => None,
        }
    }

    /// String form used as a grouping/counting key.
    pub fn to_key(&self) -> Option<String> {
        match self {
            FieldValue::Text(s) => Some(s.to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Flag(b) => Some(b.to_string()),
            FieldValue::Missing => None,
        }
    }
}

impl From<f64> for FieldValue<'_> {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<Option<f64>> for FieldValue<'_> {
    fn from(value: Option<f64>) -> Self {
        value.map(FieldValue::Number).unwrap_or(FieldValue::Missing)
    }
}

impl<'a> From<&'a str> for FieldValue<'a> {
    fn from(value: &'a str) -> Self {
        FieldValue::text(value)
    }
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map(FieldValue::text).unwrap_or(FieldValue::Missing)
    }
}

impl From<bool> for FieldValue<'_> {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Name of a selectable field, as it appears in fixture files.
pub trait FieldKey {
    fn name(&self) -> &str;
}

impl FieldKey for String {
    fn name(&self) -> &str {
        self
    }
}

/// A flat record whose fields can be read through an enumerated selector.
pub trait Record {
    type Field: FieldKey;

    fn field_value(&self, field: &Self::Field) -> FieldValue<'_>;
}
