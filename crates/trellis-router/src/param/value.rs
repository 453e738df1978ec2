use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A value parsed from, or rendered into, path segments
///
/// Every [`PathParam`](crate::PathParam) produces exactly one of these shapes,
/// described by its [`ValueType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathValue {
    Text(String),
    Segments(Vec<String>),
    Date(NaiveDate),
    Integer(i64),
    Optional(Option<Box<PathValue>>),
}

impl PathValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PathValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_segments(&self) -> Option<&[String]> {
        match self {
            PathValue::Segments(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PathValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PathValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Wraps a value as a present optional
    pub fn some(value: PathValue) -> Self {
        PathValue::Optional(Some(Box::new(value)))
    }

    /// The absent optional value
    pub fn none() -> Self {
        PathValue::Optional(None)
    }
}

impl fmt::Display for PathValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathValue::Text(s) => f.write_str(s),
            PathValue::Segments(s) => write!(f, "[{}]", s.join(", ")),
            PathValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            PathValue::Integer(n) => write!(f, "{}", n),
            PathValue::Optional(Some(v)) => write!(f, "Some({})", v),
            PathValue::Optional(None) => f.write_str("None"),
        }
    }
}

impl From<&str> for PathValue {
    fn from(value: &str) -> Self {
        PathValue::Text(value.to_string())
    }
}

impl From<String> for PathValue {
    fn from(value: String) -> Self {
        PathValue::Text(value)
    }
}

impl From<Vec<String>> for PathValue {
    fn from(value: Vec<String>) -> Self {
        PathValue::Segments(value)
    }
}

impl From<NaiveDate> for PathValue {
    fn from(value: NaiveDate) -> Self {
        PathValue::Date(value)
    }
}

impl From<i64> for PathValue {
    fn from(value: i64) -> Self {
        PathValue::Integer(value)
    }
}

/// The declared value type of a path parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Text,
    Segments,
    Date,
    Integer,
    Optional(Box<ValueType>),
}

impl ValueType {
    /// Tests if a value has this type
    pub fn accepts(&self, value: &PathValue) -> bool {
        match (self, value) {
            (ValueType::Text, PathValue::Text(_))
            | (ValueType::Segments, PathValue::Segments(_))
            | (ValueType::Date, PathValue::Date(_))
            | (ValueType::Integer, PathValue::Integer(_)) => true,
            (ValueType::Optional(_), PathValue::Optional(None)) => true,
            (ValueType::Optional(inner), PathValue::Optional(Some(v))) => inner.accepts(v),
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Text => f.write_str("String"),
            ValueType::Segments => f.write_str("Segments"),
            ValueType::Date => f.write_str("Date"),
            ValueType::Integer => f.write_str("Integer"),
            ValueType::Optional(inner) => write!(f, "Option<{}>", inner),
        }
    }
}
