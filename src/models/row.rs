use std::collections::BTreeMap;
use std::fmt;

use crate::error::ProjectionError;
use crate::models::filter::parse_truthy;

/// A single column value as returned by a storage backend.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Int(int) => write!(f, "{int}"),
            FieldValue::Float(float) => write!(f, "{float}"),
            FieldValue::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

/// Column name to value, one per returned row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StorageRow {
    fields: BTreeMap<String, FieldValue>,
}

impl StorageRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<FieldValue>) {
        self.fields.insert(column.to_string(), value.into());
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.fields.get(column)
    }

    /// Best-effort string; absent and null columns read as `""`.
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(ToString::to_string).unwrap_or_default()
    }

    /// Best-effort truthiness; absent and null columns read as `false`.
    pub fn truthy(&self, column: &str) -> bool {
        match self.get(column) {
            Some(FieldValue::Bool(flag)) => *flag,
            Some(FieldValue::Int(int)) => *int != 0,
            Some(FieldValue::Float(float)) => *float != 0.0,
            Some(FieldValue::Text(text)) => parse_truthy(text),
            Some(FieldValue::Null) | None => false,
        }
    }

    /// Strict integer read. Integral floats and numeric text are accepted.
    pub fn integer(&self, column: &'static str) -> Result<i64, ProjectionError> {
        let invalid = |value: &FieldValue| ProjectionError::InvalidNumber {
            column,
            value: value.to_string(),
        };

        match self.get(column) {
            None | Some(FieldValue::Null) => Err(ProjectionError::MissingColumn(column)),
            Some(FieldValue::Int(int)) => Ok(*int),
            Some(value @ FieldValue::Float(float)) => {
                if float.is_finite() && float.fract() == 0.0 {
                    Ok(*float as i64)
                } else {
                    Err(invalid(value))
                }
            }
            Some(value @ FieldValue::Text(text)) => {
                text.trim().parse::<i64>().map_err(|_| invalid(value))
            }
            Some(value @ FieldValue::Bool(_)) => Err(invalid(value)),
        }
    }

    /// Reads the column's string form as a finite float.
    pub fn finite_float(&self, column: &'static str) -> Result<f64, ProjectionError> {
        let value = match self.get(column) {
            None | Some(FieldValue::Null) => return Err(ProjectionError::MissingColumn(column)),
            Some(value) => value,
        };

        let parsed = match value {
            FieldValue::Float(float) => Some(*float),
            FieldValue::Int(int) => Some(*int as f64),
            FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
            FieldValue::Bool(_) | FieldValue::Null => None,
        };

        match parsed {
            Some(number) if number.is_finite() => Ok(number),
            _ => Err(ProjectionError::InvalidNumber {
                column,
                value: value.to_string(),
            }),
        }
    }
}
