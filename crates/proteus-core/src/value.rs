//! Scalar payloads carried by primitive-bearing entities
//!
//! Numbers, booleans and strings are ordinary entities that happen to carry
//! one of these values next to their slots.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive data attached to an entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Scalar {
    /// Integer number
    Integer(i64),

    /// Floating point number
    Float(OrderedFloat<f64>),

    /// Boolean value
    Boolean(bool),

    /// UTF-8 string
    String(String),
}

impl Scalar {
    /// Convert to boolean if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Convert to integer if possible
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to float if possible (integers widen)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Float(f) => Some(f.into_inner()),
            Scalar::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Borrow the string payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is an integer or a float
    pub fn is_number(&self) -> bool {
        matches!(self, Scalar::Integer(_) | Scalar::Float(_))
    }

    /// Type name for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Integer(_) => "Integer",
            Scalar::Float(_) => "Float",
            Scalar::Boolean(_) => "Boolean",
            Scalar::String(_) => "String",
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(fl) => write!(f, "{fl}"),
            Scalar::Boolean(b) => write!(f, "{b}"),
            Scalar::String(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

impl From<i32> for Scalar {
    fn from(i: i32) -> Self {
        Scalar::Integer(i64::from(i))
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(OrderedFloat(f))
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}
