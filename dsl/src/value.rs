//! The runtime value representation shared by the evaluator and the store.
use std::fmt;

use serde::{Deserialize, Serialize};

/// A tagged value produced by expression evaluation.
///
/// `Time` is always an integer count of milliseconds; the `TIME#`/`T#`
/// lexical forms are converted to this representation at literal or
/// coercion time (see `time_literal::parse_time_literal`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Real(f64),
    Time(i64),
    String(String),
}

impl Value {
    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Real(_) | Value::Time(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            Value::Int(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r}"),
            Value::Time(ms) => write!(f, "T#{ms}ms"),
            Value::String(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_when_bool_then_iec_case() {
        assert_eq!(Value::Bool(true).to_string(), "TRUE");
        assert_eq!(Value::Bool(false).to_string(), "FALSE");
    }

    #[test]
    fn is_number_when_time_then_true() {
        assert!(Value::Time(500).is_number());
        assert!(!Value::String("x".into()).is_number());
    }
}
