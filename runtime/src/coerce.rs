//! Coercion rules between the tagged [`Value`] and the primitive
//! representations the evaluator and executor need (`spec.md` §4.2).
use scanvm_dsl::time_literal::parse_time_literal;
use scanvm_dsl::value::Value;

/// `bool → self; number → ≠ 0; string → length > 0`.
pub fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        Value::Real(r) => *r != 0.0,
        Value::Time(t) => *t != 0,
        Value::String(s) => !s.is_empty(),
    }
}

/// `number → self; bool → 1/0; string → TIME literal or parseFloat,
/// invalid → 0`.
pub fn to_number(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        Value::Int(i) => *i as f64,
        Value::Real(r) => *r,
        Value::Time(t) => *t as f64,
        Value::String(s) => {
            if let Some(ms) = parse_time_literal(s) {
                ms as f64
            } else {
                s.trim().parse::<f64>().unwrap_or(0.0)
            }
        }
    }
}

/// `string → self; bool → "TRUE"/"FALSE"; number → decimal text`.
pub fn to_string(value: &Value) -> String {
    match value {
        Value::Bool(b) => {
            if *b {
                "TRUE".to_string()
            } else {
                "FALSE".to_string()
            }
        }
        Value::Int(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Time(t) => t.to_string(),
        Value::String(s) => s.clone(),
    }
}

/// Truncates toward zero, the IEC-compliant REAL-to-INT rounding rule
/// used for assignment into INT/TIME storage (§4.3).
pub fn trunc_to_i64(value: f64) -> i64 {
    value.trunc() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_bool_when_nonempty_string_then_true() {
        assert!(to_bool(&Value::String("x".into())));
        assert!(!to_bool(&Value::String("".into())));
    }

    #[test]
    fn to_number_when_time_literal_string_then_parses() {
        assert_eq!(to_number(&Value::String("T#500ms".into())), 500.0);
    }

    #[test]
    fn to_number_when_invalid_string_then_zero() {
        assert_eq!(to_number(&Value::String("not a number".into())), 0.0);
    }

    #[test]
    fn to_string_when_bool_then_iec_literal() {
        assert_eq!(to_string(&Value::Bool(true)), "TRUE");
        assert_eq!(to_string(&Value::Bool(false)), "FALSE");
    }

    #[test]
    fn trunc_to_i64_when_negative_fraction_then_truncates_toward_zero() {
        assert_eq!(trunc_to_i64(-1.9), -1);
        assert_eq!(trunc_to_i64(1.9), 1);
    }
}
