//! Lenient accessors for loosely typed API payloads.
//!
//! The listing API is not consistent about numbers: counters and ids arrive
//! as JSON numbers on some endpoints and as numeric strings on others.

use serde_json::Value;

/// Read a non-negative integer from a number or a numeric string.
pub(crate) fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a signed integer from a number or a numeric string.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.fract() == 0.0)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read an identifier, normalizing integers to their decimal form.
pub(crate) fn as_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a string field of an object, treating null and absence alike.
pub(crate) fn str_field<'a>(object: &'a Value, key: &str) -> Option<&'a str> {
    object.get(key).and_then(Value::as_str)
}

/// Read a nested object, yielding `Value::Null` when absent.
pub(crate) fn object_field<'a>(object: &'a Value, key: &str) -> &'a Value {
    object.get(key).unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_u64_accepts_numbers_and_strings() {
        assert_eq!(as_u64(&json!(41)), Some(41));
        assert_eq!(as_u64(&json!("41")), Some(41));
        assert_eq!(as_u64(&json!(" 7 ")), Some(7));
        assert_eq!(as_u64(&json!(20.0)), Some(20));
        assert_eq!(as_u64(&json!(-1)), None);
        assert_eq!(as_u64(&json!(2.5)), None);
        assert_eq!(as_u64(&json!(null)), None);
        assert_eq!(as_u64(&json!("abc")), None);
    }

    #[test]
    fn test_as_i64() {
        assert_eq!(as_i64(&json!(-3)), Some(-3));
        assert_eq!(as_i64(&json!("12")), Some(12));
        assert_eq!(as_i64(&json!(true)), None);
    }

    #[test]
    fn test_as_id_normalizes_integers() {
        assert_eq!(as_id(&json!(1234)), Some("1234".to_string()));
        assert_eq!(as_id(&json!("a1b2")), Some("a1b2".to_string()));
        assert_eq!(as_id(&json!("  ")), None);
        assert_eq!(as_id(&json!(null)), None);
    }

    #[test]
    fn test_object_field_missing_is_null() {
        let v = json!({"a": {"b": 1}});
        assert_eq!(object_field(&v, "a"), &json!({"b": 1}));
        assert!(object_field(&v, "z").is_null());
        assert_eq!(str_field(&json!({"k": "v"}), "k"), Some("v"));
    }
}
