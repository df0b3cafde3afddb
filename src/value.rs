pub use sea_query::{Value, Values};

/// Whether the value is a typed SQL `NULL`
pub fn is_null(value: &Value) -> bool {
    matches!(
        value,
        Value::Bool(None)
            | Value::TinyInt(None)
            | Value::SmallInt(None)
            | Value::Int(None)
            | Value::BigInt(None)
            | Value::TinyUnsigned(None)
            | Value::SmallUnsigned(None)
            | Value::Unsigned(None)
            | Value::BigUnsigned(None)
            | Value::Float(None)
            | Value::Double(None)
            | Value::String(None)
            | Value::Char(None)
            | Value::Bytes(None)
            | Value::ChronoDate(None)
            | Value::ChronoTime(None)
            | Value::ChronoDateTime(None)
            | Value::ChronoDateTimeUtc(None)
            | Value::ChronoDateTimeLocal(None)
            | Value::ChronoDateTimeWithTimeZone(None)
    )
}

/// Whether the value is `NULL` or the zero value of its type; such a value carries no identity
pub fn is_zero(value: &Value) -> bool {
    if is_null(value) {
        return true;
    }
    match value {
        Value::TinyInt(Some(v)) => *v == 0,
        Value::SmallInt(Some(v)) => *v == 0,
        Value::Int(Some(v)) => *v == 0,
        Value::BigInt(Some(v)) => *v == 0,
        Value::TinyUnsigned(Some(v)) => *v == 0,
        Value::SmallUnsigned(Some(v)) => *v == 0,
        Value::Unsigned(Some(v)) => *v == 0,
        Value::BigUnsigned(Some(v)) => *v == 0,
        Value::String(Some(v)) => v.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    #[test]
    fn null_values() {
        assert!(is_null(&Value::Int(None)));
        assert!(is_null(&Option::<String>::None.into()));
        assert!(is_null(&Option::<DateTime<Utc>>::None.into()));
        assert!(!is_null(&Value::from(0)));
        assert!(!is_null(&Value::from("")));
    }

    #[test]
    fn zero_values() {
        assert!(is_zero(&Value::from(0)));
        assert!(is_zero(&Value::from(0u64)));
        assert!(is_zero(&Value::from("")));
        assert!(is_zero(&Value::BigInt(None)));
        assert!(!is_zero(&Value::from(1)));
        assert!(!is_zero(&Value::from("a")));
        assert!(!is_zero(&Value::from(false)));
    }
}
