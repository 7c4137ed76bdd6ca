//! Canonical-form JSON byte serialization.
//!
//! Delegates to `serde_jcs` (RFC 8785) rather than walking
//! `serde_json::Value` by hand: a hand-rolled walk over `Value` cannot
//! reject non-finite floats because `serde_json` has already collapsed
//! `NaN`/`Infinity` to `null` by the time a `Value` exists. `serde_jcs`
//! catches it during serialization instead.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while canonicalizing a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanonError {
    /// Serialization failed, most commonly because the value contained
    /// a non-finite number (`NaN` or `+/-Infinity`).
    #[error("failed to canonicalize value: {0}")]
    Serialize(String),
}

/// Canonicalizes `value` into RFC 8785 JSON Canonicalization Scheme
/// bytes: object keys sorted, numbers in canonical form, arrays kept
/// in their given order.
///
/// # Errors
///
/// Returns [`CanonError::Serialize`] if `value` cannot be serialized,
/// including when it contains a non-finite number.
pub fn canonicalize<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, CanonError> {
    serde_jcs::to_vec(value).map_err(|err| CanonError::Serialize(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::canonicalize;
    use serde_json::json;

    #[test]
    fn key_order_independence_yields_equal_bytes() {
        let a = canonicalize(&json!({"a": 1, "b": 2})).unwrap();
        let b = canonicalize(&json!({"b": 2, "a": 1})).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn preserves_array_order() {
        let canon = canonicalize(&json!([3, 1, 2])).unwrap();
        assert_eq!(canon, br#"[3,1,2]"#.to_vec());
    }

    #[test]
    fn rejects_non_finite_numbers() {
        #[derive(serde::Serialize)]
        struct HasNan {
            x: f64,
        }
        let result = canonicalize(&HasNan { x: f64::NAN });
        assert!(result.is_err());
    }

    #[test]
    fn integers_and_equal_floats_are_distinguished_consistently() {
        let int_form = canonicalize(&json!({"v": 1})).unwrap();
        let float_form = canonicalize(&json!({"v": 1.0})).unwrap();
        assert_eq!(int_form, float_form, "JCS normalizes 1 and 1.0 identically");
    }
}
