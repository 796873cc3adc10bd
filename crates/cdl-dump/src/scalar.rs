//! Scalar coercion: turning document scalars into typed values.
//!
//! Coercion is strict: the node must be a scalar and its literal text
//! must parse as the requested type, else the parse fails with
//! [`ParseError::ScalarCoercion`] carrying the literal.

use cdl_tree::{Mapping, Sequence, Value};

use crate::error::ParseError;

fn text<'a>(expected: &'static str, value: &'a Value) -> Result<&'a str, ParseError> {
    value.as_str().ok_or_else(|| ParseError::ScalarCoercion {
        expected,
        literal: format!("<{}>", value.kind()),
    })
}

pub(crate) fn as_str<'a>(value: &'a Value) -> Result<&'a str, ParseError> {
    text("string", value)
}

pub(crate) fn as_string(value: &Value) -> Result<String, ParseError> {
    text("string", value).map(str::to_owned)
}

pub(crate) fn as_u32(value: &Value) -> Result<u32, ParseError> {
    let literal = text("u32", value)?;
    literal.parse().map_err(|_| ParseError::ScalarCoercion {
        expected: "u32",
        literal: literal.to_owned(),
    })
}

pub(crate) fn as_u64(value: &Value) -> Result<u64, ParseError> {
    let literal = text("u64", value)?;
    literal.parse().map_err(|_| ParseError::ScalarCoercion {
        expected: "u64",
        literal: literal.to_owned(),
    })
}

/// Boolean literals as the dump writer's YAML layer emits them.
pub(crate) fn as_bool(value: &Value) -> Result<bool, ParseError> {
    let literal = text("bool", value)?;
    match literal.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Ok(true),
        "false" | "no" | "off" => Ok(false),
        _ => Err(ParseError::ScalarCoercion {
            expected: "bool",
            literal: literal.to_owned(),
        }),
    }
}

pub(crate) fn as_mapping<'a>(
    entity: &'static str,
    value: &'a Value,
) -> Result<&'a Mapping, ParseError> {
    value.as_mapping().ok_or(ParseError::Structure {
        entity,
        expected: "mapping",
        found: value.kind(),
    })
}

pub(crate) fn as_sequence<'a>(
    entity: &'static str,
    value: &'a Value,
) -> Result<&'a Sequence, ParseError> {
    value.as_sequence().ok_or(ParseError::Structure {
        entity,
        expected: "sequence",
        found: value.kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_coercion() {
        assert_eq!(as_u32(&Value::scalar("42")).unwrap(), 42);
        assert_eq!(as_u64(&Value::scalar("18446744073709551615")).unwrap(), u64::MAX);
        assert!(as_u32(&Value::scalar("4294967296")).is_err());
        assert!(as_u32(&Value::scalar("-1")).is_err());
        assert!(as_u64(&Value::scalar("six")).is_err());
    }

    #[test]
    fn test_bool_coercion() {
        for literal in ["true", "True", "yes", "on"] {
            assert_eq!(as_bool(&Value::scalar(literal)).unwrap(), true);
        }
        for literal in ["false", "FALSE", "no", "off"] {
            assert_eq!(as_bool(&Value::scalar(literal)).unwrap(), false);
        }
        let err = as_bool(&Value::scalar("maybe")).unwrap_err();
        assert_eq!(
            err,
            ParseError::ScalarCoercion {
                expected: "bool",
                literal: "maybe".to_owned()
            }
        );
    }

    #[test]
    fn test_non_scalar_nodes_fail() {
        let err = as_string(&Value::seq(vec![])).unwrap_err();
        assert_eq!(
            err,
            ParseError::ScalarCoercion {
                expected: "string",
                literal: "<sequence>".to_owned()
            }
        );
    }

    #[test]
    fn test_shape_checks() {
        let err = as_mapping("Device", &Value::scalar("x")).unwrap_err();
        assert_eq!(
            err,
            ParseError::Structure {
                entity: "Device",
                expected: "mapping",
                found: "scalar"
            }
        );
        assert!(as_sequence("Queues", &Value::mapping(vec![])).is_err());
    }
}
