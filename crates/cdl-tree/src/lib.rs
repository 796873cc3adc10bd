//! Document tree representation for crash-dump YAML files.
//!
//! This crate loads a YAML document into a read-only tree of nodes
//! (mapping / sequence / scalar) that preserves two things a
//! serde-style mapping API would throw away:
//!
//! - **entry order** — sequences and mapping entries keep source order,
//!   which is semantically meaningful in dump files (command order,
//!   submission order);
//! - **duplicate keys** — a mapping keeps every occurrence of a key, so
//!   consumers can choose their own duplicate policy per entity.
//!
//! The loader is strict about stream shape: exactly one YAML document,
//! and every alias must refer to a known anchor.

mod builder;
mod value;

pub use builder::{LoadError, TreeBuilder};
pub use value::{Entry, Mapping, Scalar, Sequence, Value};

/// Parse a YAML document into a tree.
///
/// The stream must contain exactly one document; its root becomes the
/// returned [`Value`].
pub fn parse(source: &str) -> Result<Value, LoadError> {
    tracing::debug!(len = source.len(), "loading yaml document");
    let mut parser = saphyr_parser::Parser::new_from_str(source);
    let mut builder = TreeBuilder::new();
    parser.load(&mut builder, true).map_err(LoadError::Scan)?;
    builder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar_root() {
        let value = parse("hello").unwrap();
        assert_eq!(value.as_str(), Some("hello"));
    }

    #[test]
    fn test_parse_mapping_preserves_order() {
        let value = parse("b: 1\na: 2\nc: 3").unwrap();
        let mapping = value.as_mapping().unwrap();
        let keys: Vec<_> = mapping
            .iter()
            .map(|entry| entry.key.as_str().unwrap())
            .collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_parse_mapping_preserves_duplicates() {
        let value = parse("a: 1\na: 2").unwrap();
        let mapping = value.as_mapping().unwrap();
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("a").and_then(Value::as_str), Some("1"));
    }

    #[test]
    fn test_parse_nested() {
        let value = parse("outer:\n  inner:\n    - 1\n    - 2").unwrap();
        let inner = value
            .as_mapping()
            .and_then(|m| m.get("outer"))
            .and_then(Value::as_mapping)
            .and_then(|m| m.get("inner"))
            .and_then(Value::as_sequence)
            .unwrap();
        assert_eq!(inner.len(), 2);
        assert_eq!(inner.get(1).and_then(Value::as_str), Some("2"));
    }

    #[test]
    fn test_parse_alias_resolves() {
        let value = parse("base: &b shared\nother: *b").unwrap();
        let mapping = value.as_mapping().unwrap();
        assert_eq!(mapping.get("other").and_then(Value::as_str), Some("shared"));
    }

    #[test]
    fn test_parse_rejects_multiple_documents() {
        let err = parse("a: 1\n---\nb: 2").unwrap_err();
        assert!(matches!(err, LoadError::MultipleDocuments));
    }

    #[test]
    fn test_parse_rejects_empty_stream() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, LoadError::EmptyStream));
    }
}
