//! Value types for loaded documents.
//!
//! A [`Value`] is one of three node shapes:
//! - [`Scalar`] — the literal text of a YAML scalar, untyped;
//! - [`Sequence`] — ordered child values;
//! - [`Mapping`] — ordered key/value entries, duplicates kept.
//!
//! Scalars carry text only; interpreting that text as a number, bool or
//! handle is the consumer's concern.

/// A node in a loaded document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Scalar text.
    Scalar(Scalar),
    /// Sequence of values.
    Sequence(Sequence),
    /// Mapping of keys to values.
    Mapping(Mapping),
}

/// A scalar node.
#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    /// The literal text content.
    pub text: String,
}

/// A sequence node.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    /// Items in source order.
    pub items: Vec<Value>,
}

/// A mapping node.
///
/// Entries keep source order, and a key that occurs more than once
/// occurs more than once here too.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    /// Entries in source order.
    pub entries: Vec<Entry>,
}

/// One key/value entry in a mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// The key node. YAML permits non-scalar keys, so this is a full
    /// [`Value`]; consumers that require scalar keys check at use.
    pub key: Value,
    /// The value node.
    pub value: Value,
}

impl Value {
    /// Create a scalar value.
    pub fn scalar(text: impl Into<String>) -> Self {
        Value::Scalar(Scalar { text: text.into() })
    }

    /// Create a sequence value.
    pub fn seq(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence { items })
    }

    /// Create a mapping value from key/value pairs.
    pub fn mapping(pairs: Vec<(Value, Value)>) -> Self {
        Value::Mapping(Mapping {
            entries: pairs
                .into_iter()
                .map(|(key, value)| Entry { key, value })
                .collect(),
        })
    }

    /// Get the scalar text, if this is a scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(&s.text),
            _ => None,
        }
    }

    /// Get as sequence.
    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Value::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get as mapping.
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(m) => Some(m),
            _ => None,
        }
    }

    /// The node shape as a noun, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
        }
    }
}

impl Sequence {
    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Iterate over items in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }
}

impl Mapping {
    /// Number of entries, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value for the **first** entry whose key is the scalar `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.key.as_str() == Some(key))
            .map(|entry| &entry.value)
    }

    /// Iterate over entries in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Mapping {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
