//! Tree builder from YAML parse events.

use std::collections::HashMap;

use saphyr_parser::{Event, ScanError, Span, SpannedEventReceiver};

use crate::value::{Entry, Mapping, Scalar, Sequence, Value};

/// Error while loading a document tree.
#[derive(Debug)]
pub enum LoadError {
    /// The YAML scanner rejected the input.
    Scan(ScanError),
    /// The stream contained no document.
    EmptyStream,
    /// The stream contained more than one document.
    MultipleDocuments,
    /// An alias referred to an anchor that was never defined.
    UnknownAnchor(usize),
    /// The event stream was not well nested.
    UnexpectedEvent(&'static str),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Scan(err) => write!(f, "yaml scan error: {}", err),
            LoadError::EmptyStream => write!(f, "stream contains no document"),
            LoadError::MultipleDocuments => write!(f, "stream contains more than one document"),
            LoadError::UnknownAnchor(id) => write!(f, "alias refers to unknown anchor {}", id),
            LoadError::UnexpectedEvent(what) => write!(f, "unexpected event: {}", what),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Scan(err) => Some(err),
            _ => None,
        }
    }
}

/// Builder that folds parser events into a [`Value`] tree.
///
/// Feed it to `saphyr_parser::Parser::load`, then call
/// [`TreeBuilder::finish`].
pub struct TreeBuilder {
    stack: Vec<Frame>,
    roots: Vec<Value>,
    anchors: HashMap<usize, Value>,
    error: Option<LoadError>,
}

enum Frame {
    Sequence {
        items: Vec<Value>,
        aid: usize,
    },
    Mapping {
        entries: Vec<Entry>,
        pending_key: Option<Value>,
        aid: usize,
    },
}

impl TreeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            roots: Vec::new(),
            anchors: HashMap::new(),
            error: None,
        }
    }

    /// Finish building and return the single document root.
    pub fn finish(self) -> Result<Value, LoadError> {
        if let Some(error) = self.error {
            return Err(error);
        }
        if !self.stack.is_empty() {
            return Err(LoadError::UnexpectedEvent("unclosed collection"));
        }
        let mut roots = self.roots;
        match roots.len() {
            0 => Err(LoadError::EmptyStream),
            1 => Ok(roots.remove(0)),
            _ => Err(LoadError::MultipleDocuments),
        }
    }

    /// Attach a completed node to its parent, recording its anchor.
    fn insert(&mut self, value: Value, aid: usize) {
        if aid > 0 {
            self.anchors.insert(aid, value.clone());
        }
        match self.stack.last_mut() {
            Some(Frame::Sequence { items, .. }) => items.push(value),
            Some(Frame::Mapping {
                entries,
                pending_key,
                ..
            }) => match pending_key.take() {
                Some(key) => entries.push(Entry { key, value }),
                None => *pending_key = Some(value),
            },
            None => self.roots.push(value),
        }
    }

    fn fail(&mut self, error: LoadError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<'input> SpannedEventReceiver<'input> for TreeBuilder {
    fn on_event(&mut self, ev: Event<'input>, _span: Span) {
        if self.error.is_some() {
            return;
        }
        match ev {
            Event::Scalar(text, _style, aid, _tag) => {
                self.insert(
                    Value::Scalar(Scalar {
                        text: text.into_owned(),
                    }),
                    aid,
                );
            }
            Event::SequenceStart(aid, _tag) => {
                self.stack.push(Frame::Sequence {
                    items: Vec::new(),
                    aid,
                });
            }
            Event::SequenceEnd => match self.stack.pop() {
                Some(Frame::Sequence { items, aid }) => {
                    self.insert(Value::Sequence(Sequence { items }), aid);
                }
                _ => self.fail(LoadError::UnexpectedEvent("sequence end without start")),
            },
            Event::MappingStart(aid, _tag) => {
                self.stack.push(Frame::Mapping {
                    entries: Vec::new(),
                    pending_key: None,
                    aid,
                });
            }
            Event::MappingEnd => match self.stack.pop() {
                Some(Frame::Mapping {
                    entries,
                    pending_key: None,
                    aid,
                }) => {
                    self.insert(Value::Mapping(Mapping { entries }), aid);
                }
                Some(Frame::Mapping { .. }) => {
                    self.fail(LoadError::UnexpectedEvent("mapping ended inside an entry"));
                }
                _ => self.fail(LoadError::UnexpectedEvent("mapping end without start")),
            },
            Event::Alias(id) => match self.anchors.get(&id) {
                Some(node) => {
                    let node = node.clone();
                    self.insert(node, 0);
                }
                None => self.fail(LoadError::UnknownAnchor(id)),
            },
            // Stream and document boundaries carry no tree content.
            _ => {}
        }
    }
}
