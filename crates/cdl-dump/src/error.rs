//! Error types for dump parsing.
//!
//! Every failure is fail-fast: the first error aborts the whole parse
//! and no partial model is returned.

use crate::discover::DiscoverError;
use crate::handle::Handle;

/// A schema violation found while parsing a dump document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// A node did not have the expected shape.
    Structure {
        /// Entity being parsed when the mismatch was found.
        entity: &'static str,
        /// The shape that was required.
        expected: &'static str,
        /// The shape that was found.
        found: &'static str,
    },
    /// A mapping contained a key outside the entity's recognized set.
    UnknownField {
        /// Entity whose key set was violated.
        entity: &'static str,
        /// The offending key.
        key: String,
    },
    /// A settings key occurred more than once.
    DuplicateSetting {
        /// The repeated key.
        key: String,
    },
    /// A handle literal did not match `0x<hex> [<name>]`.
    HandleFormat {
        /// The offending literal, verbatim.
        literal: String,
    },
    /// A scalar could not be coerced to the required type.
    ScalarCoercion {
        /// The required type.
        expected: &'static str,
        /// The offending literal, verbatim.
        literal: String,
    },
    /// A device populated both its command-buffer lists.
    ///
    /// A device report is either a full snapshot (`AllCommandBuffers`)
    /// or an incomplete-only snapshot (`IncompleteCommandBuffers`),
    /// never both.
    ConflictingCommandBufferLists {
        /// Handle of the offending device.
        device: Handle,
    },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Structure {
                entity,
                expected,
                found,
            } => {
                write!(f, "{}: expected {}, found {}", entity, expected, found)
            }
            ParseError::UnknownField { entity, key } => {
                write!(f, "unknown {} key: {}", entity, key)
            }
            ParseError::DuplicateSetting { key } => {
                write!(f, "duplicate settings key: {}", key)
            }
            ParseError::HandleFormat { literal } => {
                write!(f, "bad handle value: {}", literal)
            }
            ParseError::ScalarCoercion { expected, literal } => {
                write!(f, "expected {}, found `{}`", expected, literal)
            }
            ParseError::ConflictingCommandBufferLists { device } => {
                write!(
                    f,
                    "device {}: both AllCommandBuffers and IncompleteCommandBuffers are populated",
                    device
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Any failure on the way from a search root to a parsed model.
#[derive(Debug)]
pub enum Error {
    /// Locating the dump file failed.
    Discover(DiscoverError),
    /// Reading the dump file failed.
    Io(std::io::Error),
    /// The YAML stream could not be loaded into a tree.
    Load(cdl_tree::LoadError),
    /// The document violated the dump schema.
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Discover(err) => write!(f, "discovery failed: {}", err),
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::Load(err) => write!(f, "load failed: {}", err),
            Error::Parse(err) => write!(f, "parse failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Discover(err) => Some(err),
            Error::Io(err) => Some(err),
            Error::Load(err) => Some(err),
            Error::Parse(err) => Some(err),
        }
    }
}

impl From<DiscoverError> for Error {
    fn from(err: DiscoverError) -> Self {
        Error::Discover(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<cdl_tree::LoadError> for Error {
    fn from(err: cdl_tree::LoadError) -> Self {
        Error::Load(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}
