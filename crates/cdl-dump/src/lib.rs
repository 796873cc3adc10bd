//! Strict parser for crash-diagnostic dump files.
//!
//! A dump file is a YAML snapshot of live graphics-API state at the
//! moment of a crash: the instance, logical devices, queues, in-flight
//! command buffers, their recorded commands, queue submissions, and
//! synchronization primitives. This crate turns such a document into a
//! fully typed, immutable [`DumpFile`] model.
//!
//! The parser is *closed-world*: every mapping key at every nesting
//! level must belong to its entity's recognized set, and any other key
//! fails the whole parse. Parsing a dump therefore doubles as a schema
//! conformance check on the file the instrumentation layer wrote.
//!
//! Parsing is a single synchronous pass over an already-loaded node
//! tree; nothing is shared between invocations, so separate documents
//! may be parsed on separate threads freely.
//!
//! ```no_run
//! let dump = cdl_dump::from_search_root(std::path::Path::new("out/"))?;
//! for device in &dump.devices {
//!     println!("{}: {} queues", device.handle, device.queues.len());
//! }
//! # Ok::<(), cdl_dump::Error>(())
//! ```

pub mod discover;
mod error;
mod handle;
mod model;
mod parse;
mod scalar;

use std::path::Path;

pub use discover::{DUMP_FILE_NAME, DiscoverError, find_dump_file};
pub use error::{Error, ParseError};
pub use handle::Handle;
pub use model::{
    Command, CommandBuffer, Device, DumpFile, Instance, Queue, SemaphoreInfo, Submit, SubmitInfo,
};
pub use parse::parse_dump;

/// Parse a dump document from YAML text.
pub fn from_str(source: &str) -> Result<DumpFile, Error> {
    let root = cdl_tree::parse(source)?;
    Ok(parse::parse_dump(&root)?)
}

/// Read and parse the dump file at `path`.
pub fn from_file(path: &Path) -> Result<DumpFile, Error> {
    tracing::debug!(path = %path.display(), "reading dump file");
    let source = std::fs::read_to_string(path)?;
    from_str(&source)
}

/// Locate the unique dump file under `root`, then read and parse it.
pub fn from_search_root(root: &Path) -> Result<DumpFile, Error> {
    let path = discover::find_dump_file(root)?;
    from_file(&path)
}
