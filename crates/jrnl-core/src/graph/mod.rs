//! Fact store: quads, batched writes and path traversal.
//!
//! ## Usage
//! ```rust,ignore
//! use jrnl_core::graph::{Path, Quad, QuadStore, QuadWriter, SqliteQuadStore, Value};
//!
//! SqliteQuadStore::init(&path)?;
//! let mut store = SqliteQuadStore::open(&path)?;
//!
//! let mut writer = QuadWriter::new(&mut store);
//! writer.add_quad(Quad::new(Value::iri("note-1"), "is-a", Value::iri("note")))?;
//! writer.flush()?;
//!
//! let notes = Path::has("is-a", Value::iri("note")).execute(&store)?;
//! ```

mod memory;
mod path;
mod quad;
mod sqlite;
mod store;

pub use memory::MemoryQuadStore;
pub use path::Path;
pub use quad::{CompareOp, Iri, Quad, Value};
pub use sqlite::{SqliteQuadStore, SCHEMA_VERSION};
pub use store::{QuadStore, QuadWriter};
