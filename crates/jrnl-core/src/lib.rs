//! # jrnl Core Library
//!
//! Storage and query layer of a personal append-only journal. Entries are
//! kept as facts in a small quad store and retrieved by creation-time range
//! through graph traversal.
//!
//! ## Architecture
//!
//! - **Graph**: quads, a batching writer with an explicit flush, path
//!   traversal queries, and SQLite / in-memory stores
//! - **Journal**: the entry codec and the append / range-read operations
//! - **Storage**: backing file location, init-once and open, configuration
//!
//! ## Key Components
//!
//! - [`Journal`]: appends entries and reads them back by time range
//! - [`SqliteQuadStore`]: the durable fact store
//! - [`Config`]: user configuration
//! - [`JournalError`]: error taxonomy

pub mod clock;
pub mod error;
pub mod graph;
pub mod journal;
pub mod storage;

pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{ConfigError, JournalError, MalformedReason, Result, StoreError};
pub use graph::{MemoryQuadStore, QuadStore, SqliteQuadStore};
pub use journal::{Entry, EntryId, GetOptions, Journal};
pub use storage::{open_journal, open_store, resolve_db_path, Config, DayBoundary};
