//! Core error types for jrnl-core.
//!
//! Store-layer failures are [`StoreError`] values. The journal and the store
//! lifecycle wrap them into [`JournalError`] with the operation and entity
//! they happened on, so nothing from the store is ever swallowed.

use std::path::PathBuf;
use thiserror::Error;

use crate::journal::EntryId;

/// Core error type for jrnl-core.
#[derive(Error, Debug)]
pub enum JournalError {
    /// Backing file path or configuration could not be resolved
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Backing file could not be created or inspected
    #[error("Failed to initialize store at {path}: {source}")]
    StoreInitFailed {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    /// Backing file exists but could not be opened for use
    #[error("Failed to open store at {path}: {source}")]
    StoreOpenFailed {
        path: PathBuf,
        #[source]
        source: StoreError,
    },

    /// Another process holds the store
    #[error("Store at {path} is locked by another process")]
    StoreLocked { path: PathBuf },

    /// The store rejected one of the entry's facts
    #[error("Failed to store entry {entry}: {source}")]
    StoreWriteFailed {
        entry: EntryId,
        #[source]
        source: StoreError,
    },

    /// Durability of the entry could not be confirmed
    #[error("Failed to write entry {entry}: {source}")]
    FlushFailed {
        entry: EntryId,
        #[source]
        source: StoreError,
    },

    /// Traversal or iteration over the store failed
    #[error("Failed to query journal: {0}")]
    QueryFailed(#[source] StoreError),

    /// A subject tagged as a journal entry does not decode
    #[error("Malformed entry {subject}: {reason}")]
    MalformedEntry {
        subject: String,
        reason: MalformedReason,
    },

    /// Contents could not be turned into facts
    #[error("Failed to encode entry: {0}")]
    EncodingFailed(String),
}

/// Why a set of facts could not be decoded into an entry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("subject is not an IRI")]
    NotAnIri,

    #[error("missing '{0}' fact")]
    Missing(&'static str),

    #[error("'{predicate}' fact holds a {found} value")]
    WrongKind {
        predicate: &'static str,
        found: &'static str,
    },

    #[error("conflicting '{0}' facts")]
    Conflicting(&'static str),
}

/// Fact store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Statement execution failed
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    /// Filesystem access failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is held by another connection
    #[error("Database is locked")]
    Locked,

    /// Backing file was not created by this store or by a newer version
    #[error("Unsupported schema version {found:?} (expected {expected})")]
    SchemaMismatch { found: Option<String>, expected: u32 },

    /// A quad failed validation before being written
    #[error("Invalid quad: {0}")]
    InvalidQuad(String),

    /// A path step referred to a tag that was never set
    #[error("Unknown tag '{0}' in path")]
    UnknownTag(String),

    /// The write transaction could not be committed
    #[error("Commit failed: {0}")]
    Commit(#[source] rusqlite::Error),

    /// A stored value could not be read back
    #[error("Corrupt value in store: {0}")]
    CorruptValue(String),

    #[error("Store refused exclusive locking (got '{0}')")]
    LockingMode(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// `$HOME` (or the platform equivalent) is unavailable
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// Failed to read the configuration file
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to parse the configuration file
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if matches!(
                    e.code,
                    rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked
                ) =>
            {
                StoreError::Locked
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

impl StoreError {
    /// Whether the failure happened at the commit point of a batch.
    pub fn is_commit(&self) -> bool {
        matches!(self, StoreError::Commit(_))
    }
}

/// Result type alias for JournalError
pub type Result<T, E = JournalError> = std::result::Result<T, E>;
