//! SQLite-backed quad store.
//!
//! All quads live in one table with a uniqueness constraint over every
//! column, indexed by `(predicate, object)` for start lookups and by
//! `subject` for out-edges. A batch is one transaction; its commit is the
//! durability point (`synchronous = FULL`).
//!
//! The backing file is created once by [`SqliteQuadStore::init`] and opened
//! by [`SqliteQuadStore::open`], which takes an exclusive lock for the
//! lifetime of the handle.

use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use std::io;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::error::StoreError;

use super::quad::{Iri, Quad, Value};
use super::store::QuadStore;

/// Version written to the `meta` table at init.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA: &str = "
    BEGIN;
    CREATE TABLE IF NOT EXISTS quads (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        subject_kind TEXT NOT NULL,
        subject      TEXT NOT NULL,
        predicate    TEXT NOT NULL,
        object_kind  TEXT NOT NULL,
        object       TEXT NOT NULL,
        label_kind   TEXT NOT NULL DEFAULT '',
        label        TEXT NOT NULL DEFAULT '',
        UNIQUE (subject_kind, subject, predicate, object_kind, object, label_kind, label)
    );

    CREATE INDEX IF NOT EXISTS idx_quads_predicate_object ON quads(predicate, object_kind, object);
    CREATE INDEX IF NOT EXISTS idx_quads_subject ON quads(subject_kind, subject, predicate);

    CREATE TABLE IF NOT EXISTS meta (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
    INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', '1');
    COMMIT;
";

/// Durable quad store in a single SQLite file.
pub struct SqliteQuadStore {
    conn: Connection,
}

impl SqliteQuadStore {
    /// Create the backing file with its schema unless it already exists.
    ///
    /// The schema is built in a temporary file beside `path` and moved into
    /// place without replacing anything, so `path` is either absent or fully
    /// initialized. Returns `true` if this call created the file.
    ///
    /// # Errors
    /// Returns an error if `path` cannot be inspected or the file cannot be
    /// created.
    pub fn init(path: &Path) -> Result<bool, StoreError> {
        match std::fs::metadata(path) {
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let staging = tempfile::Builder::new()
            .prefix(".jrnl-init-")
            .suffix(".db")
            .tempfile_in(dir)?;
        let conn = Connection::open(staging.path())?;
        conn.execute_batch(SCHEMA)?;
        conn.close().map_err(|(_, e)| StoreError::from(e))?;

        match staging.persist_noclobber(path) {
            Ok(_) => {
                debug!(path = %path.display(), "initialized quad store");
                Ok(true)
            }
            // Someone else initialized it first.
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => Ok(false),
            Err(e) => Err(StoreError::Io(e.error)),
        }
    }

    /// Open an initialized backing file and lock it exclusively.
    ///
    /// Never creates the file. Fails with [`StoreError::Locked`] at once if
    /// another connection holds it.
    ///
    /// # Errors
    /// Returns an error if the file is missing, locked, or carries an
    /// unexpected schema version.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(Duration::ZERO)?;
        let mode = conn.pragma_update_and_check(None, "locking_mode", "EXCLUSIVE", |row| {
            row.get::<_, String>(0)
        })?;
        ensure_exclusive(&mode)?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        // In exclusive locking mode the lock taken here is held until close.
        conn.execute_batch("BEGIN EXCLUSIVE; COMMIT;")?;

        let store = Self { conn };
        store.check_schema()?;
        debug!(path = %path.display(), "opened quad store");
        Ok(store)
    }

    /// Open a private in-memory store with the schema applied.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Number of stored quads.
    pub fn len(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quads", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|_| StoreError::CorruptValue(format!("quad count {count}")))
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Close the connection and release the lock, reporting any failure.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))
    }

    fn check_schema(&self) -> Result<(), StoreError> {
        let has_meta: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = 'meta'",
            [],
            |row| row.get(0),
        )?;
        let found: Option<String> = if has_meta {
            self.conn
                .query_row(
                    "SELECT value FROM meta WHERE key = 'schema_version'",
                    [],
                    |row| row.get(0),
                )
                .optional()?
        } else {
            None
        };

        if found.as_deref() == Some(SCHEMA_VERSION.to_string().as_str()) {
            Ok(())
        } else {
            Err(StoreError::SchemaMismatch {
                found,
                expected: SCHEMA_VERSION,
            })
        }
    }
}

/// SQLite answers the `locking_mode` pragma with the mode it applied.
fn ensure_exclusive(mode: &str) -> Result<(), StoreError> {
    if mode.eq_ignore_ascii_case("exclusive") {
        Ok(())
    } else {
        Err(StoreError::LockingMode(mode.to_string()))
    }
}

fn label_parts(label: Option<&Value>) -> (&'static str, String) {
    match label {
        Some(value) => (value.kind(), value.lexical()),
        None => ("", String::new()),
    }
}

impl QuadStore for SqliteQuadStore {
    fn apply(&mut self, quads: &[Quad]) -> Result<(), StoreError> {
        for quad in quads {
            quad.validate()?;
        }

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR IGNORE INTO quads
                    (subject_kind, subject, predicate, object_kind, object, label_kind, label)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for quad in quads {
                let (label_kind, label) = label_parts(quad.label.as_ref());
                stmt.execute(params![
                    quad.subject.kind(),
                    quad.subject.lexical(),
                    quad.predicate.as_str(),
                    quad.object.kind(),
                    quad.object.lexical(),
                    label_kind,
                    label,
                ])?;
            }
        }
        tx.commit().map_err(StoreError::Commit)?;

        debug!(count = quads.len(), "applied quad batch");
        Ok(())
    }

    fn subjects_with(&self, predicate: &Iri, object: &Value) -> Result<Vec<Value>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT subject_kind, subject FROM quads
             WHERE predicate = ?1 AND object_kind = ?2 AND object = ?3
             ORDER BY id",
        )?;
        let rows = stmt.query_map(
            params![predicate.as_str(), object.kind(), object.lexical()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        rows.map(|row| {
            let (kind, lexical) = row?;
            Value::from_parts(&kind, lexical)
        })
        .collect()
    }

    fn objects_of(&self, subject: &Value, predicate: &Iri) -> Result<Vec<Value>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT object_kind, object FROM quads
             WHERE subject_kind = ?1 AND subject = ?2 AND predicate = ?3
             ORDER BY id",
        )?;
        let rows = stmt.query_map(
            params![subject.kind(), subject.lexical(), predicate.as_str()],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
        )?;

        rows.map(|row| {
            let (kind, lexical) = row?;
            Value::from_parts(&kind, lexical)
        })
        .collect()
    }

    fn quads_about(&self, subject: &Value) -> Result<Vec<Quad>, StoreError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT predicate, object_kind, object, label_kind, label FROM quads
             WHERE subject_kind = ?1 AND subject = ?2
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![subject.kind(), subject.lexical()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        rows.map(|row| {
            let (predicate, object_kind, object, label_kind, label) = row?;
            let label = if label_kind.is_empty() {
                None
            } else {
                Some(Value::from_parts(&label_kind, label)?)
            };
            Ok(Quad {
                subject: subject.clone(),
                predicate: Iri::new(predicate),
                object: Value::from_parts(&object_kind, object)?,
                label,
            })
        })
        .collect()
    }
}
