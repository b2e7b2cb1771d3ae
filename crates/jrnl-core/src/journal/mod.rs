//! Append-only journal over a quad store.
//!
//! Entries are written as facts (see [`entry`]) and read back by traversing
//! the graph from the `is-a journal-entry` facts, optionally bounded by
//! creation time (see [`GetOptions`]). The journal keeps no copy of its
//! own; every read goes to the store.
//!
//! ## Usage
//! ```rust,ignore
//! use jrnl_core::journal::{GetOptions, Journal};
//!
//! let mut journal = Journal::new(store);
//! journal.add_entry("breakfast")?;
//! let today = journal.get(&GetOptions::between(midnight, midnight + Duration::days(1)))?;
//! ```

pub mod entry;
mod query;

pub use entry::{decode, encode, Entry, EntryId};
pub use query::GetOptions;

use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{JournalError, Result};
use crate::graph::{Iri, QuadStore, QuadWriter, Value};

/// Appends and queries journal entries in an owned store.
pub struct Journal<S, C = SystemClock> {
    store: S,
    clock: C,
}

impl<S: QuadStore> Journal<S> {
    /// Journal stamping entries with the system clock.
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: SystemClock,
        }
    }
}

impl<S: QuadStore, C: Clock> Journal<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give the store back, e.g. to close it explicitly.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Append an entry and make it durable.
    ///
    /// Empty or whitespace-only contents are skipped without touching the
    /// store and yield `Ok(None)`. Otherwise all facts of the entry are
    /// flushed together: either the whole entry is stored or none of it.
    ///
    /// # Errors
    /// Returns [`JournalError::StoreWriteFailed`] if the store rejects a fact
    /// and [`JournalError::FlushFailed`] if the batch could not be committed.
    /// A failed write may be retried; the retry gets a new ID.
    pub fn add_entry(&mut self, contents: &str) -> Result<Option<EntryId>> {
        if contents.trim().is_empty() {
            warn!("empty journal input, nothing to store");
            return Ok(None);
        }

        let (entry, quads) = encode(contents, self.clock.now())?;

        let mut writer = QuadWriter::new(&mut self.store);
        writer
            .add_quads(quads)
            .map_err(|source| JournalError::StoreWriteFailed {
                entry: entry.id.clone(),
                source,
            })?;
        writer.flush().map_err(|source| {
            if source.is_commit() {
                JournalError::FlushFailed {
                    entry: entry.id.clone(),
                    source,
                }
            } else {
                JournalError::StoreWriteFailed {
                    entry: entry.id.clone(),
                    source,
                }
            }
        })?;

        info!(entry = %entry.id, created_at = %entry.created_at, "stored journal entry");
        Ok(Some(entry.id))
    }

    /// Entries whose creation time lies in the requested range.
    ///
    /// The order of the result is whatever the store yields; sort it if
    /// order matters.
    ///
    /// # Errors
    /// Returns [`JournalError::QueryFailed`] if the store cannot be read and
    /// [`JournalError::MalformedEntry`] if a tagged subject does not decode.
    pub fn get(&self, options: &GetOptions) -> Result<Vec<Entry>> {
        let subjects = options
            .to_path()
            .execute(&self.store)
            .map_err(JournalError::QueryFailed)?;
        if options.is_bounded() {
            self.check_unselected(&subjects)?;
        }

        let mut entries = Vec::with_capacity(subjects.len());
        for subject in subjects {
            let quads = self
                .store
                .quads_about(&subject)
                .map_err(JournalError::QueryFailed)?;
            entries.push(decode(&subject, &quads)?);
        }

        debug!(count = entries.len(), ?options, "queried journal");
        Ok(entries)
    }

    /// Bound filters drop entries whose `created-at` is missing or not a
    /// time. Surface those as malformed instead of leaving them out.
    fn check_unselected(&self, selected: &[Value]) -> Result<()> {
        let selected: HashSet<&Value> = selected.iter().collect();
        let created_at = Iri::from(entry::PRED_CREATED_AT);
        let tagged = GetOptions::all()
            .to_path()
            .execute(&self.store)
            .map_err(JournalError::QueryFailed)?;

        for subject in tagged.iter().filter(|s| !selected.contains(s)) {
            let stamps = self
                .store
                .objects_of(subject, &created_at)
                .map_err(JournalError::QueryFailed)?;
            if !matches!(stamps.as_slice(), [Value::Time(_)]) {
                let quads = self
                    .store
                    .quads_about(subject)
                    .map_err(JournalError::QueryFailed)?;
                decode(subject, &quads)?;
            }
        }
        Ok(())
    }
}
