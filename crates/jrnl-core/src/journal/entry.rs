//! Journal entries and their fact representation.
//!
//! An entry is exactly three facts about its ID:
//!
//! | predicate    | object                     |
//! |--------------|----------------------------|
//! | `created-at` | time of creation (UTC)     |
//! | `contents`   | the entry text             |
//! | `is-a`       | IRI `journal-entry`        |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{JournalError, MalformedReason, Result};
use crate::graph::{Iri, Quad, Value};

pub const PRED_CREATED_AT: &str = "created-at";
pub const PRED_CONTENTS: &str = "contents";
pub const PRED_IS_A: &str = "is-a";
pub const JOURNAL_ENTRY: &str = "journal-entry";

/// Unique identifier for a journal entry: a random UUID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The graph node this entry's facts hang off.
    pub fn subject(&self) -> Value {
        Value::iri(self.0.as_str())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single journal record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub created_at: DateTime<Utc>,
    pub contents: String,
}

impl Entry {
    /// The `created-at` and `contents` facts.
    pub fn descriptive_quads(&self) -> [Quad; 2] {
        let subject = self.id.subject();
        [
            Quad::new(subject.clone(), PRED_CREATED_AT, self.created_at),
            Quad::new(subject, PRED_CONTENTS, self.contents.as_str()),
        ]
    }

    /// The `is-a journal-entry` fact.
    pub fn type_quad(&self) -> Quad {
        Quad::new(self.id.subject(), PRED_IS_A, Value::iri(JOURNAL_ENTRY))
    }
}

/// Build a new entry stamped `now` and the facts that represent it.
///
/// # Errors
/// Returns [`JournalError::EncodingFailed`] for empty contents.
pub fn encode(contents: &str, now: DateTime<Utc>) -> Result<(Entry, Vec<Quad>)> {
    if contents.is_empty() {
        return Err(JournalError::EncodingFailed("entry contents are empty".into()));
    }

    let entry = Entry {
        id: EntryId::generate(),
        created_at: now,
        contents: contents.to_string(),
    };
    let [created_at, body] = entry.descriptive_quads();
    let quads = vec![created_at, body, entry.type_quad()];
    Ok((entry, quads))
}

/// Rebuild an entry from the facts about `subject`.
///
/// Facts about other subjects and unknown predicates are ignored.
///
/// # Errors
/// Returns [`JournalError::MalformedEntry`] if the subject is not an IRI or
/// a required fact is missing, of the wrong kind, or conflicting.
pub fn decode(subject: &Value, quads: &[Quad]) -> Result<Entry> {
    let malformed = |reason| JournalError::MalformedEntry {
        subject: subject.lexical(),
        reason,
    };

    let id = match subject {
        Value::Iri(iri) => EntryId(iri.as_str().to_string()),
        _ => return Err(malformed(MalformedReason::NotAnIri)),
    };

    let created_at = match single_object(subject, quads, PRED_CREATED_AT).map_err(malformed)? {
        Value::Time(t) => *t,
        other => {
            return Err(malformed(MalformedReason::WrongKind {
                predicate: PRED_CREATED_AT,
                found: other.kind(),
            }))
        }
    };

    let contents = match single_object(subject, quads, PRED_CONTENTS).map_err(malformed)? {
        Value::String(s) => s.clone(),
        other => {
            return Err(malformed(MalformedReason::WrongKind {
                predicate: PRED_CONTENTS,
                found: other.kind(),
            }))
        }
    };

    Ok(Entry {
        id,
        created_at,
        contents,
    })
}

fn single_object<'a>(
    subject: &Value,
    quads: &'a [Quad],
    predicate: &'static str,
) -> std::result::Result<&'a Value, MalformedReason> {
    let predicate_iri = Iri::new(predicate);
    let mut objects = quads
        .iter()
        .filter(|q| &q.subject == subject && q.predicate == predicate_iri)
        .map(|q| &q.object);

    let first = objects.next().ok_or(MalformedReason::Missing(predicate))?;
    if objects.any(|other| other != first) {
        return Err(MalformedReason::Conflicting(predicate));
    }
    Ok(first)
}
