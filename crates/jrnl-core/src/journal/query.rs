//! Time-range filters and the traversal they compile to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::{CompareOp, Path, Value};

use super::entry::{JOURNAL_ENTRY, PRED_CREATED_AT, PRED_IS_A};

const ENTRY_TAG: &str = "entry";

/// Bounds on `created-at`, half-open: `[after, before)`.
///
/// A missing bound leaves that side unrestricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetOptions {
    pub before: Option<DateTime<Utc>>,
    pub after: Option<DateTime<Utc>>,
}

impl GetOptions {
    /// No bounds: every entry.
    pub fn all() -> Self {
        Self::default()
    }

    /// Entries in `[after, before)`.
    pub fn between(after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        Self {
            before: Some(before),
            after: Some(after),
        }
    }

    pub fn before(mut self, before: DateTime<Utc>) -> Self {
        self.before = Some(before);
        self
    }

    pub fn after(mut self, after: DateTime<Utc>) -> Self {
        self.after = Some(after);
        self
    }

    pub fn is_bounded(&self) -> bool {
        self.before.is_some() || self.after.is_some()
    }

    /// Traversal selecting the subjects of matching entries.
    pub fn to_path(&self) -> Path {
        let mut path = Path::has(PRED_IS_A, Value::iri(JOURNAL_ENTRY)).tag(ENTRY_TAG);
        if let Some(before) = self.before {
            path = path
                .out(PRED_CREATED_AT)
                .filter(CompareOp::Lt, before)
                .back(ENTRY_TAG);
        }
        if let Some(after) = self.after {
            path = path
                .out(PRED_CREATED_AT)
                .filter(CompareOp::Gte, after)
                .back(ENTRY_TAG);
        }
        path
    }
}
