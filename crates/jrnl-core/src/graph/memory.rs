//! In-memory quad store.

use std::collections::BTreeSet;

use crate::error::StoreError;

use super::quad::{Iri, Quad, Value};
use super::store::QuadStore;

/// Quads held in insertion order, deduplicated.
#[derive(Debug, Default, Clone)]
pub struct MemoryQuadStore {
    quads: Vec<Quad>,
    seen: BTreeSet<Quad>,
}

impl MemoryQuadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

impl QuadStore for MemoryQuadStore {
    fn apply(&mut self, quads: &[Quad]) -> Result<(), StoreError> {
        // Validate up front so a bad quad leaves the store untouched.
        for quad in quads {
            quad.validate()?;
        }
        for quad in quads {
            if self.seen.insert(quad.clone()) {
                self.quads.push(quad.clone());
            }
        }
        Ok(())
    }

    fn subjects_with(&self, predicate: &Iri, object: &Value) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .quads
            .iter()
            .filter(|q| &q.predicate == predicate && &q.object == object)
            .map(|q| q.subject.clone())
            .collect())
    }

    fn objects_of(&self, subject: &Value, predicate: &Iri) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .quads
            .iter()
            .filter(|q| &q.subject == subject && &q.predicate == predicate)
            .map(|q| q.object.clone())
            .collect())
    }

    fn quads_about(&self, subject: &Value) -> Result<Vec<Quad>, StoreError> {
        Ok(self
            .quads
            .iter()
            .filter(|q| &q.subject == subject)
            .cloned()
            .collect())
    }
}
