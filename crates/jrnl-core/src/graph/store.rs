//! The fact store capability and its batching writer.

use crate::error::StoreError;

use super::quad::{Iri, Quad, Value};

/// A durable (or in-memory) set of quads with indexed lookups.
///
/// Implementations must make [`QuadStore::apply`] atomic: after it returns
/// `Ok` every quad of the batch is visible, after it returns `Err` none is.
pub trait QuadStore {
    /// Write a batch of quads. Quads already present are skipped.
    fn apply(&mut self, quads: &[Quad]) -> Result<(), StoreError>;

    /// Subjects of all quads with the given predicate and object.
    fn subjects_with(&self, predicate: &Iri, object: &Value) -> Result<Vec<Value>, StoreError>;

    /// Objects of all quads with the given subject and predicate.
    fn objects_of(&self, subject: &Value, predicate: &Iri) -> Result<Vec<Value>, StoreError>;

    /// Every quad whose subject is `subject`.
    fn quads_about(&self, subject: &Value) -> Result<Vec<Quad>, StoreError>;
}

impl<S: QuadStore + ?Sized> QuadStore for &mut S {
    fn apply(&mut self, quads: &[Quad]) -> Result<(), StoreError> {
        (**self).apply(quads)
    }

    fn subjects_with(&self, predicate: &Iri, object: &Value) -> Result<Vec<Value>, StoreError> {
        (**self).subjects_with(predicate, object)
    }

    fn objects_of(&self, subject: &Value, predicate: &Iri) -> Result<Vec<Value>, StoreError> {
        (**self).objects_of(subject, predicate)
    }

    fn quads_about(&self, subject: &Value) -> Result<Vec<Quad>, StoreError> {
        (**self).quads_about(subject)
    }
}

/// Buffers quads and writes them to the store in one batch on [`flush`].
///
/// Nothing reaches the store before `flush`; dropping an unflushed writer
/// discards the batch.
///
/// [`flush`]: QuadWriter::flush
pub struct QuadWriter<'a, S: QuadStore + ?Sized> {
    store: &'a mut S,
    pending: Vec<Quad>,
}

impl<'a, S: QuadStore + ?Sized> QuadWriter<'a, S> {
    pub fn new(store: &'a mut S) -> Self {
        Self {
            store,
            pending: Vec::new(),
        }
    }

    /// Queue one quad.
    ///
    /// # Errors
    /// Returns an error if the quad is invalid; the batch is left unchanged.
    pub fn add_quad(&mut self, quad: Quad) -> Result<(), StoreError> {
        quad.validate()?;
        self.pending.push(quad);
        Ok(())
    }

    /// Queue several quads; stops at the first invalid one.
    pub fn add_quads(&mut self, quads: impl IntoIterator<Item = Quad>) -> Result<(), StoreError> {
        for quad in quads {
            self.add_quad(quad)?;
        }
        Ok(())
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Write the whole batch. Returns the number of quads flushed.
    pub fn flush(self) -> Result<usize, StoreError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        self.store.apply(&self.pending)?;
        Ok(self.pending.len())
    }
}
