//! Path traversal queries.
//!
//! A [`Path`] starts from the subjects that carry a given fact and walks the
//! graph step by step. Tags remember a node so a later [`Path::back`] can
//! return to it after following and filtering out-edges:
//!
//! ```rust,ignore
//! let path = Path::has("is-a", Value::iri("journal-entry"))
//!     .tag("entry")
//!     .out("created-at")
//!     .filter(CompareOp::Gte, Value::Time(after))
//!     .back("entry");
//! let subjects = path.execute(&store)?;
//! ```

use std::collections::{HashMap, HashSet};

use crate::error::StoreError;

use super::quad::{CompareOp, Iri, Value};
use super::store::QuadStore;

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Has(Iri, Value),
    Tag(String),
    Out(Iri),
    Filter(CompareOp, Value),
    Back(String),
}

/// A traversal query over a [`QuadStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    start: (Iri, Value),
    steps: Vec<Step>,
}

#[derive(Debug, Clone)]
struct Binding {
    node: Value,
    tags: HashMap<String, Value>,
}

impl Path {
    /// Start from every subject with a `predicate -> object` fact.
    pub fn has(predicate: impl Into<Iri>, object: impl Into<Value>) -> Self {
        Self {
            start: (predicate.into(), object.into()),
            steps: Vec::new(),
        }
    }

    /// Keep only nodes that also carry `predicate -> object`.
    pub fn and_has(mut self, predicate: impl Into<Iri>, object: impl Into<Value>) -> Self {
        self.steps.push(Step::Has(predicate.into(), object.into()));
        self
    }

    /// Remember the current node under `name`.
    pub fn tag(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Tag(name.into()));
        self
    }

    /// Move to the objects of the current node's `predicate` edges.
    pub fn out(mut self, predicate: impl Into<Iri>) -> Self {
        self.steps.push(Step::Out(predicate.into()));
        self
    }

    /// Keep nodes that compare to `value` as `op` demands.
    pub fn filter(mut self, op: CompareOp, value: impl Into<Value>) -> Self {
        self.steps.push(Step::Filter(op, value.into()));
        self
    }

    /// Return to the node remembered under `name`.
    pub fn back(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Back(name.into()));
        self
    }

    fn check_tags(&self) -> Result<(), StoreError> {
        let mut known = HashSet::new();
        for step in &self.steps {
            match step {
                Step::Tag(name) => {
                    known.insert(name.as_str());
                }
                Step::Back(name) if !known.contains(name.as_str()) => {
                    return Err(StoreError::UnknownTag(name.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Run the traversal and return the distinct result nodes in the order
    /// they were first reached.
    pub fn execute<S: QuadStore + ?Sized>(&self, store: &S) -> Result<Vec<Value>, StoreError> {
        self.check_tags()?;

        let (predicate, object) = &self.start;
        let mut bindings: Vec<Binding> = store
            .subjects_with(predicate, object)?
            .into_iter()
            .map(|node| Binding {
                node,
                tags: HashMap::new(),
            })
            .collect();

        for step in &self.steps {
            bindings = match step {
                Step::Has(predicate, object) => {
                    let mut kept = Vec::with_capacity(bindings.len());
                    for binding in bindings {
                        if store.objects_of(&binding.node, predicate)?.contains(object) {
                            kept.push(binding);
                        }
                    }
                    kept
                }
                Step::Tag(name) => bindings
                    .into_iter()
                    .map(|mut binding| {
                        binding.tags.insert(name.clone(), binding.node.clone());
                        binding
                    })
                    .collect(),
                Step::Out(predicate) => {
                    let mut next = Vec::new();
                    for binding in bindings {
                        for node in store.objects_of(&binding.node, predicate)? {
                            next.push(Binding {
                                node,
                                tags: binding.tags.clone(),
                            });
                        }
                    }
                    next
                }
                Step::Filter(op, value) => bindings
                    .into_iter()
                    .filter(|binding| {
                        binding
                            .node
                            .compare(value)
                            .is_some_and(|ord| op.accepts(ord))
                    })
                    .collect(),
                Step::Back(name) => bindings
                    .into_iter()
                    .map(|binding| {
                        let node = binding
                            .tags
                            .get(name)
                            .cloned()
                            .ok_or_else(|| StoreError::UnknownTag(name.clone()))?;
                        Ok(Binding {
                            node,
                            tags: binding.tags,
                        })
                    })
                    .collect::<Result<_, StoreError>>()?,
            };
        }

        let mut seen = HashSet::new();
        Ok(bindings
            .into_iter()
            .map(|binding| binding.node)
            .filter(|node| seen.insert(node.clone()))
            .collect())
    }
}
