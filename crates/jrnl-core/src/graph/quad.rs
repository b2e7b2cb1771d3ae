//! Quad model: subject, predicate, object, label.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::StoreError;

/// An identifier node.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Iri(String);

impl Iri {
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for Iri {
    fn from(s: &str) -> Self {
        Iri(s.to_string())
    }
}

/// A node in the graph: the subject or object of a quad.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Iri(Iri),
    String(String),
    Time(DateTime<Utc>),
}

impl Value {
    pub fn iri(iri: impl Into<String>) -> Self {
        Value::Iri(Iri::new(iri))
    }

    /// Short name of the value's kind, as stored.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Iri(_) => "iri",
            Value::String(_) => "string",
            Value::Time(_) => "time",
        }
    }

    /// Canonical text form of the value without its kind.
    ///
    /// Times use RFC 3339 in UTC with nanoseconds, so the text of two times
    /// sorts the same way the times do.
    pub fn lexical(&self) -> String {
        match self {
            Value::Iri(iri) => iri.as_str().to_string(),
            Value::String(s) => s.clone(),
            Value::Time(t) => t.to_rfc3339_opts(SecondsFormat::Nanos, true),
        }
    }

    /// Inverse of [`Value::kind`] and [`Value::lexical`].
    pub fn from_parts(kind: &str, lexical: String) -> Result<Self, StoreError> {
        match kind {
            "iri" => Ok(Value::Iri(Iri(lexical))),
            "string" => Ok(Value::String(lexical)),
            "time" => DateTime::parse_from_rfc3339(&lexical)
                .map(|t| Value::Time(t.with_timezone(&Utc)))
                .map_err(|e| StoreError::CorruptValue(format!("time '{lexical}': {e}"))),
            other => Err(StoreError::CorruptValue(format!("unknown kind '{other}'"))),
        }
    }

    /// Compare two values of the same kind; values of different kinds are
    /// incomparable.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Iri(a), Value::Iri(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Iri(iri) => write!(f, "{iri}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Time(_) => write!(f, "{}", self.lexical()),
        }
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Value::Iri(iri)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Time(t)
    }
}

/// A single fact.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: Value,
    pub predicate: Iri,
    pub object: Value,
    pub label: Option<Value>,
}

impl Quad {
    /// Build an unlabeled quad.
    pub fn new(subject: impl Into<Value>, predicate: impl Into<Iri>, object: impl Into<Value>) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<Value>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Reject quads no store should hold.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.predicate.as_str().is_empty() {
            return Err(StoreError::InvalidQuad(format!(
                "empty predicate on subject {}",
                self.subject
            )));
        }
        for node in [&self.subject, &self.object] {
            if let Value::Iri(iri) = node {
                if iri.as_str().is_empty() {
                    return Err(StoreError::InvalidQuad(format!(
                        "empty IRI in quad with predicate {}",
                        self.predicate
                    )));
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if let Some(label) = &self.label {
            write!(f, " {label}")?;
        }
        write!(f, " .")
    }
}

/// Comparison used by path filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Lte,
    Gt,
    Gte,
}

impl CompareOp {
    /// Whether `ord` (the node compared to the filter value) passes.
    pub fn accepts(self, ord: Ordering) -> bool {
        match self {
            CompareOp::Lt => ord == Ordering::Less,
            CompareOp::Lte => ord != Ordering::Greater,
            CompareOp::Gt => ord == Ordering::Greater,
            CompareOp::Gte => ord != Ordering::Less,
        }
    }
}
