//! One-shot contextual data for state entry.
//!
//! A switch sometimes needs to tell the destination state something
//! transient — "skip the spotted animation this time", "resume at this
//! position" — without widening the state's permanent fields.  The caller
//! builds an `InitPayload`, the entry hook reads it, and it is dropped.

use std::collections::HashMap;

use prowl_core::{AgentId, TargetId, Vec3};

/// A single typed payload entry.
#[derive(Clone, Debug, PartialEq)]
pub enum PayloadValue {
    Bool(bool),
    Int(i64),
    Float(f32),
    Text(String),
    Point(Vec3),
    Target(TargetId),
    Agent(AgentId),
}

/// Ad hoc key/value bag handed to [`BehaviourState::on_enter`].
///
/// [`BehaviourState::on_enter`]: crate::BehaviourState::on_enter
#[derive(Clone, Debug, Default)]
pub struct InitPayload {
    entries: HashMap<String, PayloadValue>,
}

impl InitPayload {
    /// The default-constructed payload used when a switch supplies none.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: PayloadValue) -> Self {
        self.entries.insert(key.into(), value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: PayloadValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&PayloadValue> {
        self.entries.get(key)
    }

    /// Boolean flag lookup; missing or non-bool keys read as `false`.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.entries.get(key), Some(PayloadValue::Bool(true)))
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.entries.get(key) {
            Some(PayloadValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn float(&self, key: &str) -> Option<f32> {
        match self.entries.get(key) {
            Some(PayloadValue::Float(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn point(&self, key: &str) -> Option<Vec3> {
        match self.entries.get(key) {
            Some(PayloadValue::Point(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn target(&self, key: &str) -> Option<TargetId> {
        match self.entries.get(key) {
            Some(PayloadValue::Target(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
