//! The kind → factory table behind "one state instance per kind per agent".
//!
//! A creature type declares its state-kinds and registers a factory for each.
//! The registry is built once per creature type (typically stored in a
//! `std::sync::OnceLock`, making the first build double-checked and
//! idempotent) and shared read-only process-wide; each agent then
//! instantiates its own private set of state instances from it.
//!
//! A declared kind with no registered factory is a configuration error: it
//! is logged at build time and omitted from the table, so agents simply
//! never have that state available.  A later switch into it is abandoned by
//! the orchestrator with a "not found" log.

use std::collections::HashMap;

use tracing::error;

use crate::kind::StateKind;
use crate::state::BehaviourState;

/// Factory producing a fresh state instance for one agent.
pub type StateFactory<K> = Box<dyn Fn() -> Box<dyn BehaviourState<K>> + Send + Sync>;

// ── StateRegistry ─────────────────────────────────────────────────────────────

/// Immutable kind → factory table for one creature type.
pub struct StateRegistry<K: StateKind> {
    factories: HashMap<K, StateFactory<K>>,
}

impl<K: StateKind> StateRegistry<K> {
    pub fn builder() -> StateRegistryBuilder<K> {
        StateRegistryBuilder::new()
    }

    /// `true` if `kind` has an implementation.
    pub fn contains(&self, kind: K) -> bool {
        self.factories.contains_key(&kind)
    }

    /// Kinds with implementations, in unspecified order.
    pub fn kinds(&self) -> impl Iterator<Item = K> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Build one fresh instance of every registered state.
    ///
    /// Called once per agent at init; the result is the agent's private
    /// instance table for its whole lifetime.
    pub fn instantiate_all(&self) -> HashMap<K, Box<dyn BehaviourState<K>>> {
        self.factories
            .iter()
            .map(|(&kind, factory)| (kind, factory()))
            .collect()
    }
}

// ── StateRegistryBuilder ──────────────────────────────────────────────────────

/// Collects declarations and factories, then validates on build.
pub struct StateRegistryBuilder<K: StateKind> {
    declared: Vec<K>,
    factories: HashMap<K, StateFactory<K>>,
}

impl<K: StateKind> StateRegistryBuilder<K> {
    pub fn new() -> Self {
        Self { declared: Vec::new(), factories: HashMap::new() }
    }

    /// Declare `kind` as part of the creature's state set without (yet)
    /// supplying an implementation.  Registering a factory implies
    /// declaration, so this is only needed to surface missing impls.
    pub fn declare(mut self, kind: K) -> Self {
        if !self.declared.contains(&kind) {
            self.declared.push(kind);
        }
        self
    }

    /// Register the factory for `kind`.  Registering twice keeps the last
    /// factory.
    pub fn register<F>(mut self, kind: K, factory: F) -> Self
    where
        F: Fn() -> Box<dyn BehaviourState<K>> + Send + Sync + 'static,
    {
        if !self.declared.contains(&kind) {
            self.declared.push(kind);
        }
        self.factories.insert(kind, Box::new(factory));
        self
    }

    /// Validate and produce the registry.
    ///
    /// Declared kinds without factories are logged and dropped — fatal to
    /// that kind only, never to the creature type.
    pub fn build(self) -> StateRegistry<K> {
        for kind in &self.declared {
            if !self.factories.contains_key(kind) {
                error!(
                    target: "prowl::state",
                    state = %kind,
                    "declared state-kind has no implementation; omitting it"
                );
            }
        }
        StateRegistry { factories: self.factories }
    }
}

impl<K: StateKind> Default for StateRegistryBuilder<K> {
    fn default() -> Self {
        Self::new()
    }
}
