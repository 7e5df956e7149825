//! Pluggable candidate-eligibility predicates.
//!
//! Target acquisition and observer queries must agree on who counts as a
//! candidate.  Rather than baking "not dead" (and whatever a given creature
//! type adds — "not in a hiding spot", "not already carried") into every
//! query, the checks are registered once and evaluated as a logical AND.

use prowl_core::TargetId;

use crate::Roster;

/// A single eligibility predicate.
pub type EligibilityPredicate = Box<dyn Fn(&Roster, TargetId) -> bool + Send + Sync>;

/// AND-composition of all registered predicates.
///
/// The default policy contains only the liveness check; creature types
/// extend it with [`register`](Self::register).
pub struct EligibilityPolicy {
    predicates: Vec<EligibilityPredicate>,
}

impl EligibilityPolicy {
    /// Policy with the baseline liveness predicate.
    pub fn new() -> Self {
        let mut policy = Self { predicates: Vec::new() };
        policy.register(|roster, id| roster.is_alive(id));
        policy
    }

    /// Policy with no predicates at all — every roster entry is eligible.
    /// Intended for tests.
    pub fn permissive() -> Self {
        Self { predicates: Vec::new() }
    }

    /// Add a predicate.  All registered predicates must pass for a candidate
    /// to be eligible.
    pub fn register<F>(&mut self, predicate: F)
    where
        F: Fn(&Roster, TargetId) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Box::new(predicate));
    }

    /// `true` if every registered predicate accepts `id`.
    pub fn eligible(&self, roster: &Roster, id: TargetId) -> bool {
        if id.index() >= roster.count {
            return false;
        }
        self.predicates.iter().all(|p| p(roster, id))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Default for EligibilityPolicy {
    fn default() -> Self {
        Self::new()
    }
}
