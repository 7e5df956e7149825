//! State transitions: predicate + destination, with an optional taken-hook.

use crate::kind::StateKind;
use crate::state::StateCtx;

// ── StateTransition ───────────────────────────────────────────────────────────

/// A single outgoing transition, owned by a state (or by the agent's global
/// list).
///
/// # Contract
///
/// - [`should_take`](Self::should_take) must be side-effect-free with
///   respect to agent/world data: repeated calls against an unchanged world
///   return the same answer.  It receives `&mut self` so the transition may
///   stash transient fields for [`next_state`](Self::next_state) to read.
/// - [`next_state`](Self::next_state) computes the destination; it may
///   depend on fields set during the predicate call.
/// - [`on_taken`](Self::on_taken) is the only method permitted side effects,
///   and runs exactly once, only when the transition is actually taken.
pub trait StateTransition<K: StateKind>: Send {
    /// Should this transition fire now?
    fn should_take(&mut self, ctx: &StateCtx<'_>) -> bool;

    /// Destination state-kind.
    fn next_state(&self) -> K;

    /// Side-effecting hook, invoked between the old state's exit and the new
    /// state's entry.
    fn on_taken(&mut self, _ctx: &mut StateCtx<'_>) {}
}

/// Walk `transitions` in declaration order; the first satisfied predicate
/// wins and evaluation stops (priority-by-order, not best-match).
///
/// Returns the winning index (for the later `on_taken` call) and the
/// destination computed immediately after the predicate matched.
pub fn first_satisfied<K: StateKind>(
    transitions: &mut [Box<dyn StateTransition<K>>],
    ctx: &StateCtx<'_>,
) -> Option<(usize, K)> {
    for (index, transition) in transitions.iter_mut().enumerate() {
        if transition.should_take(ctx) {
            let next = transition.next_state();
            return Some((index, next));
        }
    }
    None
}

// ── When ──────────────────────────────────────────────────────────────────────

/// Closure-based [`StateTransition`] for the common fixed-destination case.
///
/// ```ignore
/// fn transitions(&mut self) -> &mut [Box<dyn StateTransition<ShadeState>>] {
///     &mut self.transitions
/// }
/// // built once in the state's constructor:
/// let t: Box<dyn StateTransition<ShadeState>> =
///     Box::new(When::new(ShadeState::Stalk, |ctx| ctx.body.hp < 2));
/// ```
///
/// Transitions whose destination depends on predicate-time data implement
/// [`StateTransition`] by hand instead.
pub struct When<K: StateKind> {
    next: K,
    predicate: Box<dyn FnMut(&StateCtx<'_>) -> bool + Send>,
    effect: Option<Box<dyn FnMut(&mut StateCtx<'_>) + Send>>,
}

impl<K: StateKind> When<K> {
    pub fn new<F>(next: K, predicate: F) -> Self
    where
        F: FnMut(&StateCtx<'_>) -> bool + Send + 'static,
    {
        Self { next, predicate: Box::new(predicate), effect: None }
    }

    /// Attach a side effect to run when the transition is taken.
    pub fn with_effect<F>(mut self, effect: F) -> Self
    where
        F: FnMut(&mut StateCtx<'_>) + Send + 'static,
    {
        self.effect = Some(Box::new(effect));
        self
    }

    /// Box into the trait-object form the transition lists hold.
    pub fn boxed(self) -> Box<dyn StateTransition<K>> {
        Box::new(self)
    }
}

impl<K: StateKind> StateTransition<K> for When<K> {
    fn should_take(&mut self, ctx: &StateCtx<'_>) -> bool {
        (self.predicate)(ctx)
    }

    fn next_state(&self) -> K {
        self.next
    }

    fn on_taken(&mut self, ctx: &mut StateCtx<'_>) {
        if let Some(effect) = self.effect.as_mut() {
            effect(ctx);
        }
    }
}
