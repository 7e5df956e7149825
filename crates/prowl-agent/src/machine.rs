//! The per-agent state machine: instance table, switch protocol, and
//! transition evaluation.

use std::collections::HashMap;

use tracing::{debug, error, warn};

use prowl_state::{
    BehaviourState, HitEvent, InitPayload, Intercept, StateCtx, StateKind, StateRegistry,
    StateTransition, StunEvent,
};
use prowl_world::Replicated;

/// Which transition object triggered a switch, so its taken-hook can run
/// after the old state's exit.
enum Taken {
    Global(usize),
    Local(usize),
}

/// One agent's state machine.
///
/// Holds one pre-built instance per registered state-kind (instances live as
/// long as the agent — switches re-enter, never re-create), the active and
/// previous kinds, the global transition list, and the replicated
/// active-kind value observers mirror.
///
/// Before [`activate`](Self::activate) the machine is in an implicit
/// "no active state" condition: `current()` is `None` and every cadence
/// call is a no-op.
pub struct StateMachine<K: StateKind> {
    instances: HashMap<K, Box<dyn BehaviourState<K>>>,
    active: Option<K>,
    previous: Option<K>,
    global_transitions: Vec<Box<dyn StateTransition<K>>>,
    published: Replicated<Option<K>>,
    ai_interval_secs: f32,
    ai_timer: f32,
}

impl<K: StateKind> StateMachine<K> {
    /// Build the agent's private instance table from a registry.
    pub fn from_registry(registry: &StateRegistry<K>, ai_interval_secs: f32) -> Self {
        Self {
            instances: registry.instantiate_all(),
            active: None,
            previous: None,
            global_transitions: Vec::new(),
            published: Replicated::new(None),
            ai_interval_secs,
            ai_timer: 0.0,
        }
    }

    /// Append a transition consulted regardless of the active state.
    ///
    /// Global transitions preempt: they are evaluated before the active
    /// state's own list on every decision interval.
    pub fn add_global_transition(&mut self, transition: Box<dyn StateTransition<K>>) {
        self.global_transitions.push(transition);
    }

    // ── Introspection ─────────────────────────────────────────────────────

    /// The active state-kind, or `None` before activation.
    #[inline]
    pub fn current(&self) -> Option<K> {
        self.active
    }

    /// The previously active state-kind.
    #[inline]
    pub fn previous(&self) -> Option<K> {
        self.previous
    }

    /// The replicated active-kind value, for observer subscription.
    pub fn published(&mut self) -> &mut Replicated<Option<K>> {
        &mut self.published
    }

    /// Read the published value without touching subscriptions.
    #[inline]
    pub fn published_value(&self) -> Option<K> {
        self.published.get()
    }

    /// `true` once `kind` has a live instance in this machine.
    pub fn has_state(&self, kind: K) -> bool {
        self.instances.contains_key(&kind)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Enter the initial state.  Called once, by the driver, when the agent
    /// first comes alive; re-activation is a no-op.
    pub fn activate(&mut self, ctx: &mut StateCtx<'_>) {
        if self.active.is_some() {
            return;
        }
        self.perform_switch(ctx, K::initial(), None, &InitPayload::new());
    }

    /// Force a switch into `new`, outside transition evaluation.
    ///
    /// Returns `false` (and changes nothing) if `new` has no instance.
    pub fn switch_state(&mut self, ctx: &mut StateCtx<'_>, new: K, payload: InitPayload) -> bool {
        self.perform_switch(ctx, new, None, &payload)
    }

    /// The switch protocol.
    ///
    /// The instance lookup gates everything: a switch into an unknown kind
    /// is abandoned before the old state exits, so the previous state stays
    /// active and the published identifier keeps matching a live instance.
    /// Hook failures are contained — logged, never allowed to abort the
    /// switch.
    fn perform_switch(
        &mut self,
        ctx: &mut StateCtx<'_>,
        new: K,
        taken: Option<Taken>,
        payload: &InitPayload,
    ) -> bool {
        if !self.instances.contains_key(&new) {
            warn!(
                target: "prowl::agent",
                agent = %ctx.body.id,
                state = %new,
                "switch into unavailable state-kind abandoned"
            );
            return false;
        }

        if let Some(old) = self.active {
            if let Some(state) = self.instances.get_mut(&old) {
                if let Err(err) = state.on_exit(ctx) {
                    error!(
                        target: "prowl::agent",
                        agent = %ctx.body.id,
                        state = %old,
                        %err,
                        "exit hook failed; switch continues"
                    );
                }
            }
            self.previous = Some(old);

            if let Some(taken) = taken {
                match taken {
                    Taken::Global(index) => {
                        if let Some(transition) = self.global_transitions.get_mut(index) {
                            transition.on_taken(ctx);
                        }
                    }
                    Taken::Local(index) => {
                        if let Some(state) = self.instances.get_mut(&old) {
                            if let Some(transition) = state.transitions().get_mut(index) {
                                transition.on_taken(ctx);
                            }
                        }
                    }
                }
            }
        } else {
            self.previous = None;
        }

        self.active = Some(new);
        self.published.set(Some(new));
        debug!(target: "prowl::agent", agent = %ctx.body.id, state = %new, "state entered");

        if let Some(state) = self.instances.get_mut(&new) {
            if let Err(err) = state.on_enter(ctx, payload) {
                error!(
                    target: "prowl::agent",
                    agent = %ctx.body.id,
                    state = %new,
                    %err,
                    "enter hook failed; state remains active"
                );
            }
        }
        true
    }

    // ── Cadences ──────────────────────────────────────────────────────────

    /// Every-tick hook.  Accumulates the decision timer and runs the
    /// AI-interval step when it elapses.
    pub fn update(&mut self, ctx: &mut StateCtx<'_>) {
        let Some(active) = self.active else { return };
        if let Some(state) = self.instances.get_mut(&active) {
            state.update(ctx);
        }

        self.ai_timer += ctx.delta_secs;
        if self.ai_timer >= self.ai_interval_secs {
            self.ai_timer = 0.0;
            self.ai_step(ctx);
        }
    }

    /// Every-tick hook after movement resolution.  Never evaluates
    /// transitions.
    pub fn late_update(&mut self, ctx: &mut StateCtx<'_>) {
        let Some(active) = self.active else { return };
        if let Some(state) = self.instances.get_mut(&active) {
            state.late_update(ctx);
        }
    }

    /// The decision step: active state's interval hook, then transition
    /// evaluation — the global list first (preemption), then the state's own
    /// list, each in declaration order with first-match-wins.
    fn ai_step(&mut self, ctx: &mut StateCtx<'_>) {
        let Some(active) = self.active else { return };
        if let Some(state) = self.instances.get_mut(&active) {
            state.ai_interval(ctx);
        }

        // Global transitions aiming at the already-active state are skipped
        // rather than re-entered, so a standing condition (hp == 0) cannot
        // churn its destination state every interval.
        let mut decision = None;
        for (index, transition) in self.global_transitions.iter_mut().enumerate() {
            if transition.should_take(ctx) {
                let next = transition.next_state();
                if Some(next) != self.active {
                    decision = Some((Taken::Global(index), next));
                    break;
                }
            }
        }

        if decision.is_none() {
            if let Some(state) = self.instances.get_mut(&active) {
                if let Some((index, next)) = prowl_state::first_satisfied(state.transitions(), ctx)
                {
                    decision = Some((Taken::Local(index), next));
                }
            }
        }

        if let Some((taken, next)) = decision {
            self.perform_switch(ctx, next, Some(taken), &InitPayload::new());
        }
    }

    // ── Stimulus dispatch ─────────────────────────────────────────────────

    /// Forward a hit to the active state; apply default damage handling
    /// unless the state intercepted it.
    pub fn handle_hit(&mut self, ctx: &mut StateCtx<'_>, hit: &HitEvent) {
        let intercepted = self
            .active
            .and_then(|kind| self.instances.get_mut(&kind))
            .map(|state| state.on_hit(ctx, hit))
            == Some(Intercept::Handled);

        if !intercepted && ctx.body.take_damage(hit.damage) {
            debug!(target: "prowl::agent", agent = %ctx.body.id, "lethal hit");
        }
    }

    /// Forward a stun to the active state; apply default stun handling
    /// unless the state intercepted it.
    pub fn handle_stun(&mut self, ctx: &mut StateCtx<'_>, stun: &StunEvent) {
        let intercepted = self
            .active
            .and_then(|kind| self.instances.get_mut(&kind))
            .map(|state| state.on_stunned(ctx, stun))
            == Some(Intercept::Handled);

        if !intercepted {
            ctx.body.apply_stun(stun.duration_secs);
        }
    }

    /// Forward an ad hoc signal to the active state's generic handler.
    pub fn trigger_custom_event(
        &mut self,
        ctx: &mut StateCtx<'_>,
        name: &str,
        payload: &InitPayload,
    ) {
        if let Some(state) = self.active.and_then(|kind| self.instances.get_mut(&kind)) {
            state.on_custom_event(ctx, name, payload);
        }
    }
}
