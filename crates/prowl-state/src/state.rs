//! The `BehaviourState` trait — the main extension point for creature code.

use prowl_core::{AgentRng, EyePose, Tick};
use prowl_coord::CoordTable;
use prowl_perception::{Perception, ViewCone};
use prowl_world::AgentBody;

use crate::error::StateResult;
use crate::events::{HitEvent, Intercept, StunEvent};
use crate::kind::StateKind;
use crate::payload::InitPayload;
use crate::transition::StateTransition;

// ── StateCtx ──────────────────────────────────────────────────────────────────

/// Everything a state hook may touch during one call.
///
/// Built by the orchestrator per agent per cadence call; the perception view
/// is shared read-only, while the body, coordination table, and RNG are the
/// agent's exclusive mutable slices of the world.
///
/// Transition predicates receive `&StateCtx` — through a shared reference
/// the mutable fields reborrow as read-only, which is what keeps predicates
/// honest about being side-effect-free.
pub struct StateCtx<'a> {
    /// Current simulation tick.
    pub tick: Tick,

    /// Seconds this tick represents.
    pub delta_secs: f32,

    /// The agent's own record.
    pub body: &'a mut AgentBody,

    /// The tick's perception view (mesh, paths, blockers, roster).
    pub view: &'a Perception<'a>,

    /// Shared claim bookkeeping.
    pub coord: &'a mut CoordTable,

    /// The agent's deterministic RNG.
    pub rng: &'a mut AgentRng,
}

impl StateCtx<'_> {
    /// The agent's current eye pose.
    #[inline]
    pub fn eye(&self) -> EyePose {
        self.body.eye_pose()
    }

    /// The agent's own view cone.
    #[inline]
    pub fn view_cone(&self) -> ViewCone {
        ViewCone::new(self.body.view_width_deg, self.body.view_range)
    }
}

// ── BehaviourState ────────────────────────────────────────────────────────────

/// One unit of agent logic.
///
/// One instance exists per (agent, state-kind) pair, created once at agent
/// init and kept for the agent's lifetime — switches re-enter the same
/// instance, so long-lived fields persist across visits unless the state
/// resets them in [`on_enter`](Self::on_enter).
///
/// # Required methods
///
/// None.  Every hook has a no-op default so minimal states stay minimal;
/// a terminal state (e.g. "dead") is legitimately an empty impl.
///
/// # Cadences
///
/// - [`update`](Self::update) — every tick; continuous work only (movement
///   shaping, look-at smoothing).  Never evaluate transitions here.
/// - [`ai_interval`](Self::ai_interval) — the decision cadence; runs at the
///   configured interval, immediately before the orchestrator polls this
///   state's transitions.
/// - [`late_update`](Self::late_update) — every tick, after movement
///   resolution.
pub trait BehaviourState<K: StateKind>: Send {
    /// Called when this state becomes active.  `init` carries one-shot
    /// contextual data from the caller of the switch.
    fn on_enter(&mut self, _ctx: &mut StateCtx<'_>, _init: &InitPayload) -> StateResult<()> {
        Ok(())
    }

    /// Called when this state stops being active, strictly before the next
    /// state's `on_enter` within the same switch.
    fn on_exit(&mut self, _ctx: &mut StateCtx<'_>) -> StateResult<()> {
        Ok(())
    }

    /// Every-tick hook.
    fn update(&mut self, _ctx: &mut StateCtx<'_>) {}

    /// Decision-cadence hook; transitions are polled right after it returns.
    fn ai_interval(&mut self, _ctx: &mut StateCtx<'_>) {}

    /// Every-tick hook, after movement has been resolved.
    fn late_update(&mut self, _ctx: &mut StateCtx<'_>) {}

    /// This state's outgoing transitions, in declaration (= priority) order.
    ///
    /// The default has none — terminal states simply don't override this.
    fn transitions(&mut self) -> &mut [Box<dyn StateTransition<K>>] {
        &mut []
    }

    /// Intercept a hit.  Return [`Intercept::Handled`] to suppress the
    /// default damage handling.
    fn on_hit(&mut self, _ctx: &mut StateCtx<'_>, _hit: &HitEvent) -> Intercept {
        Intercept::Pass
    }

    /// Intercept a stun.  Return [`Intercept::Handled`] to suppress the
    /// default stun handling.
    fn on_stunned(&mut self, _ctx: &mut StateCtx<'_>, _stun: &StunEvent) -> Intercept {
        Intercept::Pass
    }

    /// Ad hoc signal dispatch; `name` identifies the event by convention
    /// between the sender and the states that care.
    fn on_custom_event(&mut self, _ctx: &mut StateCtx<'_>, _name: &str, _payload: &InitPayload) {}
}
