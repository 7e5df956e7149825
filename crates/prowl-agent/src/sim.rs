//! The `Sim` struct and its tick loop.

use prowl_core::{AgentId, AgentRng, SimConfig, TickClock};
use prowl_coord::CoordTable;
use prowl_nav::{Linecast, NavMesh, PathEngine};
use prowl_perception::Perception;
use prowl_state::{HitEvent, InitPayload, StateCtx, StateKind, StunEvent};
use prowl_world::{AgentBody, EligibilityPolicy, Roster};

use crate::error::{AgentError, AgentResult};
use crate::locomotion;
use crate::machine::StateMachine;
use crate::observer::SimObserver;

// ── AgentSlot ─────────────────────────────────────────────────────────────────

/// One agent's full runtime state: body, machine, RNG.  Indexed by
/// `AgentId`.
pub(crate) struct AgentSlot<K: StateKind> {
    pub(crate) body: AgentBody,
    pub(crate) machine: StateMachine<K>,
    pub(crate) rng: AgentRng,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The tick driver.
///
/// `Sim<K, E>` owns every agent plus the world services their perception
/// borrows, and drives the three-pass tick:
///
/// 1. **Update** — activation (first tick only), the active state's `update`
///    hook, and — when the decision timer fires — `ai_interval` plus
///    transition evaluation.
/// 2. **Locomotion** — chase retargeting and movement-intent resolution.
/// 3. **LateUpdate** — the active state's `late_update` hook.
///
/// Cadence hooks run only for alive, authoritative, un-stunned agents; the
/// stun countdown itself is driven at the end of the tick so all passes in
/// one tick agree on who is stunned.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<K: StateKind, E: PathEngine> {
    /// Global configuration (tick duration, decision interval, seed, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick.
    pub clock: TickClock,

    /// Walkable-surface graph shared by all agents.
    pub mesh: NavMesh,

    /// Pathfinding service.
    pub engine: E,

    /// Blocking-geometry linecast service.
    pub blockers: Box<dyn Linecast>,

    /// Observable world entities.
    pub roster: Roster,

    /// Candidate/observer eligibility predicates.
    pub eligibility: EligibilityPolicy,

    /// Shared claim bookkeeping, flushed at round boundaries.
    pub coord: CoordTable,

    /// Environment flag fed to perception each tick.
    pub foggy: bool,

    pub(crate) agents: Vec<AgentSlot<K>>,
}

impl<K: StateKind, E: PathEngine> Sim<K, E> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run exactly `n` ticks, invoking observer hooks at tick boundaries.
    pub fn run_ticks<O: SimObserver<K>>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.tick(observer);
        }
    }

    /// External round-lifecycle signal: clears every coordination-table
    /// claim so nothing stale leaks into the next round.
    pub fn end_round<O: SimObserver<K>>(&mut self, observer: &mut O) {
        self.coord.flush_all();
        observer.on_round_end();
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        (0..self.agents.len() as u32).map(AgentId)
    }

    pub fn body(&self, agent: AgentId) -> Option<&AgentBody> {
        self.agents.get(agent.index()).map(|slot| &slot.body)
    }

    pub fn body_mut(&mut self, agent: AgentId) -> Option<&mut AgentBody> {
        self.agents.get_mut(agent.index()).map(|slot| &mut slot.body)
    }

    pub fn machine(&self, agent: AgentId) -> Option<&StateMachine<K>> {
        self.agents.get(agent.index()).map(|slot| &slot.machine)
    }

    pub fn machine_mut(&mut self, agent: AgentId) -> Option<&mut StateMachine<K>> {
        self.agents.get_mut(agent.index()).map(|slot| &mut slot.machine)
    }

    // ── Stimulus entry points ─────────────────────────────────────────────

    /// Deliver a hit to `agent`.  The active state may intercept; otherwise
    /// default damage handling applies.
    pub fn hit_agent(&mut self, agent: AgentId, hit: HitEvent) -> AgentResult<()> {
        self.with_agent_ctx(agent, |machine, ctx| machine.handle_hit(ctx, &hit))
            .map(|_| ())
    }

    /// Deliver a stun to `agent`.
    pub fn stun_agent(&mut self, agent: AgentId, stun: StunEvent) -> AgentResult<()> {
        self.with_agent_ctx(agent, |machine, ctx| machine.handle_stun(ctx, &stun))
            .map(|_| ())
    }

    /// Forward an ad hoc signal to `agent`'s active state.
    pub fn trigger_custom_event(
        &mut self,
        agent: AgentId,
        name: &str,
        payload: &InitPayload,
    ) -> AgentResult<()> {
        self.with_agent_ctx(agent, |machine, ctx| {
            machine.trigger_custom_event(ctx, name, payload)
        })
        .map(|_| ())
    }

    /// Force `agent` into `new` outside transition evaluation.  Returns
    /// whether the switch happened (an unavailable kind abandons it).
    pub fn switch_agent_state(
        &mut self,
        agent: AgentId,
        new: K,
        payload: InitPayload,
    ) -> AgentResult<bool> {
        self.with_agent_ctx(agent, |machine, ctx| machine.switch_state(ctx, new, payload))
            .map(|taken| taken.unwrap_or(false))
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick<O: SimObserver<K>>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        let delta = self.config.tick_duration_secs;
        observer.on_tick_start(now);

        // ── Phase 1: update pass ──────────────────────────────────────────
        {
            // Explicit field borrows so the borrow checker sees disjoint
            // access between the agent list and the shared services.
            let mesh = &self.mesh;
            let engine = &self.engine;
            let blockers = self.blockers.as_ref();
            let roster = &self.roster;
            let eligibility = &self.eligibility;
            let coord = &mut self.coord;
            let foggy = self.foggy;
            let fog_cap = self.config.fog_range_cap;

            for slot in self.agents.iter_mut() {
                if !slot.body.is_authority() || !slot.body.alive || slot.body.is_stunned() {
                    continue;
                }

                let view = Perception::new(mesh, engine, blockers, roster, eligibility)
                    .with_fog(foggy, fog_cap);
                let before = slot.machine.current();
                let mut ctx = StateCtx {
                    tick: now,
                    delta_secs: delta,
                    body: &mut slot.body,
                    view: &view,
                    coord: &mut *coord,
                    rng: &mut slot.rng,
                };

                if slot.machine.current().is_none() {
                    slot.machine.activate(&mut ctx);
                }
                slot.machine.update(&mut ctx);

                let after = slot.machine.current();
                if after != before {
                    if let Some(new) = after {
                        observer.on_state_change(slot.body.id, before, new);
                    }
                }
            }
        }

        // ── Phase 2: locomotion pass ──────────────────────────────────────
        {
            let roster = &self.roster;
            for slot in self.agents.iter_mut() {
                if !slot.body.is_authority() || !slot.body.alive {
                    continue;
                }
                if let Some(target) = slot.body.move_intent.chase {
                    if roster.is_alive(target) {
                        slot.body.move_intent.destination = roster.position[target.index()];
                    }
                }
                locomotion::resolve(&mut slot.body, delta);
            }
        }

        // ── Phase 3: late-update pass ─────────────────────────────────────
        {
            let mesh = &self.mesh;
            let engine = &self.engine;
            let blockers = self.blockers.as_ref();
            let roster = &self.roster;
            let eligibility = &self.eligibility;
            let coord = &mut self.coord;
            let foggy = self.foggy;
            let fog_cap = self.config.fog_range_cap;

            for slot in self.agents.iter_mut() {
                if !slot.body.is_authority() || !slot.body.alive || slot.body.is_stunned() {
                    continue;
                }
                let view = Perception::new(mesh, engine, blockers, roster, eligibility)
                    .with_fog(foggy, fog_cap);
                let mut ctx = StateCtx {
                    tick: now,
                    delta_secs: delta,
                    body: &mut slot.body,
                    view: &view,
                    coord: &mut *coord,
                    rng: &mut slot.rng,
                };
                slot.machine.late_update(&mut ctx);
            }
        }

        // ── Phase 4: stun countdown ───────────────────────────────────────
        //
        // Decremented after all passes so every pass within one tick agrees
        // on who was stunned.
        for slot in self.agents.iter_mut() {
            if slot.body.stun_secs > 0.0 {
                slot.body.stun_secs = (slot.body.stun_secs - delta).max(0.0);
            }
        }

        observer.on_tick_end(now);
        self.clock.advance();
    }

    /// Assemble a one-off `StateCtx` for `agent` and run `f` with it.
    ///
    /// Used by the stimulus entry points; decision logic only exists on the
    /// authoritative side, so stimuli against remote mirrors are ignored
    /// (`Ok(None)`).
    fn with_agent_ctx<R>(
        &mut self,
        agent: AgentId,
        f: impl FnOnce(&mut StateMachine<K>, &mut StateCtx<'_>) -> R,
    ) -> AgentResult<Option<R>> {
        let now = self.clock.current_tick;
        let delta = self.config.tick_duration_secs;

        let mesh = &self.mesh;
        let engine = &self.engine;
        let blockers = self.blockers.as_ref();
        let roster = &self.roster;
        let eligibility = &self.eligibility;
        let coord = &mut self.coord;
        let foggy = self.foggy;
        let fog_cap = self.config.fog_range_cap;

        let Some(slot) = self.agents.get_mut(agent.index()) else {
            return Err(AgentError::UnknownAgent(agent));
        };
        if !slot.body.is_authority() {
            return Ok(None);
        }

        let view =
            Perception::new(mesh, engine, blockers, roster, eligibility).with_fog(foggy, fog_cap);
        let mut ctx = StateCtx {
            tick: now,
            delta_secs: delta,
            body: &mut slot.body,
            view: &view,
            coord: &mut *coord,
            rng: &mut slot.rng,
        };
        Ok(Some(f(&mut slot.machine, &mut ctx)))
    }
}
