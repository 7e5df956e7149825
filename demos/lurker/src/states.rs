//! The lurker's behaviour states.
//!
//! A lurker drifts between waypoints until it spots someone, shadows them
//! while the claim holds, pounces when close, and retreats along an unseen
//! route after taking a hit.  HP reaching zero preempts everything via a
//! global transition into the terminal `Dead` state.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use prowl_coord::Relationship;
use prowl_core::{RallyPointId, WaypointId};
use prowl_perception::{SearchMode, Waypoint};
use prowl_state::{
    BehaviourState, InitPayload, StateCtx, StateKind, StateResult, StateTransition, When,
};
use prowl_world::MoveIntent;

// ── State kinds ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum LurkerState {
    Roam,
    Stalk,
    Pounce,
    Flee,
    Dead,
}

impl fmt::Display for LurkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl StateKind for LurkerState {
    fn initial() -> Self {
        LurkerState::Roam
    }
}

// ── Shared predicates ─────────────────────────────────────────────────────────

/// Distance under which a stalked target is close enough to pounce.
const POUNCE_RANGE: f32 = 5.0;

/// Waypoints closer than this to the agent are not worth travelling to.
const WAYPOINT_BUFFER: f32 = 2.0;

/// Re-acquisition hysteresis while stalking.
const TARGET_SWITCH_BUFFER: f32 = 3.0;

fn sees_someone(ctx: &StateCtx<'_>) -> bool {
    ctx.view
        .closest_visible_target(
            ctx.eye(),
            ctx.view_cone(),
            None,
            0.0,
            ctx.body.proximity_awareness,
        )
        .is_some()
}

fn stalked_target_lost(ctx: &StateCtx<'_>) -> bool {
    let held = ctx.coord.bound_target(ctx.body.id, Relationship::Stalk);
    ctx.view
        .closest_visible_target(
            ctx.eye(),
            ctx.view_cone(),
            held,
            TARGET_SWITCH_BUFFER,
            ctx.body.proximity_awareness,
        )
        .is_none()
}

fn stalked_target_in_pounce_range(ctx: &StateCtx<'_>) -> bool {
    match ctx.coord.bound_target(ctx.body.id, Relationship::Stalk) {
        Some(target) if ctx.view.roster.is_alive(target) => {
            let position = ctx.view.roster.position[target.index()];
            ctx.body.position.distance(position) <= POUNCE_RANGE
        }
        _ => false,
    }
}

// ── Global transitions ────────────────────────────────────────────────────────

/// hp == 0 preempts every state.
pub fn death_transition() -> Box<dyn StateTransition<LurkerState>> {
    When::new(LurkerState::Dead, |ctx| ctx.body.hp <= 0).boxed()
}

/// Fires once per HP drop: fleeing is the default reaction to getting hurt.
///
/// Hand-implemented because the destination check depends on a transient
/// field (the HP level seen last interval) rather than world state alone.
pub struct HurtSince {
    last_hp: Option<i32>,
}

impl HurtSince {
    pub fn boxed() -> Box<dyn StateTransition<LurkerState>> {
        Box::new(Self { last_hp: None })
    }
}

impl StateTransition<LurkerState> for HurtSince {
    fn should_take(&mut self, ctx: &StateCtx<'_>) -> bool {
        let hp = ctx.body.hp;
        let dropped = self.last_hp.is_some_and(|seen| hp < seen && hp > 0);
        self.last_hp = Some(hp);
        dropped
    }

    fn next_state(&self) -> LurkerState {
        LurkerState::Flee
    }
}

// ── Roam ──────────────────────────────────────────────────────────────────────

/// Drift between waypoints, never revisiting until the set is exhausted.
pub struct RoamState {
    waypoints: Arc<Vec<Waypoint>>,
    visited: Vec<WaypointId>,
    transitions: Vec<Box<dyn StateTransition<LurkerState>>>,
}

impl RoamState {
    pub fn new(waypoints: Arc<Vec<Waypoint>>) -> Self {
        Self {
            waypoints,
            visited: Vec::new(),
            transitions: vec![When::new(LurkerState::Stalk, sees_someone).boxed()],
        }
    }
}

impl BehaviourState<LurkerState> for RoamState {
    fn on_enter(&mut self, ctx: &mut StateCtx<'_>, _init: &InitPayload) -> StateResult<()> {
        self.visited.clear();
        ctx.body.move_intent = MoveIntent::hold(ctx.body.position);
        Ok(())
    }

    fn ai_interval(&mut self, ctx: &mut StateCtx<'_>) {
        let arrived =
            ctx.body.position.distance(ctx.body.move_intent.destination) < WAYPOINT_BUFFER;
        if ctx.body.move_intent.allowed && !arrived {
            return;
        }

        // Mix it up: mostly wander to the nearest fresh waypoint, sometimes
        // strike out for the far side of the set.
        let mode = if ctx.rng.gen_bool(0.25) {
            SearchMode::Farthest
        } else {
            SearchMode::Closest
        };
        let search = ctx.view.find_node(
            mode,
            ctx.body.position,
            &self.waypoints,
            &self.visited,
            false,
            true,
            WAYPOINT_BUFFER,
        );
        match search.node {
            Some(waypoint) => {
                self.visited.push(waypoint.id);
                ctx.body.move_intent = MoveIntent::go_to(waypoint.position);
            }
            None => {
                // Every waypoint visited (or unreachable): start over.
                self.visited.clear();
            }
        }
    }

    fn transitions(&mut self) -> &mut [Box<dyn StateTransition<LurkerState>>] {
        &mut self.transitions
    }
}

// ── Stalk ─────────────────────────────────────────────────────────────────────

/// Shadow the claimed target.  The claim is exclusive: a target someone else
/// is already stalking never gets a second shadow.
pub struct StalkState {
    transitions: Vec<Box<dyn StateTransition<LurkerState>>>,
}

impl StalkState {
    pub fn new() -> Self {
        Self {
            transitions: vec![
                When::new(LurkerState::Pounce, stalked_target_in_pounce_range).boxed(),
                When::new(LurkerState::Roam, stalked_target_lost).boxed(),
            ],
        }
    }
}

impl BehaviourState<LurkerState> for StalkState {
    fn on_enter(&mut self, ctx: &mut StateCtx<'_>, _init: &InitPayload) -> StateResult<()> {
        let Some(target) = ctx.view.closest_visible_target(
            ctx.eye(),
            ctx.view_cone(),
            None,
            0.0,
            ctx.body.proximity_awareness,
        ) else {
            // Spotted-then-gone: the lost-target transition exits next interval.
            return Ok(());
        };

        if ctx.coord.bind(ctx.body.id, target, Relationship::Stalk) {
            let position = ctx.view.roster.position[target.index()];
            ctx.body.move_intent = MoveIntent::pursue(target, position);
        }
        Ok(())
    }

    fn ai_interval(&mut self, ctx: &mut StateCtx<'_>) {
        // Re-validate the claim with hysteresis; a strictly better candidate
        // may replace it, in which case the claim moves too.
        let held = ctx.coord.bound_target(ctx.body.id, Relationship::Stalk);
        let best = ctx.view.closest_visible_target(
            ctx.eye(),
            ctx.view_cone(),
            held,
            TARGET_SWITCH_BUFFER,
            ctx.body.proximity_awareness,
        );
        if best != held {
            ctx.coord.unbind(ctx.body.id, Relationship::Stalk);
            if let Some(target) = best {
                if ctx.coord.bind(ctx.body.id, target, Relationship::Stalk) {
                    let position = ctx.view.roster.position[target.index()];
                    ctx.body.move_intent = MoveIntent::pursue(target, position);
                }
            }
        }
    }

    fn on_exit(&mut self, ctx: &mut StateCtx<'_>) -> StateResult<()> {
        ctx.coord.unbind(ctx.body.id, Relationship::Stalk);
        ctx.body.move_intent = MoveIntent::hold(ctx.body.position);
        Ok(())
    }

    fn transitions(&mut self) -> &mut [Box<dyn StateTransition<LurkerState>>] {
        &mut self.transitions
    }
}

// ── Pounce ────────────────────────────────────────────────────────────────────

/// A short, rooted lunge; hands back to Stalk when the wind-down elapses.
pub struct PounceState {
    countdown: f32,
    done: Arc<AtomicBool>,
    transitions: Vec<Box<dyn StateTransition<LurkerState>>>,
}

const POUNCE_SECONDS: f32 = 1.0;

impl PounceState {
    pub fn new() -> Self {
        let done = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&done);
        Self {
            countdown: POUNCE_SECONDS,
            done,
            transitions: vec![When::new(LurkerState::Stalk, move |_| {
                flag.load(Ordering::Relaxed)
            })
            .boxed()],
        }
    }
}

impl BehaviourState<LurkerState> for PounceState {
    fn on_enter(&mut self, ctx: &mut StateCtx<'_>, _init: &InitPayload) -> StateResult<()> {
        self.countdown = POUNCE_SECONDS;
        self.done.store(false, Ordering::Relaxed);
        ctx.body.move_intent = MoveIntent::hold(ctx.body.position);
        Ok(())
    }

    fn update(&mut self, ctx: &mut StateCtx<'_>) {
        // Plain per-tick countdown: a forced exit simply stops the ticking.
        self.countdown -= ctx.delta_secs;
        if self.countdown <= 0.0 {
            self.done.store(true, Ordering::Relaxed);
        }
    }

    fn transitions(&mut self) -> &mut [Box<dyn StateTransition<LurkerState>>] {
        &mut self.transitions
    }
}

// ── Flee ──────────────────────────────────────────────────────────────────────

/// Retreat until the nerves settle.  Prefers an exclusive rally point;
/// falls back to the farthest waypoint along an unwatched route.
pub struct FleeState {
    waypoints: Arc<Vec<Waypoint>>,
    countdown: f32,
    calmed: Arc<AtomicBool>,
    claimed: Option<RallyPointId>,
    transitions: Vec<Box<dyn StateTransition<LurkerState>>>,
}

const FLEE_SECONDS: f32 = 4.0;

impl FleeState {
    pub fn new(waypoints: Arc<Vec<Waypoint>>) -> Self {
        let calmed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&calmed);
        Self {
            waypoints,
            countdown: FLEE_SECONDS,
            calmed,
            claimed: None,
            transitions: vec![When::new(LurkerState::Roam, move |_| {
                flag.load(Ordering::Relaxed)
            })
            .boxed()],
        }
    }
}

impl BehaviourState<LurkerState> for FleeState {
    fn on_enter(&mut self, ctx: &mut StateCtx<'_>, _init: &InitPayload) -> StateResult<()> {
        self.countdown = FLEE_SECONDS;
        self.calmed.store(false, Ordering::Relaxed);

        self.claimed = ctx.coord.occupy_rally_point(ctx.body.id);
        if let Some(spot) = self.claimed.and_then(|point| ctx.coord.rally_position(point)) {
            ctx.body.move_intent = MoveIntent::go_to(spot);
            return Ok(());
        }

        let search = ctx.view.find_node(
            SearchMode::Farthest,
            ctx.body.position,
            &self.waypoints,
            &[],
            true,
            true,
            WAYPOINT_BUFFER,
        );
        if let Some(waypoint) = search.node {
            ctx.body.move_intent = MoveIntent::go_to(waypoint.position);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut StateCtx<'_>) {
        self.countdown -= ctx.delta_secs;
        if self.countdown <= 0.0 {
            self.calmed.store(true, Ordering::Relaxed);
        }
    }

    fn on_exit(&mut self, ctx: &mut StateCtx<'_>) -> StateResult<()> {
        if let Some(point) = self.claimed.take() {
            ctx.coord.unoccupy_rally_point(point);
        }
        Ok(())
    }

    fn transitions(&mut self) -> &mut [Box<dyn StateTransition<LurkerState>>] {
        &mut self.transitions
    }
}

// ── Dead ──────────────────────────────────────────────────────────────────────

/// Terminal: no transitions out.
pub struct DeadState;

impl BehaviourState<LurkerState> for DeadState {
    fn on_enter(&mut self, ctx: &mut StateCtx<'_>, _init: &InitPayload) -> StateResult<()> {
        // Release every claim on the way out; nothing may stay bound to a corpse.
        ctx.coord.unbind(ctx.body.id, Relationship::Stalk);
        ctx.coord.unbind(ctx.body.id, Relationship::Hunt);
        ctx.coord.unbind(ctx.body.id, Relationship::Abduct);
        ctx.body.move_intent = MoveIntent::hold(ctx.body.position);
        ctx.body.die();
        Ok(())
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

/// Build the lurker's state registry over a shared waypoint set.
pub fn lurker_registry(
    waypoints: Arc<Vec<Waypoint>>,
) -> prowl_state::StateRegistry<LurkerState> {
    let roam_waypoints = Arc::clone(&waypoints);
    let flee_waypoints = Arc::clone(&waypoints);
    prowl_state::StateRegistry::builder()
        .register(LurkerState::Roam, move || {
            Box::new(RoamState::new(Arc::clone(&roam_waypoints)))
        })
        .register(LurkerState::Stalk, || Box::new(StalkState::new()))
        .register(LurkerState::Pounce, || Box::new(PounceState::new()))
        .register(LurkerState::Flee, move || {
            Box::new(FleeState::new(Arc::clone(&flee_waypoints)))
        })
        .register(LurkerState::Dead, || Box::new(DeadState))
        .build()
}
