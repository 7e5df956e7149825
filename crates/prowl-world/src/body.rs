//! Per-creature mutable state: identity, role, vitals, and movement intent.

use prowl_core::{AgentId, EyePose, TargetId, Vec3};

// ── Role ──────────────────────────────────────────────────────────────────────

/// Which side of the authoritative/observer split this body lives on.
///
/// Exactly one `Authority` exists per agent; any number of `Remote` mirrors
/// render the published state identifier but never run decision logic.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    /// Runs the state machine and mutates world state.
    Authority,
    /// Mirrors replicated values only.
    Remote,
}

// ── MoveIntent ────────────────────────────────────────────────────────────────

/// The movement request the active state leaves for the locomotion pass.
///
/// States set intent; the tick driver resolves it into position changes every
/// `Update`.  Intent persists across ticks until a state overwrites it.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveIntent {
    /// Where the agent wants to be.
    pub destination: Vec3,
    /// `false` freezes the agent in place (it still decelerates).
    pub allowed: bool,
    /// When set, the destination is re-aimed at this target's live position
    /// each tick before resolution.
    pub chase: Option<TargetId>,
}

impl MoveIntent {
    /// Stand still at `position`.
    pub fn hold(position: Vec3) -> Self {
        Self { destination: position, allowed: false, chase: None }
    }

    /// Head for a fixed point.
    pub fn go_to(destination: Vec3) -> Self {
        Self { destination, allowed: true, chase: None }
    }

    /// Pursue a target's live position.
    pub fn pursue(target: TargetId, last_known: Vec3) -> Self {
        Self { destination: last_known, allowed: true, chase: Some(target) }
    }
}

// ── AgentBody ─────────────────────────────────────────────────────────────────

/// One creature's authoritative record: everything the states read and write
/// that is not private to a single state.
///
/// The body never references its own state machine; the orchestrator owns
/// both and hands states `&mut AgentBody` through the tick context.
#[derive(Clone, Debug)]
pub struct AgentBody {
    /// Stable identity, unique across the run.
    pub id: AgentId,

    /// Authoritative or mirrored.  Cadence hooks run only on `Authority`.
    pub role: Role,

    /// Cleared on death; dead agents stop receiving cadence hooks.
    pub alive: bool,

    // ── Pose ──────────────────────────────────────────────────────────────
    pub position: Vec3,
    /// Unit forward direction; updated by locomotion to face travel.
    pub facing: Vec3,
    /// Eye height above `position`.
    pub eye_height: f32,

    // ── Vision capability ─────────────────────────────────────────────────
    /// Field-of-view width in degrees.
    pub view_width_deg: f32,
    /// Sight range in world units.
    pub view_range: f32,
    /// Radius inside which targets are noticed regardless of the view cone.
    pub proximity_awareness: f32,

    // ── Movement ──────────────────────────────────────────────────────────
    pub move_intent: MoveIntent,
    /// Current scalar speed along the travel direction.
    pub speed: f32,
    pub max_speed: f32,
    pub acceleration: f32,

    // ── Vitals ────────────────────────────────────────────────────────────
    pub hp: i32,
    /// Remaining stun, in seconds.  While positive, cadence hooks are
    /// suppressed; the driver still counts it down.
    pub stun_secs: f32,
}

impl AgentBody {
    /// A live authoritative body at `position` with framework defaults;
    /// applications overwrite the capability fields after construction.
    pub fn new(id: AgentId, role: Role, position: Vec3) -> Self {
        Self {
            id,
            role,
            alive: true,
            position,
            facing: Vec3::new(0.0, 0.0, 1.0),
            eye_height: 1.8,
            view_width_deg: 160.0,
            view_range: 40.0,
            proximity_awareness: 3.0,
            move_intent: MoveIntent::hold(position),
            speed: 0.0,
            max_speed: 5.0,
            acceleration: 10.0,
            hp: 3,
            stun_secs: 0.0,
        }
    }

    #[inline]
    pub fn is_authority(&self) -> bool {
        self.role == Role::Authority
    }

    #[inline]
    pub fn is_stunned(&self) -> bool {
        self.stun_secs > 0.0
    }

    /// World-space eye point.
    #[inline]
    pub fn eye_point(&self) -> Vec3 {
        Vec3::new(self.position.x, self.position.y + self.eye_height, self.position.z)
    }

    /// Eye pose for line-of-sight queries.
    #[inline]
    pub fn eye_pose(&self) -> EyePose {
        EyePose::new(self.eye_point(), self.facing)
    }

    /// Apply damage; returns `true` if this hit brought HP to zero.
    ///
    /// Deliberately does NOT clear `alive`: the global death transition must
    /// still get an interval to fire, and its terminal state's entry hook is
    /// what declares the agent dead (see [`die`](Self::die)).
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.alive || self.hp == 0 {
            return false;
        }
        self.hp = (self.hp - amount).max(0);
        self.hp == 0
    }

    /// Declare the agent dead.  Cadence hooks stop after the current tick;
    /// typically called from a terminal state's entry hook.
    pub fn die(&mut self) {
        self.alive = false;
    }

    /// Begin (or extend) a stun.  Shorter incoming stuns never cut an
    /// ongoing one short.
    pub fn apply_stun(&mut self, duration_secs: f32) {
        self.stun_secs = self.stun_secs.max(duration_secs.max(0.0));
    }
}
