//! The coordination table: exclusive target bindings and rally occupancy.

use rustc_hash::FxHashMap;

use prowl_core::{AgentId, RallyPointId, TargetId, Vec3};

// ── Relationship ──────────────────────────────────────────────────────────────

/// The kind of claim an agent can hold on a target.
///
/// Exclusivity is **per kind**: the same target may simultaneously be
/// stalked by one agent and marked for abduction by another, but never
/// stalked by two.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Relationship {
    /// Quietly following the target.
    Stalk,
    /// Actively chasing the target.
    Hunt,
    /// Carrying the target off.
    Abduct,
}

// ── RallyPoint ────────────────────────────────────────────────────────────────

/// A fixed world position agents can claim exclusively.
#[derive(Copy, Clone, Debug)]
pub struct RallyPoint {
    pub position: Vec3,
}

// ── CoordTable ────────────────────────────────────────────────────────────────

/// Which agent holds which target under which relationship, and which rally
/// points are taken.
///
/// Invariants (enforced by [`bind`](Self::bind)):
/// - per relationship, a target is bound to at most one agent;
/// - per relationship, an agent holds at most one binding.
///
/// The paired forward/reverse maps keep both directions O(1); they are
/// updated together and only together.
#[derive(Default)]
pub struct CoordTable {
    /// (relationship, target) → holding agent.
    by_target: FxHashMap<(Relationship, TargetId), AgentId>,
    /// (relationship, agent) → held target.
    by_agent: FxHashMap<(Relationship, AgentId), TargetId>,

    /// Registered rally points, indexed by `RallyPointId`.
    rally_points: Vec<RallyPoint>,
    /// Occupant of each rally point, parallel to `rally_points`.
    rally_owner: Vec<Option<AgentId>>,
}

impl CoordTable {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Target bindings ───────────────────────────────────────────────────

    /// Claim `target` for `agent` under `kind`.
    ///
    /// Returns `true` if the claim holds after the call.  Re-binding while
    /// the agent already holds a `kind` claim is an idempotent no-op (and
    /// returns `true` only if it is the *same* target).  A target already
    /// claimed by a different agent is rejected — never silently stolen.
    pub fn bind(&mut self, agent: AgentId, target: TargetId, kind: Relationship) -> bool {
        if let Some(&held) = self.by_agent.get(&(kind, agent)) {
            return held == target;
        }
        if self.by_target.contains_key(&(kind, target)) {
            return false;
        }
        self.by_target.insert((kind, target), agent);
        self.by_agent.insert((kind, agent), target);
        true
    }

    /// Release `agent`'s `kind` claim, if any.
    pub fn unbind(&mut self, agent: AgentId, kind: Relationship) {
        if let Some(target) = self.by_agent.remove(&(kind, agent)) {
            self.by_target.remove(&(kind, target));
        }
    }

    /// `true` if any agent holds `target` under `kind`.
    #[inline]
    pub fn is_bound(&self, target: TargetId, kind: Relationship) -> bool {
        self.by_target.contains_key(&(kind, target))
    }

    /// The agent holding `target` under `kind`, if any.
    #[inline]
    pub fn holder_of(&self, target: TargetId, kind: Relationship) -> Option<AgentId> {
        self.by_target.get(&(kind, target)).copied()
    }

    /// The target `agent` holds under `kind`, if any.
    #[inline]
    pub fn bound_target(&self, agent: AgentId, kind: Relationship) -> Option<TargetId> {
        self.by_agent.get(&(kind, agent)).copied()
    }

    // ── Rally points ──────────────────────────────────────────────────────

    /// Register a rally point; returns its id.  Registration happens at
    /// level load, before any agent runs.
    pub fn add_rally_point(&mut self, position: Vec3) -> RallyPointId {
        let id = RallyPointId(self.rally_points.len() as u16);
        self.rally_points.push(RallyPoint { position });
        self.rally_owner.push(None);
        id
    }

    /// Claim the first unoccupied rally point for `agent` (first-free-wins
    /// linear scan).  Returns `None` when every point is taken.
    pub fn occupy_rally_point(&mut self, agent: AgentId) -> Option<RallyPointId> {
        let free = self.rally_owner.iter().position(|owner| owner.is_none())?;
        self.rally_owner[free] = Some(agent);
        Some(RallyPointId(free as u16))
    }

    /// Release a rally point.  Releasing an unoccupied point is a no-op.
    pub fn unoccupy_rally_point(&mut self, point: RallyPointId) {
        if let Some(owner) = self.rally_owner.get_mut(point.index()) {
            *owner = None;
        }
    }

    /// Position of a registered rally point.
    pub fn rally_position(&self, point: RallyPointId) -> Option<Vec3> {
        self.rally_points.get(point.index()).map(|p| p.position)
    }

    /// Occupant of a rally point, if any.
    pub fn rally_occupant(&self, point: RallyPointId) -> Option<AgentId> {
        self.rally_owner.get(point.index()).copied().flatten()
    }

    pub fn rally_point_count(&self) -> usize {
        self.rally_points.len()
    }

    // ── Round boundary ────────────────────────────────────────────────────

    /// Clear every binding and rally occupancy.  Called by the round
    /// lifecycle signal so stale claims never leak into the next round.
    /// Rally point registrations survive; only occupancy is cleared.
    pub fn flush_all(&mut self) {
        self.by_target.clear();
        self.by_agent.clear();
        for owner in self.rally_owner.iter_mut() {
            *owner = None;
        }
    }
}
