//! The per-tick perception context.

use prowl_nav::{Linecast, NavMesh, PathEngine};
use prowl_world::{EligibilityPolicy, Roster};

/// A field-of-view cone: angular width plus range.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewCone {
    /// Total cone width in degrees (the half-angle test uses width / 2).
    pub width_deg: f32,
    /// Sight range in world units, before any fog clamp.
    pub range: f32,
}

impl ViewCone {
    #[inline]
    pub fn new(width_deg: f32, range: f32) -> Self {
        Self { width_deg, range }
    }
}

/// A read-only borrow of every service perception queries need, valid for
/// one tick.
///
/// `Perception` is built once per tick by the driver and shared (immutably)
/// across all agent callbacks.  No heap allocation happens between ticks;
/// the same references are reassembled with the tick's environment flags.
///
/// # Lifetimes
///
/// All borrows live for the duration of one tick's update pass.  The driver
/// never allows mutable access to these structures while a `Perception` is
/// live.
pub struct Perception<'a> {
    /// Walkable-surface graph.
    pub mesh: &'a NavMesh,

    /// Pathfinding service (engine-supplied or the in-crate default).
    pub paths: &'a dyn PathEngine,

    /// Blocking-geometry linecast service.
    pub blockers: &'a dyn Linecast,

    /// Observable world entities.
    pub roster: &'a Roster,

    /// Candidate/observer eligibility predicates.
    pub eligibility: &'a EligibilityPolicy,

    /// `true` while the environment is foggy this tick.
    pub foggy: bool,

    /// Sight-range cap applied while foggy.
    pub fog_range_cap: f32,
}

impl<'a> Perception<'a> {
    /// Assemble a context for one tick.
    #[inline]
    pub fn new(
        mesh:        &'a NavMesh,
        paths:       &'a dyn PathEngine,
        blockers:    &'a dyn Linecast,
        roster:      &'a Roster,
        eligibility: &'a EligibilityPolicy,
    ) -> Self {
        Self {
            mesh,
            paths,
            blockers,
            roster,
            eligibility,
            foggy: false,
            fog_range_cap: 30.0,
        }
    }

    /// Set the tick's fog state.
    pub fn with_fog(mut self, foggy: bool, fog_range_cap: f32) -> Self {
        self.foggy = foggy;
        self.fog_range_cap = fog_range_cap;
        self
    }

    /// The fog cap to apply this tick, if any.
    #[inline]
    pub(crate) fn fog_cap(&self) -> Option<f32> {
        self.foggy.then_some(self.fog_range_cap)
    }
}
