//! World roster: Structure-of-Arrays storage for observable entities.
//!
//! Every `Vec` field has exactly `count` elements; the `TargetId` value is
//! the index into all of them:
//!
//! ```ignore
//! let pos = roster.position[target.index()];  // O(1), cache-friendly
//! ```
//!
//! Entities here are the things creatures can target and that can observe
//! positions in return — they are *not* the state-driven creatures
//! themselves (those own an `AgentBody`).

use prowl_core::{EyePose, TargetId, Vec3};

/// Structure-of-Arrays storage for all observable world entities.
pub struct Roster {
    /// Number of entities.  Equals the length of every SoA `Vec`.
    pub count: usize,

    // ── Pose ──────────────────────────────────────────────────────────────
    /// Feet position of each entity.
    pub position: Vec<Vec3>,

    /// Unit forward (look) direction of each entity.
    pub facing: Vec<Vec3>,

    /// Eye height above `position`, in world units.
    pub eye_height: Vec<f32>,

    // ── Status ────────────────────────────────────────────────────────────
    /// `false` once the entity is dead; dead entities are never eligible.
    pub alive: Vec<bool>,

    // ── Observation capability ────────────────────────────────────────────
    /// How far this entity itself can see, in world units.
    pub view_range: Vec<f32>,

    /// This entity's own field-of-view width in degrees.
    pub view_width_deg: Vec<f32>,
}

impl Roster {
    /// An empty roster — useful for creatures simulated without any
    /// observable entities around.
    pub fn new() -> Self {
        Self {
            count:          0,
            position:       Vec::new(),
            facing:         Vec::new(),
            eye_height:     Vec::new(),
            alive:          Vec::new(),
            view_range:     Vec::new(),
            view_width_deg: Vec::new(),
        }
    }

    /// Append an entity with default observation capability and return its id.
    pub fn push(&mut self, position: Vec3, facing: Vec3) -> TargetId {
        self.push_with_view(position, facing, 60.0, 160.0)
    }

    /// Append an entity with explicit view capability and return its id.
    pub fn push_with_view(
        &mut self,
        position: Vec3,
        facing: Vec3,
        view_range: f32,
        view_width_deg: f32,
    ) -> TargetId {
        let id = TargetId(self.count as u32);
        self.position.push(position);
        self.facing.push(facing.normalized());
        self.eye_height.push(1.6);
        self.alive.push(true);
        self.view_range.push(view_range);
        self.view_width_deg.push(view_width_deg);
        self.count += 1;
        id
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Iterator over all `TargetId`s in ascending index order.
    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        (0..self.count as u32).map(TargetId)
    }

    /// `true` if `id` indexes a live entity.
    #[inline]
    pub fn is_alive(&self, id: TargetId) -> bool {
        id.index() < self.count && self.alive[id.index()]
    }

    /// World-space eye point of `id` (feet position + eye height).
    #[inline]
    pub fn eye_point(&self, id: TargetId) -> Vec3 {
        let p = self.position[id.index()];
        Vec3::new(p.x, p.y + self.eye_height[id.index()], p.z)
    }

    /// Full eye pose of `id` for line-of-sight queries.
    #[inline]
    pub fn eye_pose(&self, id: TargetId) -> EyePose {
        EyePose::new(self.eye_point(id), self.facing[id.index()])
    }
}

impl Default for Roster {
    fn default() -> Self {
        Self::new()
    }
}
