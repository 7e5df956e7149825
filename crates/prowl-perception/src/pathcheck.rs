//! Three-way path-validity classification.
//!
//! Callers need to distinguish "can't get there" from "can get there but
//! will be seen on the way".  `PathStatus` encodes exactly that, and
//! [`Perception::is_path_valid`] computes it from the mesh, the pathfinder,
//! blocking geometry, and the current observer roster.

use prowl_core::{EyePose, Vec3};
use prowl_nav::GeometryMask;

use crate::view::Perception;

/// Snap radius when projecting the agent's own position onto the mesh.
/// An agent further than this from any mesh node is off-mesh.
const AGENT_SNAP_RADIUS: f32 = 2.0;

/// Snap radius when projecting the true destination onto the mesh for the
/// detour-shortfall test.
const TARGET_SNAP_RADIUS: f32 = 2.75;

/// A complete route must still end within this of the requested destination;
/// beyond it the destination is effectively unreachable.
const ARRIVAL_TOLERANCE: f32 = 4.0;

/// A final path corner landing further than this from the projected
/// destination means the path is a detour workaround, not a real arrival.
const DETOUR_SHORTFALL: f32 = 1.55;

/// Lift applied to segment endpoints for the sight test so corners resting
/// on the floor don't self-occlude against the ground.
const SEGMENT_LIFT: f32 = 0.25;

/// Result of classifying a route to a destination.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathStatus {
    /// No usable route: off-mesh start, no path, or an incomplete path that
    /// never gets near the destination.
    Invalid,
    /// A route exists but is exposed: it detours short of the destination,
    /// crosses sight-blocking geometry, or ends somewhere a living observer
    /// is already watching.
    ValidButInLos,
    /// A clean route.
    Valid,
}

impl PathStatus {
    /// `true` for any status that yields a walkable route.
    #[inline]
    pub fn is_reachable(self) -> bool {
        !matches!(self, PathStatus::Invalid)
    }
}

impl Perception<'_> {
    /// Classify the route from `from` to `target`.
    ///
    /// A destination within `near_enough` of `from` is trivially
    /// [`PathStatus::Valid`] — no path is computed.  With
    /// `check_line_of_sight` set, a walkable route is downgraded to
    /// [`PathStatus::ValidButInLos`] when any exposure test trips; without
    /// it, walkable means `Valid`.
    pub fn is_path_valid(
        &self,
        from: Vec3,
        target: Vec3,
        check_line_of_sight: bool,
        near_enough: f32,
    ) -> PathStatus {
        if from.distance(target) <= near_enough {
            return PathStatus::Valid;
        }

        // The agent itself must stand on the walkable surface.
        let Some((from_node, _)) = self.mesh.project(from, AGENT_SNAP_RADIUS) else {
            return PathStatus::Invalid;
        };
        // Route toward the mesh node nearest the destination; the arrival
        // tolerance below decides whether that is close enough to count.
        let Some(to_node) = self.mesh.nearest_node(target) else {
            return PathStatus::Invalid;
        };

        let path = match self.paths.find_path(self.mesh, from_node, to_node) {
            Ok(path) => path,
            Err(_) => return PathStatus::Invalid,
        };
        let Some(end) = path.end() else {
            return PathStatus::Invalid;
        };
        if !path.complete || end.distance(target) > ARRIVAL_TOLERANCE {
            return PathStatus::Invalid;
        }

        if !check_line_of_sight {
            return PathStatus::Valid;
        }

        // Detour workaround: the route "arrives" meaningfully short of where
        // the destination actually projects onto the mesh.  An unprojectable
        // destination is judged against the raw target point.
        let snapped = self
            .mesh
            .project(target, TARGET_SNAP_RADIUS)
            .map_or(target, |(_, point)| point);
        if end.distance(snapped) > DETOUR_SHORTFALL {
            return PathStatus::ValidButInLos;
        }

        // Any leg crossing sight-blocking geometry is an exposed leg.
        let lift = Vec3::new(0.0, SEGMENT_LIFT, 0.0);
        for leg in path.corners.windows(2) {
            if self
                .blockers
                .segment_blocked(leg[0] + lift, leg[1] + lift, GeometryMask::SIGHT)
            {
                return PathStatus::ValidButInLos;
            }
        }

        // A living observer already watching the destination compromises it.
        if self.closest_observer_of(target, None).is_some() {
            return PathStatus::ValidButInLos;
        }

        PathStatus::Valid
    }
}

/// Internal helper shared with the observer queries: eye pose of a roster
/// entry plus its own view capability.
pub(crate) fn observer_pose_and_cone(
    roster: &prowl_world::Roster,
    id: prowl_core::TargetId,
) -> (EyePose, crate::ViewCone) {
    let pose = roster.eye_pose(id);
    let cone = crate::ViewCone::new(
        roster.view_width_deg[id.index()],
        roster.view_range[id.index()],
    );
    (pose, cone)
}
