//! Integration-style tests for the perception queries.

use prowl_core::{EyePose, TargetId, Vec3, WaypointId};
use prowl_nav::{BlockerSet, DijkstraEngine, GeometryMask, NavMesh, NavMeshBuilder};
use prowl_world::{EligibilityPolicy, Roster};

use crate::{NodeSearch, PathStatus, Perception, SearchMode, ViewCone, Waypoint};

static ENGINE: DijkstraEngine = DijkstraEngine;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Everything a `Perception` borrows, owned in one place for tests.
struct TestWorld {
    mesh: NavMesh,
    blockers: BlockerSet,
    roster: Roster,
    eligibility: EligibilityPolicy,
}

impl TestWorld {
    /// Corridor of nodes along +x at 2-unit spacing (0..=10), plus a
    /// disconnected island at x = 20 and 22.
    fn corridor() -> Self {
        let mut b = NavMeshBuilder::new();
        let main: Vec<_> = (0..=5)
            .map(|i| b.add_node(Vec3::new(i as f32 * 2.0, 0.0, 0.0)))
            .collect();
        for pair in main.windows(2) {
            b.add_link(pair[0], pair[1]);
        }
        let island_a = b.add_node(Vec3::new(20.0, 0.0, 0.0));
        let island_b = b.add_node(Vec3::new(22.0, 0.0, 0.0));
        b.add_link(island_a, island_b);

        Self {
            mesh: b.build(),
            blockers: BlockerSet::new(),
            roster: Roster::new(),
            eligibility: EligibilityPolicy::new(),
        }
    }

    /// Sight-blocking wall crossing the corridor at x ∈ [4.2, 4.8].
    fn with_wall(mut self) -> Self {
        self.blockers.add_box(
            Vec3::new(4.2, 0.0, -3.0),
            Vec3::new(4.8, 4.0, 3.0),
            GeometryMask::SIGHT,
        );
        self
    }

    fn perception(&self) -> Perception<'_> {
        Perception::new(&self.mesh, &ENGINE, &self.blockers, &self.roster, &self.eligibility)
    }
}

fn eye_at_origin() -> EyePose {
    EyePose::new(Vec3::new(0.0, 1.8, 0.0), Vec3::new(1.0, 0.0, 0.0))
}

fn wide_cone(range: f32) -> ViewCone {
    ViewCone::new(90.0, range)
}

// ── Line of sight ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod sight_tests {
    use super::*;

    #[test]
    fn sees_target_in_cone_and_range() {
        let world = TestWorld::corridor();
        let p = world.perception();
        assert!(p.has_line_of_sight(
            Vec3::new(10.0, 1.8, 0.0),
            eye_at_origin(),
            wide_cone(20.0),
            0.0,
            false,
        ));
    }

    #[test]
    fn out_of_range_is_invisible() {
        let world = TestWorld::corridor();
        let p = world.perception();
        assert!(!p.has_line_of_sight(
            Vec3::new(30.0, 1.8, 0.0),
            eye_at_origin(),
            wide_cone(20.0),
            0.0,
            false,
        ));
    }

    #[test]
    fn fog_clamps_range_downward() {
        let world = TestWorld::corridor();
        let p = world.perception().with_fog(true, 5.0);
        let target = Vec3::new(10.0, 1.8, 0.0);
        // Clear weather: visible at 10 units.
        assert!(p.has_line_of_sight(target, eye_at_origin(), wide_cone(20.0), 0.0, false));
        // Foggy: effective range drops to the cap.
        assert!(!p.has_line_of_sight(target, eye_at_origin(), wide_cone(20.0), 0.0, true));
    }

    #[test]
    fn fog_never_extends_a_short_range() {
        let world = TestWorld::corridor();
        let p = world.perception().with_fog(true, 50.0);
        // Range 3 stays range 3 under a 50-unit cap.
        assert!(!p.has_line_of_sight(
            Vec3::new(10.0, 1.8, 0.0),
            eye_at_origin(),
            wide_cone(3.0),
            0.0,
            true,
        ));
    }

    #[test]
    fn behind_the_cone_is_invisible() {
        let world = TestWorld::corridor();
        let p = world.perception();
        assert!(!p.has_line_of_sight(
            Vec3::new(-5.0, 1.8, 0.0),
            eye_at_origin(),
            wide_cone(20.0),
            0.0,
            false,
        ));
    }

    #[test]
    fn proximity_bypasses_cone_but_not_walls() {
        let mut world = TestWorld::corridor();
        let p = world.perception();
        let behind = Vec3::new(-2.0, 1.8, 0.0);
        // Within proximity awareness: the cone no longer matters.
        assert!(p.has_line_of_sight(behind, eye_at_origin(), wide_cone(20.0), 3.0, false));

        // A wall between eye and target still blocks, proximity or not.
        world.blockers.add_box(
            Vec3::new(-1.5, 0.0, -2.0),
            Vec3::new(-1.0, 4.0, 2.0),
            GeometryMask::SIGHT,
        );
        let p = world.perception();
        assert!(!p.has_line_of_sight(behind, eye_at_origin(), wide_cone(20.0), 3.0, false));
    }

    #[test]
    fn coincident_target_is_always_visible() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let eye = eye_at_origin();
        assert!(p.has_line_of_sight(eye.position, eye, wide_cone(0.0), 0.0, true));
    }
}

// ── Path classification ───────────────────────────────────────────────────────

#[cfg(test)]
mod pathcheck_tests {
    use super::*;

    #[test]
    fn near_enough_is_trivially_valid() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), true, 2.0);
        assert_eq!(status, PathStatus::Valid);
    }

    #[test]
    fn off_mesh_agent_is_invalid() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let status = p.is_path_valid(Vec3::new(0.0, 10.0, 0.0), Vec3::new(8.0, 0.0, 0.0), false, 0.0);
        assert_eq!(status, PathStatus::Invalid);
    }

    #[test]
    fn unreachable_island_is_invalid() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0), false, 0.0);
        assert_eq!(status, PathStatus::Invalid);
    }

    #[test]
    fn clean_route_is_valid() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), true, 0.0);
        assert_eq!(status, PathStatus::Valid);
    }

    #[test]
    fn blocked_segment_downgrades_never_valid() {
        let world = TestWorld::corridor().with_wall();
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), true, 0.0);
        assert_eq!(status, PathStatus::ValidButInLos);
    }

    #[test]
    fn blocked_segment_ignored_without_los_check() {
        let world = TestWorld::corridor().with_wall();
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), false, 0.0);
        assert_eq!(status, PathStatus::Valid);
    }

    #[test]
    fn watched_destination_downgrades() {
        let mut world = TestWorld::corridor();
        // Observer standing past the destination, looking back down the corridor.
        world.roster.push(Vec3::new(14.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), true, 0.0);
        assert_eq!(status, PathStatus::ValidButInLos);
    }

    #[test]
    fn dead_observer_does_not_downgrade() {
        let mut world = TestWorld::corridor();
        let watcher = world.roster.push(Vec3::new(14.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        world.roster.alive[watcher.index()] = false;
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), true, 0.0);
        assert_eq!(status, PathStatus::Valid);
    }

    #[test]
    fn sideways_destination_is_a_detour() {
        let world = TestWorld::corridor();
        let p = world.perception();
        // 3 units off the corridor: walkable to the nearest node, but the
        // route ends short of the true destination.
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(10.0, 0.0, 3.0), true, 0.0);
        assert_eq!(status, PathStatus::ValidButInLos);
    }

    #[test]
    fn far_off_mesh_destination_is_invalid() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let status = p.is_path_valid(Vec3::ZERO, Vec3::new(10.0, 0.0, 8.0), true, 0.0);
        assert_eq!(status, PathStatus::Invalid);
    }
}

// ── Waypoint search ───────────────────────────────────────────────────────────

#[cfg(test)]
mod waypoint_tests {
    use super::*;

    fn waypoints(points: &[(u32, Vec3)]) -> Vec<Waypoint> {
        points
            .iter()
            .map(|&(id, pos)| Waypoint::new(WaypointId(id), pos))
            .collect()
    }

    #[test]
    fn closest_clean_candidate_wins() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let candidates = waypoints(&[
            (0, Vec3::new(8.0, 0.0, 0.0)),
            (1, Vec3::new(4.0, 0.0, 0.0)),
        ]);
        let result = p.find_node(SearchMode::Closest, Vec3::ZERO, &candidates, &[], false, false, 0.0);
        assert_eq!(result.status, PathStatus::Valid);
        assert_eq!(result.node.map(|w| w.id), Some(WaypointId(1)));
    }

    #[test]
    fn farthest_mode_reverses_ranking() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let candidates = waypoints(&[
            (0, Vec3::new(4.0, 0.0, 0.0)),
            (1, Vec3::new(8.0, 0.0, 0.0)),
        ]);
        let result = p.find_node(SearchMode::Farthest, Vec3::ZERO, &candidates, &[], false, false, 0.0);
        assert_eq!(result.node.map(|w| w.id), Some(WaypointId(1)));
    }

    #[test]
    fn buffer_and_ignore_filter_candidates() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let candidates = waypoints(&[
            (0, Vec3::new(2.0, 0.0, 0.0)),
            (1, Vec3::new(6.0, 0.0, 0.0)),
            (2, Vec3::new(10.0, 0.0, 0.0)),
        ]);
        // Buffer removes waypoint 0; ignore removes waypoint 1.
        let result = p.find_node(
            SearchMode::Closest,
            Vec3::ZERO,
            &candidates,
            &[WaypointId(1)],
            false,
            false,
            4.0,
        );
        assert_eq!(result.node.map(|w| w.id), Some(WaypointId(2)));
    }

    #[test]
    fn fallback_returns_seen_but_walkable_route() {
        // Waypoint A: farther, clear sight, but unreachable (island).
        // Waypoint B: closer, reachable, but its route is watched/blocked.
        let world = TestWorld::corridor().with_wall();
        let p = world.perception();
        let candidates = waypoints(&[
            (0, Vec3::new(20.0, 0.0, 0.0)), // A — island
            (1, Vec3::new(8.0, 0.0, 0.0)),  // B — behind the wall
        ]);

        let with_fallback =
            p.find_node(SearchMode::Closest, Vec3::ZERO, &candidates, &[], true, true, 0.0);
        assert_eq!(with_fallback.status, PathStatus::ValidButInLos);
        assert_eq!(with_fallback.node.map(|w| w.id), Some(WaypointId(1)));

        let without_fallback =
            p.find_node(SearchMode::Closest, Vec3::ZERO, &candidates, &[], true, false, 0.0);
        assert_eq!(without_fallback, NodeSearch { node: None, status: PathStatus::Invalid });
    }

    #[test]
    fn clean_candidate_beats_earlier_fallback() {
        // Farthest-first ranks the watched candidate before the clean one;
        // the scan must keep going and prefer the clean route.
        let world = TestWorld::corridor().with_wall();
        let p = world.perception();
        let candidates = waypoints(&[
            (0, Vec3::new(8.0, 0.0, 0.0)), // behind the wall → ValidButInLos
            (1, Vec3::new(2.0, 0.0, 0.0)), // before the wall → Valid
        ]);
        let result =
            p.find_node(SearchMode::Farthest, Vec3::ZERO, &candidates, &[], true, true, 0.0);
        assert_eq!(result.status, PathStatus::Valid);
        assert_eq!(result.node.map(|w| w.id), Some(WaypointId(1)));
    }

    #[test]
    fn empty_candidates_yield_invalid() {
        let world = TestWorld::corridor();
        let p = world.perception();
        let result = p.find_node(SearchMode::Closest, Vec3::ZERO, &[], &[], false, true, 0.0);
        assert!(result.node.is_none());
        assert_eq!(result.status, PathStatus::Invalid);
    }
}

// ── Target acquisition ────────────────────────────────────────────────────────

#[cfg(test)]
mod target_tests {
    use super::*;

    #[test]
    fn picks_nearest_visible_without_incumbent() {
        let mut world = TestWorld::corridor();
        let far = world.roster.push(Vec3::new(15.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let near = world.roster.push(Vec3::new(6.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let p = world.perception();

        let chosen = p.closest_visible_target(eye_at_origin(), wide_cone(40.0), None, 2.0, 0.0);
        assert_eq!(chosen, Some(near));
        assert_ne!(chosen, Some(far));
    }

    #[test]
    fn hysteresis_retains_incumbent_within_buffer() {
        let mut world = TestWorld::corridor();
        let held = world.roster.push(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let _rival = world.roster.push(Vec3::new(9.5, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let p = world.perception();

        // Rival is 0.5 closer; buffer is 2.0 → incumbent retained, stably.
        let mut current = Some(held);
        for _ in 0..5 {
            current =
                p.closest_visible_target(eye_at_origin(), wide_cone(40.0), current, 2.0, 0.0);
            assert_eq!(current, Some(held), "target must not flap with an unchanged world");
        }
    }

    #[test]
    fn challenger_beyond_buffer_takes_over() {
        let mut world = TestWorld::corridor();
        let held = world.roster.push(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let rival = world.roster.push(Vec3::new(4.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let p = world.perception();

        let chosen =
            p.closest_visible_target(eye_at_origin(), wide_cone(40.0), Some(held), 2.0, 0.0);
        assert_eq!(chosen, Some(rival), "6-unit improvement clears a 2-unit buffer");
    }

    #[test]
    fn dead_incumbent_is_replaced_immediately() {
        let mut world = TestWorld::corridor();
        let held = world.roster.push(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let other = world.roster.push(Vec3::new(9.9, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        world.roster.alive[held.index()] = false;
        let p = world.perception();

        // Incumbent fails revalidation → no hysteresis protection.
        let chosen =
            p.closest_visible_target(eye_at_origin(), wide_cone(40.0), Some(held), 5.0, 0.0);
        assert_eq!(chosen, Some(other));
    }

    #[test]
    fn hidden_candidates_are_never_selected() {
        let mut world = TestWorld::corridor().with_wall();
        // Both targets sit behind the wall (x > 4.8).
        world.roster.push(Vec3::new(8.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        world.roster.push(Vec3::new(10.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let p = world.perception();

        let chosen = p.closest_visible_target(eye_at_origin(), wide_cone(40.0), None, 2.0, 0.0);
        assert_eq!(chosen, None);
    }

    #[test]
    fn closest_observer_ranks_and_ignores() {
        let mut world = TestWorld::corridor();
        let near = world.roster.push(Vec3::new(6.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let far = world.roster.push(Vec3::new(12.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let p = world.perception();

        let point = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(p.closest_observer_of(point, None), Some(near));
        assert_eq!(p.closest_observer_of(point, Some(near)), Some(far));
    }

    #[test]
    fn all_observers_respects_facing() {
        let mut world = TestWorld::corridor();
        let looking = world.roster.push(Vec3::new(6.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let away = world.roster.push(Vec3::new(8.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0));
        let p = world.perception();

        let seen = p.all_observers_of(Vec3::new(0.0, 1.0, 0.0), None, 160.0, 60.0);
        assert!(seen.contains(&looking));
        assert!(!seen.contains(&away), "an observer facing away cannot see the point");
    }

    #[test]
    fn empty_roster_yields_no_target() {
        let world = TestWorld::corridor();
        let p = world.perception();
        assert_eq!(
            p.closest_visible_target(eye_at_origin(), wide_cone(40.0), None, 1.0, 0.0),
            None
        );
        assert_eq!(p.closest_observer_of(Vec3::ZERO, None), None);
        assert!(p.all_observers_of(Vec3::ZERO, None, 160.0, 60.0).is_empty());
    }
}
