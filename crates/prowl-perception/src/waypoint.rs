//! Ranked waypoint search with a seen-route fallback.
//!
//! States ask "which of these waypoints should I head for?"  The search
//! ranks candidates by distance, walks them in order, and returns the first
//! cleanly reachable one.  When the caller accepts the risk
//! (`allow_fallback_if_blocked`), a reachable-but-watched waypoint is kept
//! as a provisional answer while the scan keeps looking for a clean one —
//! the search never answers "no route" while a walkable route exists and the
//! caller opted in.

use prowl_core::{Vec3, WaypointId};

use crate::pathcheck::PathStatus;
use crate::view::Perception;

/// Near-enough distance forwarded to the per-candidate path checks.  Zero:
/// candidates inside the buffer were already filtered out.
const CANDIDATE_NEAR_ENOUGH: f32 = 0.0;

/// Whether to rank candidates closest-first or farthest-first.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SearchMode {
    /// Closest acceptable waypoint (searching, investigating).
    Closest,
    /// Farthest acceptable waypoint (retreating, scattering).
    Farthest,
}

/// A candidate navigation waypoint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Waypoint {
    pub id: WaypointId,
    pub position: Vec3,
}

impl Waypoint {
    pub fn new(id: WaypointId, position: Vec3) -> Self {
        Self { id, position }
    }
}

/// Result of a waypoint search: the chosen waypoint (if any) and how its
/// route classified.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NodeSearch {
    pub node: Option<Waypoint>,
    pub status: PathStatus,
}

impl NodeSearch {
    const NONE: NodeSearch = NodeSearch { node: None, status: PathStatus::Invalid };
}

impl Perception<'_> {
    /// Pick a waypoint from `candidates`, ranked by distance from `from`.
    ///
    /// - `ignored` waypoints and waypoints within `buffer_distance` of
    ///   `from` are skipped before ranking.
    /// - The first candidate whose route is [`PathStatus::Valid`]
    ///   short-circuits the scan.
    /// - A [`PathStatus::ValidButInLos`] candidate is remembered (first one
    ///   only) iff `allow_fallback_if_blocked`, and returned when no clean
    ///   candidate exists.
    /// - An empty or fully-filtered candidate set yields `node: None`,
    ///   `status: Invalid`.
    pub fn find_node(
        &self,
        mode: SearchMode,
        from: Vec3,
        candidates: &[Waypoint],
        ignored: &[WaypointId],
        check_line_of_sight: bool,
        allow_fallback_if_blocked: bool,
        buffer_distance: f32,
    ) -> NodeSearch {
        let buffer_sq = buffer_distance * buffer_distance;

        let mut ranked: Vec<&Waypoint> = candidates
            .iter()
            .filter(|w| !ignored.contains(&w.id))
            .filter(|w| w.position.distance_sq(from) > buffer_sq)
            .collect();

        ranked.sort_by(|a, b| {
            let da = a.position.distance_sq(from);
            let db = b.position.distance_sq(from);
            let ord = da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal);
            match mode {
                SearchMode::Closest => ord.then(a.id.cmp(&b.id)),
                SearchMode::Farthest => ord.reverse().then(a.id.cmp(&b.id)),
            }
        });

        let mut fallback: Option<&Waypoint> = None;
        for waypoint in ranked {
            match self.is_path_valid(
                from,
                waypoint.position,
                check_line_of_sight,
                CANDIDATE_NEAR_ENOUGH,
            ) {
                PathStatus::Valid => {
                    return NodeSearch { node: Some(*waypoint), status: PathStatus::Valid };
                }
                PathStatus::ValidButInLos if allow_fallback_if_blocked => {
                    // Keep the first (= best-ranked) watched candidate and
                    // keep scanning for a clean one.
                    fallback.get_or_insert(waypoint);
                }
                _ => {}
            }
        }

        match fallback {
            Some(waypoint) => NodeSearch {
                node: Some(*waypoint),
                status: PathStatus::ValidButInLos,
            },
            None => NodeSearch::NONE,
        }
    }
}
