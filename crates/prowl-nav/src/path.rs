//! Pathfinding trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Perception calls pathfinding via the [`PathEngine`] trait, so an embedding
//! engine can supply its own solver (A*, hierarchical, baked corridors)
//! without touching the behavioral core.  The default [`DijkstraEngine`] is
//! sufficient for standalone simulation and tests.
//!
//! # Completeness
//!
//! A [`NavPath`] always carries corner points and a `complete` flag.  When
//! the destination is unreachable the engine still returns the best-effort
//! path to the settled node nearest the destination with `complete = false` —
//! callers decide whether a partial route is usable.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use prowl_core::{EdgeId, NodeId, Vec3};

use crate::NavError;
use crate::mesh::NavMesh;

// ── NavPath ───────────────────────────────────────────────────────────────────

/// The result of a path query: ordered corner positions from source to the
/// reached end node, plus whether the destination was actually reached.
#[derive(Debug, Clone)]
pub struct NavPath {
    /// Corner positions to traverse in order.  Always contains at least the
    /// start node's position.
    pub corners: Vec<Vec3>,
    /// `true` if the last corner is the requested destination node.
    pub complete: bool,
    /// Total length along the corners in world units.
    pub length: f32,
}

impl NavPath {
    /// The final corner, i.e. where following this path ends up.
    ///
    /// Returns `None` for a corner-less path (never produced by the engines
    /// in this crate, but external engines may).
    pub fn end(&self) -> Option<Vec3> {
        self.corners.last().copied()
    }

    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.corners.len() <= 1
    }
}

// ── PathEngine trait ──────────────────────────────────────────────────────────

/// Pluggable pathfinding engine.
///
/// Implementations must be `Send + Sync`: the engine is shared read-only by
/// every agent on the update thread, and nothing stops an embedder keeping it
/// alive across threads between ticks.
pub trait PathEngine: Send + Sync {
    /// Compute a path between two mesh nodes.
    ///
    /// `from == to` is a trivial single-corner path, not an error.
    /// Returns [`NavError::NoPath`] only when no progress can be made at all
    /// (empty mesh or isolated start node); an unreachable destination yields
    /// a partial path instead.
    fn find_path(&self, mesh: &NavMesh, from: NodeId, to: NodeId) -> Result<NavPath, NavError>;
}

// ── DijkstraEngine ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR mesh graph, with partial-path
/// reconstruction toward the closest settled node when the destination is
/// unreachable.
pub struct DijkstraEngine;

impl PathEngine for DijkstraEngine {
    fn find_path(&self, mesh: &NavMesh, from: NodeId, to: NodeId) -> Result<NavPath, NavError> {
        dijkstra(mesh, from, to)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Costs are fixed-point millimetres (u32) internally so heap ordering is
/// total and deterministic.
#[inline]
fn edge_cost_mm(mesh: &NavMesh, edge: EdgeId) -> u32 {
    (mesh.edge_length[edge.index()] * 1000.0) as u32
}

fn dijkstra(mesh: &NavMesh, from: NodeId, to: NodeId) -> Result<NavPath, NavError> {
    if mesh.is_empty() || from.index() >= mesh.node_count() || to.index() >= mesh.node_count() {
        return Err(NavError::NoPath { from, to });
    }
    if from == to {
        return Ok(NavPath {
            corners: vec![mesh.node_pos[from.index()]],
            complete: true,
            length: 0.0,
        });
    }

    let n = mesh.node_count();
    // dist[v] = best known cost (mm) to reach v.
    let mut dist = vec![u32::MAX; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0;

    // Min-heap: (cost, node). Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId ensures deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(u32, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((0, from)));

    while let Some(Reverse((cost, node))) = heap.pop() {
        if node == to {
            return Ok(reconstruct(mesh, &prev_edge, from, to, true));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in mesh.out_edges(node) {
            let neighbor = mesh.edge_to[edge.index()];
            let new_cost = cost.saturating_add(edge_cost_mm(mesh, edge));

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((new_cost, neighbor)));
            }
        }
    }

    // Destination unreachable: fall back to the settled node spatially
    // nearest the destination and mark the path incomplete.
    let goal_pos = mesh.node_pos[to.index()];
    let nearest_settled = (0..n)
        .filter(|&i| dist[i] != u32::MAX)
        .map(|i| NodeId(i as u32))
        .min_by(|&a, &b| {
            let da = mesh.node_pos[a.index()].distance_sq(goal_pos);
            let db = mesh.node_pos[b.index()].distance_sq(goal_pos);
            da.partial_cmp(&db)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

    match nearest_settled {
        Some(end) => Ok(reconstruct(mesh, &prev_edge, from, end, false)),
        None => Err(NavError::NoPath { from, to }),
    }
}

fn reconstruct(
    mesh: &NavMesh,
    prev_edge: &[EdgeId],
    from: NodeId,
    end: NodeId,
    complete: bool,
) -> NavPath {
    let mut nodes = Vec::new();
    let mut cur = end;
    loop {
        nodes.push(cur);
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = mesh.edge_from[e.index()];
    }
    debug_assert_eq!(*nodes.last().unwrap_or(&from), from);
    nodes.reverse();

    let corners: Vec<Vec3> = nodes.iter().map(|n| mesh.node_pos[n.index()]).collect();
    let length = corners
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .sum();

    NavPath { corners, complete, length }
}
