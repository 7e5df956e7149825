//! Unit tests for prowl-nav.

use prowl_core::{NodeId, Vec3};

use crate::{BlockerSet, DijkstraEngine, GeometryMask, Linecast, NavMesh, NavMeshBuilder, PathEngine};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Mesh with 4 nodes in a line along +x, 2 units apart: 0 ↔ 1 ↔ 2 ↔ 3.
fn line_mesh() -> NavMesh {
    let mut b = NavMeshBuilder::new();
    let n: Vec<NodeId> = (0..4)
        .map(|i| b.add_node(Vec3::new(i as f32 * 2.0, 0.0, 0.0)))
        .collect();
    b.add_link(n[0], n[1]);
    b.add_link(n[1], n[2]);
    b.add_link(n[2], n[3]);
    b.build()
}

/// Two disconnected islands: 0 ↔ 1 and 2 ↔ 3.
fn split_mesh() -> NavMesh {
    let mut b = NavMeshBuilder::new();
    let n: Vec<NodeId> = (0..4)
        .map(|i| b.add_node(Vec3::new(i as f32 * 2.0, 0.0, 0.0)))
        .collect();
    b.add_link(n[0], n[1]);
    b.add_link(n[2], n[3]);
    b.build()
}

// ── Mesh ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mesh_tests {
    use super::*;

    #[test]
    fn builder_counts() {
        let mesh = line_mesh();
        assert_eq!(mesh.node_count(), 4);
        assert_eq!(mesh.edge_count(), 6); // 3 bidirectional links
    }

    #[test]
    fn out_edges_are_contiguous() {
        let mesh = line_mesh();
        // Middle node has two neighbors.
        let neighbors: Vec<NodeId> = mesh
            .out_edges(NodeId(1))
            .map(|e| mesh.edge_to[e.index()])
            .collect();
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&NodeId(0)));
        assert!(neighbors.contains(&NodeId(2)));
    }

    #[test]
    fn project_within_radius() {
        let mesh = line_mesh();
        let (node, snapped) = mesh.project(Vec3::new(2.3, 0.5, 0.0), 1.0).unwrap();
        assert_eq!(node, NodeId(1));
        assert_eq!(snapped, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn project_outside_radius_is_none() {
        let mesh = line_mesh();
        assert!(mesh.project(Vec3::new(0.0, 50.0, 0.0), 1.0).is_none());
        assert!(!mesh.is_on_mesh(Vec3::new(0.0, 50.0, 0.0), 1.0));
    }

    #[test]
    fn empty_mesh_has_no_answers() {
        let mesh = NavMesh::empty();
        assert!(mesh.is_empty());
        assert!(mesh.nearest_node(Vec3::ZERO).is_none());
        assert!(mesh.project(Vec3::ZERO, 100.0).is_none());
    }
}

// ── Pathfinding ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod path_tests {
    use super::*;

    #[test]
    fn complete_path_end_to_end() {
        let mesh = line_mesh();
        let path = DijkstraEngine.find_path(&mesh, NodeId(0), NodeId(3)).unwrap();
        assert!(path.complete);
        assert_eq!(path.corners.len(), 4);
        assert_eq!(path.end(), Some(Vec3::new(6.0, 0.0, 0.0)));
        assert!((path.length - 6.0).abs() < 1e-4);
    }

    #[test]
    fn trivial_path_same_node() {
        let mesh = line_mesh();
        let path = DijkstraEngine.find_path(&mesh, NodeId(2), NodeId(2)).unwrap();
        assert!(path.complete);
        assert!(path.is_trivial());
        assert_eq!(path.length, 0.0);
    }

    #[test]
    fn unreachable_destination_yields_partial() {
        let mesh = split_mesh();
        let path = DijkstraEngine.find_path(&mesh, NodeId(0), NodeId(3)).unwrap();
        assert!(!path.complete, "cross-island path must be partial");
        // Best-effort end is node 1 — the reachable node nearest node 3.
        assert_eq!(path.end(), Some(Vec3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn empty_mesh_is_no_path() {
        let mesh = NavMesh::empty();
        assert!(DijkstraEngine.find_path(&mesh, NodeId(0), NodeId(1)).is_err());
    }

    #[test]
    fn shortest_route_chosen() {
        // Square with a diagonal shortcut: 0 → 3 direct vs 0 → 1 → 3.
        let mut b = NavMeshBuilder::new();
        let n0 = b.add_node(Vec3::new(0.0, 0.0, 0.0));
        let n1 = b.add_node(Vec3::new(4.0, 0.0, 0.0));
        let n2 = b.add_node(Vec3::new(0.0, 0.0, 4.0));
        let n3 = b.add_node(Vec3::new(4.0, 0.0, 4.0));
        b.add_link(n0, n1);
        b.add_link(n1, n3);
        b.add_link(n0, n2);
        b.add_link(n2, n3);
        b.add_link(n0, n3); // diagonal, length ~5.66 < 8.0 via corners
        let mesh = b.build();

        let path = DijkstraEngine.find_path(&mesh, n0, n3).unwrap();
        assert_eq!(path.corners.len(), 2, "diagonal should win");
        assert!((path.length - 32.0_f32.sqrt()).abs() < 1e-2);
    }
}

// ── Linecast ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ray_tests {
    use super::*;

    fn wall() -> BlockerSet {
        let mut set = BlockerSet::new();
        // Wall crossing the x axis at x ∈ [4, 5].
        set.add_box(
            Vec3::new(4.0, -1.0, -5.0),
            Vec3::new(5.0, 4.0, 5.0),
            GeometryMask::SIGHT,
        );
        set
    }

    #[test]
    fn segment_through_wall_is_blocked() {
        let set = wall();
        assert!(set.segment_blocked(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
            GeometryMask::SIGHT,
        ));
    }

    #[test]
    fn segment_short_of_wall_is_clear() {
        let set = wall();
        assert!(!set.segment_blocked(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(3.5, 1.0, 0.0),
            GeometryMask::SIGHT,
        ));
    }

    #[test]
    fn segment_over_wall_is_clear() {
        let set = wall();
        assert!(!set.segment_blocked(
            Vec3::new(0.0, 6.0, 0.0),
            Vec3::new(10.0, 6.0, 0.0),
            GeometryMask::SIGHT,
        ));
    }

    #[test]
    fn mask_filters_categories() {
        let set = wall();
        // The wall only blocks sight; a movement query passes through.
        assert!(!set.segment_blocked(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
            GeometryMask::MOVEMENT,
        ));
        // ALL matches every category.
        assert!(set.segment_blocked(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(10.0, 1.0, 0.0),
            GeometryMask::ALL,
        ));
    }

    #[test]
    fn degenerate_segment_inside_box_hits() {
        let set = wall();
        let p = Vec3::new(4.5, 1.0, 0.0);
        assert!(set.segment_blocked(p, p, GeometryMask::SIGHT));
    }

    #[test]
    fn empty_set_never_blocks() {
        let set = BlockerSet::new();
        assert!(set.is_empty());
        assert!(!set.segment_blocked(Vec3::ZERO, Vec3::new(100.0, 0.0, 0.0), GeometryMask::ALL));
    }
}
