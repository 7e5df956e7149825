//! Navigation mesh representation and builder.
//!
//! # Data layout
//!
//! The walkable surface is approximated as a graph of sampled surface points
//! in **Compressed Sparse Row (CSR)** format for outgoing links.  Given a
//! `NodeId n`, its outgoing links occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length`) are sorted by
//! source node and indexed by `EdgeId`, so iterating a node's links is a
//! contiguous memory scan — ideal for the path search inner loop.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps world positions to the nearest `NodeId`.
//! Used by `project` to snap arbitrary world points (creature positions,
//! search targets) onto the walkable surface.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use prowl_core::{EdgeId, NodeId, Vec3};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 3-D point with the associated
/// `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f32; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f32; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in world space.
    fn distance_2(&self, point: &[f32; 3]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── NavMesh ───────────────────────────────────────────────────────────────────

/// Walkable-surface graph in CSR format plus a spatial index for projection.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`NavMeshBuilder`].
pub struct NavMesh {
    // ── Node data ─────────────────────────────────────────────────────────
    /// World position of each mesh node.  Indexed by `NodeId`.
    pub node_pos: Vec<Vec3>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing links of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each link.  Redundant with CSR but required for
    /// efficient path reconstruction (trace `prev_edge` back to source).
    pub edge_from: Vec<NodeId>,

    /// Destination node of each link.
    pub edge_to: Vec<NodeId>,

    /// Length of each link in world units.  Used as search cost.
    pub edge_length: Vec<f32>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl NavMesh {
    /// Construct an empty mesh with no nodes or links.
    ///
    /// Useful as a placeholder when no navigation is needed.  Any path
    /// request against an empty mesh fails with [`NavError::NoPath`] and any
    /// projection returns `None`.
    ///
    /// [`NavError::NoPath`]: crate::NavError::NoPath
    pub fn empty() -> Self {
        NavMeshBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing links from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest mesh node to `point`, regardless of distance.
    ///
    /// Returns `None` only if the mesh has no nodes.
    pub fn nearest_node(&self, point: Vec3) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[point.x, point.y, point.z])
            .map(|e| e.id)
    }

    /// Project `point` onto the walkable surface: the nearest mesh node
    /// within `search_radius`, or `None` if nothing is that close.
    ///
    /// Returns the node and its snapped position.
    pub fn project(&self, point: Vec3, search_radius: f32) -> Option<(NodeId, Vec3)> {
        let entry = self
            .spatial_idx
            .nearest_neighbor(&[point.x, point.y, point.z])?;
        let snapped = self.node_pos[entry.id.index()];
        if snapped.distance_sq(point) <= search_radius * search_radius {
            Some((entry.id, snapped))
        } else {
            None
        }
    }

    /// `true` if `point` lies within `search_radius` of the walkable surface.
    #[inline]
    pub fn is_on_mesh(&self, point: Vec3, search_radius: f32) -> bool {
        self.project(point, search_radius).is_some()
    }
}

// ── NavMeshBuilder ────────────────────────────────────────────────────────────

/// Construct a [`NavMesh`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed links in any order.  `build()`
/// sorts links by source node, constructs the CSR arrays, and bulk-loads the
/// R-tree.
///
/// # Example
///
/// ```
/// use prowl_core::Vec3;
/// use prowl_nav::NavMeshBuilder;
///
/// let mut b = NavMeshBuilder::new();
/// let a = b.add_node(Vec3::new(0.0, 0.0, 0.0));
/// let c = b.add_node(Vec3::new(4.0, 0.0, 0.0));
/// b.add_link(a, c); // bidirectional
/// let mesh = b.build();
/// assert_eq!(mesh.node_count(), 2);
/// assert_eq!(mesh.edge_count(), 2);
/// ```
pub struct NavMeshBuilder {
    nodes: Vec<Vec3>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    length: f32,
}

impl NavMeshBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and links to reduce
    /// reallocations when bulk-loading a baked surface.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a mesh node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: Vec3) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** link from `from` to `to`.  Cost is the straight
    /// distance between the node positions.
    pub fn add_directed_link(&mut self, from: NodeId, to: NodeId) {
        let length = self.nodes[from.index()].distance(self.nodes[to.index()]);
        self.raw_edges.push(RawEdge { from, to, length });
    }

    /// Convenience: add links in **both directions** (the common case for
    /// walkable connections).
    pub fn add_link(&mut self, a: NodeId, b: NodeId) {
        self.add_directed_link(a, b);
        self.add_directed_link(b, a);
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Vec3 {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`NavMesh`].
    ///
    /// Time complexity: O(E log E) for the link sort + O(N log N) for the
    /// R-tree bulk load, where N = nodes, E = links.
    pub fn build(self) -> NavMesh {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Sort links by source node for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| e.from.0);

        let edge_from:   Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:     Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length: Vec<f32>    = raw.iter().map(|e| e.length).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: [pos.x, pos.y, pos.z],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        NavMesh {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length,
            spatial_idx,
        }
    }
}

impl Default for NavMeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}
