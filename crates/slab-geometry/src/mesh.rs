// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Mesh
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1-D Cartesian mesh.
//!
//! Zones, nodes and corners live in arenas owned by the mesh and refer to
//! each other by stable index. Connectivity is set once at construction and
//! never mutated, which is what makes `&Mesh` safe to share across every
//! particle in a cycle.

use ndarray::Array1;
use slab_types::error::{SlabError, SlabResult};

/// Stable index of a zone in the mesh arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneId(pub(crate) usize);

/// Stable index of a node in the mesh arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Stable index of a corner in the mesh arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CornerId(pub(crate) usize);

impl ZoneId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl CornerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Interval of the slab between two nodes.
#[derive(Debug, Clone, Copy)]
pub struct Zone {
    pub id: ZoneId,
    pub length: f64,
    pub area: f64,
    pub left_node: NodeId,
    pub right_node: NodeId,
    pub left_corner: CornerId,
    pub right_corner: CornerId,
}

impl Zone {
    pub fn volume(&self) -> f64 {
        self.length * self.area
    }
}

/// Zone endpoint. A node missing a left zone sits on the left domain
/// boundary; missing a right zone, on the right domain boundary.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub left_zone: Option<ZoneId>,
    pub right_zone: Option<ZoneId>,
}

impl Node {
    pub fn on_left_boundary(&self) -> bool {
        self.left_zone.is_none()
    }

    pub fn on_right_boundary(&self) -> bool {
        self.right_zone.is_none()
    }
}

/// Field-centering helper tying one end of a zone to its node.
#[derive(Debug, Clone, Copy)]
pub struct Corner {
    pub id: CornerId,
    pub zone: ZoneId,
    pub node: NodeId,
}

/// Boundary treatment at a slab edge: a vacuum side leaks, a reflecting
/// side flips the x direction cosine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    #[default]
    Vacuum,
    Reflecting,
}

/// Immutable 1-D slab mesh: `num_zones` zones partitioning `[0, length)`
/// contiguously and monotonically, `num_zones + 1` nodes, two corners per
/// zone.
#[derive(Debug, Clone)]
pub struct Mesh {
    zones: Vec<Zone>,
    nodes: Vec<Node>,
    corners: Vec<Corner>,
    length: f64,
    area: f64,
    left_boundary: Boundary,
    right_boundary: Boundary,
}

impl Mesh {
    /// Uniform mesh of `num_zones` equal zones over `[0, length)`.
    ///
    /// Node positions are computed as `i * length / n`, not by
    /// accumulating widths: summing `length / n` ten times does not
    /// reproduce `length` in floating point, and the rightmost node must
    /// sit at exactly the requested length for `locate(length)` to stay
    /// in domain.
    pub fn uniform(length: f64, area: f64, num_zones: usize) -> SlabResult<Self> {
        if !length.is_finite() || length <= 0.0 {
            return Err(SlabError::Config(format!(
                "mesh length must be finite and > 0, got {length}"
            )));
        }
        if num_zones == 0 {
            return Err(SlabError::Config("mesh must have at least one zone".to_string()));
        }
        let n = num_zones as f64;
        // Grouped as i/n so the last node evaluates to length * 1.0.
        let positions: Vec<f64> = (0..=num_zones)
            .map(|i| length * (i as f64 / n))
            .collect();
        Self::from_node_positions(positions, area)
    }

    /// Mesh with explicit per-zone widths starting at x = 0.
    pub fn from_zone_widths(widths: &[f64], area: f64) -> SlabResult<Self> {
        if widths.is_empty() {
            return Err(SlabError::Config("mesh must have at least one zone".to_string()));
        }
        for (i, w) in widths.iter().enumerate() {
            if !w.is_finite() || *w <= 0.0 {
                return Err(SlabError::Config(format!(
                    "zone {i} width must be finite and > 0, got {w}"
                )));
            }
        }
        let mut positions = Vec::with_capacity(widths.len() + 1);
        let mut x = 0.0;
        positions.push(x);
        for w in widths {
            x += w;
            positions.push(x);
        }
        Self::from_node_positions(positions, area)
    }

    /// Build the arenas from strictly increasing node positions starting
    /// at 0. The slab length is the last node position.
    fn from_node_positions(positions: Vec<f64>, area: f64) -> SlabResult<Self> {
        if !area.is_finite() || area <= 0.0 {
            return Err(SlabError::Config(format!(
                "mesh area must be finite and > 0, got {area}"
            )));
        }
        for (i, pair) in positions.windows(2).enumerate() {
            if !pair[1].is_finite() || pair[1] <= pair[0] {
                return Err(SlabError::Config(format!(
                    "zone {i} must have a positive width, got nodes at {} and {}",
                    pair[0], pair[1]
                )));
            }
        }

        let n = positions.len() - 1;
        let mut zones = Vec::with_capacity(n);
        let mut nodes = Vec::with_capacity(n + 1);
        let mut corners = Vec::with_capacity(2 * n);

        nodes.push(Node {
            id: NodeId(0),
            x: positions[0],
            left_zone: None,
            right_zone: Some(ZoneId(0)),
        });
        for i in 0..n {
            nodes.push(Node {
                id: NodeId(i + 1),
                x: positions[i + 1],
                left_zone: Some(ZoneId(i)),
                right_zone: if i + 1 < n { Some(ZoneId(i + 1)) } else { None },
            });
            corners.push(Corner {
                id: CornerId(2 * i),
                zone: ZoneId(i),
                node: NodeId(i),
            });
            corners.push(Corner {
                id: CornerId(2 * i + 1),
                zone: ZoneId(i),
                node: NodeId(i + 1),
            });
            zones.push(Zone {
                id: ZoneId(i),
                length: positions[i + 1] - positions[i],
                area,
                left_node: NodeId(i),
                right_node: NodeId(i + 1),
                left_corner: CornerId(2 * i),
                right_corner: CornerId(2 * i + 1),
            });
        }

        Ok(Mesh {
            zones,
            nodes,
            corners,
            length: positions[n],
            area,
            left_boundary: Boundary::Vacuum,
            right_boundary: Boundary::Vacuum,
        })
    }

    /// Set the boundary treatment of both slab edges.
    pub fn with_boundaries(mut self, left: Boundary, right: Boundary) -> Self {
        self.left_boundary = left;
        self.right_boundary = right;
        self
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn volume(&self) -> f64 {
        self.length * self.area
    }

    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_corners(&self) -> usize {
        self.corners.len()
    }

    pub fn left_boundary(&self) -> Boundary {
        self.left_boundary
    }

    pub fn right_boundary(&self) -> Boundary {
        self.right_boundary
    }

    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.0]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn corner(&self, id: CornerId) -> &Corner {
        &self.corners[id.0]
    }

    pub fn zones(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    /// Bounds-checked `ZoneId` from a raw zone index.
    pub fn zone_id(&self, index: usize) -> Option<ZoneId> {
        (index < self.zones.len()).then_some(ZoneId(index))
    }

    /// `[x_left, x_right]` interval spanned by a zone.
    pub fn zone_interval(&self, id: ZoneId) -> (f64, f64) {
        let zone = &self.zones[id.0];
        (self.nodes[zone.left_node.0].x, self.nodes[zone.right_node.0].x)
    }

    /// Zone containing position `x`.
    ///
    /// Binary search over the monotone node positions: this runs once per
    /// collision per particle and dominates inner-loop cost on fine meshes.
    /// Tie-break: an exact interior boundary resolves to the zone on its
    /// left; `x = 0` resolves to zone 0 and `x = length` to the last zone.
    pub fn locate(&self, x: f64) -> SlabResult<ZoneId> {
        if !(0.0..=self.length).contains(&x) {
            return Err(SlabError::OutOfDomain {
                x,
                length: self.length,
            });
        }
        let idx = self
            .zones
            .partition_point(|z| self.nodes[z.right_node.0].x < x);
        Ok(ZoneId(idx.min(self.zones.len() - 1)))
    }

    /// Distance from `x` to the bounding node of its zone in direction `mu`
    /// (left node for `mu < 0`, right node for `mu > 0`).
    pub fn distance_to_boundary(&self, x: f64, mu: f64) -> SlabResult<f64> {
        if mu.abs() <= f64::EPSILON {
            return Err(SlabError::DegenerateDirection { mu });
        }
        let zone = self.locate(x)?;
        let (left, right) = self.zone_interval(zone);
        if mu < 0.0 {
            Ok(x - left)
        } else {
            Ok(right - x)
        }
    }

    /// Zone to the left of a node; `NoNeighbor` marks a query against a
    /// structurally nonexistent neighbor, distinct from physical leakage.
    pub fn left_zone_of(&self, id: NodeId) -> SlabResult<ZoneId> {
        self.nodes[id.0].left_zone.ok_or(SlabError::NoNeighbor {
            node: id.0,
            side: "left",
        })
    }

    /// Zone to the right of a node.
    pub fn right_zone_of(&self, id: NodeId) -> SlabResult<ZoneId> {
        self.nodes[id.0].right_zone.ok_or(SlabError::NoNeighbor {
            node: id.0,
            side: "right",
        })
    }

    /// Node positions, leftmost to rightmost.
    pub fn node_positions(&self) -> Array1<f64> {
        Array1::from_iter(self.nodes.iter().map(|n| n.x))
    }

    /// Zone midpoints.
    pub fn zone_centers(&self) -> Array1<f64> {
        Array1::from_iter(self.zones.iter().map(|z| {
            let (left, right) = (self.nodes[z.left_node.0].x, self.nodes[z.right_node.0].x);
            0.5 * (left + right)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_mesh_partitions_domain() {
        let mesh = Mesh::uniform(10.0, 2.0, 5).unwrap();
        assert_eq!(mesh.num_zones(), 5);
        assert_eq!(mesh.num_nodes(), 6);
        assert_eq!(mesh.num_corners(), 10);
        assert!((mesh.length() - 10.0).abs() < 1e-12);
        assert!((mesh.volume() - 20.0).abs() < 1e-12);
        let mut prev_right = 0.0;
        for zone in mesh.zones() {
            let (left, right) = mesh.zone_interval(zone.id);
            assert!((left - prev_right).abs() < 1e-12, "zones must be contiguous");
            assert!(right > left);
            prev_right = right;
        }
        assert!((prev_right - mesh.length()).abs() < 1e-12);
    }

    #[test]
    fn test_locate_uniform_index_formula() {
        // locate(x) == floor(x * Z / L) for interior (non-boundary) x.
        let (z, l) = (10usize, 1.0);
        let mesh = Mesh::uniform(l, 1.0, z).unwrap();
        for i in 0..1000 {
            let x = (i as f64 + 0.5) / 1000.0;
            let expected = ((x * z as f64 / l) as usize).min(z - 1);
            assert_eq!(mesh.locate(x).unwrap().index(), expected, "x = {x}");
        }
    }

    #[test]
    fn test_uniform_mesh_hits_requested_length_exactly() {
        // Accumulating length/n widths drifts in the last ulp; the right
        // edge must be exact or locate(length) falls out of domain.
        for zones in [3usize, 7, 10, 100] {
            for length in [1.0, 0.1, 9.0] {
                let mesh = Mesh::uniform(length, 1.0, zones).unwrap();
                assert_eq!(mesh.length(), length, "zones = {zones}, length = {length}");
                let id = mesh.locate(length).unwrap();
                assert_eq!(id.index(), zones - 1);
                let (_, right) = mesh.zone_interval(id);
                assert_eq!(right, length);
            }
        }
    }

    #[test]
    fn test_locate_boundary_tie_break() {
        let mesh = Mesh::uniform(1.0, 1.0, 10).unwrap();
        // Interior node positions belong to the zone on the left.
        assert_eq!(mesh.locate(0.3).unwrap().index(), 2);
        // Domain edges resolve to the first and last zone.
        assert_eq!(mesh.locate(0.0).unwrap().index(), 0);
        assert_eq!(mesh.locate(1.0).unwrap().index(), 9);
    }

    #[test]
    fn test_locate_out_of_domain() {
        let mesh = Mesh::uniform(1.0, 1.0, 4).unwrap();
        assert!(matches!(
            mesh.locate(-1e-9),
            Err(SlabError::OutOfDomain { .. })
        ));
        assert!(matches!(
            mesh.locate(1.0 + 1e-9),
            Err(SlabError::OutOfDomain { .. })
        ));
    }

    #[test]
    fn test_distance_to_boundary() {
        let mesh = Mesh::from_zone_widths(&[1.0, 2.0, 1.0], 1.0).unwrap();
        assert!((mesh.distance_to_boundary(1.5, 1.0).unwrap() - 1.5).abs() < 1e-12);
        assert!((mesh.distance_to_boundary(1.5, -0.3).unwrap() - 0.5).abs() < 1e-12);
        assert!(matches!(
            mesh.distance_to_boundary(1.5, 0.0),
            Err(SlabError::DegenerateDirection { .. })
        ));
    }

    #[test]
    fn test_boundary_nodes_have_no_outer_neighbor() {
        let mesh = Mesh::uniform(1.0, 1.0, 3).unwrap();
        let first = NodeId(0);
        let last = NodeId(3);
        assert!(mesh.node(first).on_left_boundary());
        assert!(mesh.node(last).on_right_boundary());
        assert!(matches!(
            mesh.left_zone_of(first),
            Err(SlabError::NoNeighbor { side: "left", .. })
        ));
        assert!(matches!(
            mesh.right_zone_of(last),
            Err(SlabError::NoNeighbor { side: "right", .. })
        ));
        assert_eq!(mesh.right_zone_of(first).unwrap().index(), 0);
        assert_eq!(mesh.left_zone_of(last).unwrap().index(), 2);
    }

    #[test]
    fn test_corner_back_references() {
        let mesh = Mesh::uniform(1.0, 1.0, 2).unwrap();
        for zone in mesh.zones() {
            let lc = mesh.corner(zone.left_corner);
            let rc = mesh.corner(zone.right_corner);
            assert_eq!(lc.zone, zone.id);
            assert_eq!(rc.zone, zone.id);
            assert_eq!(lc.node, zone.left_node);
            assert_eq!(rc.node, zone.right_node);
        }
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        assert!(Mesh::uniform(0.0, 1.0, 4).is_err());
        assert!(Mesh::uniform(-1.0, 1.0, 4).is_err());
        assert!(Mesh::uniform(1.0, 0.0, 4).is_err());
        assert!(Mesh::uniform(1.0, 1.0, 0).is_err());
        assert!(Mesh::from_zone_widths(&[], 1.0).is_err());
        assert!(Mesh::from_zone_widths(&[1.0, -2.0], 1.0).is_err());
        assert!(Mesh::from_zone_widths(&[1.0, f64::NAN], 1.0).is_err());
    }

    #[test]
    fn test_default_boundaries_are_vacuum() {
        let mesh = Mesh::uniform(1.0, 1.0, 1).unwrap();
        assert_eq!(mesh.left_boundary(), Boundary::Vacuum);
        assert_eq!(mesh.right_boundary(), Boundary::Vacuum);
        let mesh = mesh.with_boundaries(Boundary::Reflecting, Boundary::Reflecting);
        assert_eq!(mesh.left_boundary(), Boundary::Reflecting);
    }

    #[test]
    fn test_zone_centers_and_node_positions() {
        let mesh = Mesh::from_zone_widths(&[1.0, 3.0], 1.0).unwrap();
        let nodes = mesh.node_positions();
        let centers = mesh.zone_centers();
        assert_eq!(nodes.len(), 3);
        assert!((nodes[1] - 1.0).abs() < 1e-12);
        assert!((nodes[2] - 4.0).abs() < 1e-12);
        assert!((centers[0] - 0.5).abs() < 1e-12);
        assert!((centers[1] - 2.5).abs() < 1e-12);
    }
}
