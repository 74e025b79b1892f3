// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Slab Geometry
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! 1-D Cartesian mesh and zone-centered fields.
//!
//! The mesh is built once, validated at construction, and read-only
//! afterwards, so it can be shared by reference across all particles and
//! sources without synchronization.

pub mod field;
pub mod mesh;

pub use field::Field;
pub use mesh::{Boundary, Corner, CornerId, Mesh, Node, NodeId, Zone, ZoneId};
