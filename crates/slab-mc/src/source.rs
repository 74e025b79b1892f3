// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Fission Source Interface
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Common interface over fission-source representations.

use ndarray::Array1;
use slab_geometry::Mesh;
use slab_types::error::SlabResult;

use crate::particle::Particle;

/// A fission source the power iteration can read histories out of and
/// score new fission sites into.
///
/// The iteration keeps two sources alive: the current one feeds
/// histories, the next one accumulates the sites those histories produce,
/// and the two swap roles between cycles.
pub trait FissionSource {
    /// One-time work before a cycle starts sampling (e.g. rebuilding a
    /// CDF). Sampling between `prepare` calls must not change the
    /// distribution being drawn from.
    fn prepare(&mut self) {}

    /// Initialize `particle` with a position, a unit-magnitude signed
    /// weight and a fresh isotropic direction drawn from this source.
    ///
    /// Fails with `SlabError::EmptySource` when the source holds no
    /// weight.
    fn sample(&mut self, particle: &mut Particle) -> SlabResult<()>;

    /// Record `count` fission sites at the particle's position, carrying
    /// the sign of the particle's weight. `count` is a whole number of
    /// sites; fractional expectation is resolved by the caller's
    /// stochastic rounding before it gets here.
    fn score(&mut self, particle: &Particle, count: f64) -> SlabResult<()>;

    /// Total absolute weight held by the source.
    fn magnitude(&self) -> f64;

    /// Discard all content, keeping allocations for reuse.
    fn reset(&mut self);

    /// Signed per-zone weight histogram of the source on `mesh`.
    fn shape(&self, mesh: &Mesh) -> SlabResult<Array1<f64>>;

    /// An empty source of the same kind, on an independent RNG substream,
    /// suitable as the next-cycle accumulator.
    fn empty_like(&self) -> Self
    where
        Self: Sized;
}
