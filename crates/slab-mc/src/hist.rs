// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Histogram Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Histogram fission source: per-zone accumulated weight on a mesh.
//!
//! Where the bank keeps every fission site, the histogram collapses them
//! into one signed weight per zone. Memory stays fixed at the zone count
//! no matter how large the population grows, at the cost of losing
//! sub-zone position information: sampled particles land uniformly within
//! their zone.

use ndarray::Array1;
use slab_geometry::Mesh;
use slab_types::error::{SlabError, SlabResult};

use crate::particle::Particle;
use crate::rng::RngStream;
use crate::source::FissionSource;
use crate::stats;

pub struct HistSource<'m> {
    mesh: &'m Mesh,
    weights: Array1<f64>,
    cdf: Vec<f64>,
    rng: RngStream,
}

impl<'m> HistSource<'m> {
    /// Empty histogram over the zones of `mesh`.
    pub fn new(mesh: &'m Mesh, seed: u64, stream: u64) -> Self {
        HistSource {
            mesh,
            weights: Array1::zeros(mesh.num_zones()),
            cdf: vec![0.0; mesh.num_zones()],
            rng: RngStream::new(seed, stream),
        }
    }

    /// Histogram from explicit per-zone weights.
    pub fn from_weights(
        mesh: &'m Mesh,
        weights: Array1<f64>,
        seed: u64,
        stream: u64,
    ) -> SlabResult<Self> {
        if weights.len() != mesh.num_zones() {
            return Err(SlabError::Config(format!(
                "histogram length {} does not match zone count {}",
                weights.len(),
                mesh.num_zones()
            )));
        }
        let mut source = HistSource::new(mesh, seed, stream);
        source.weights = weights;
        Ok(source)
    }

    /// Rebuild the sampling CDF from the current weights. Bins enter by
    /// absolute weight; an all-zero histogram yields an all-zero CDF,
    /// which `sample` reports as an empty source.
    pub fn make_cdf(&mut self) {
        let total: f64 = self.weights.iter().map(|w| w.abs()).sum();
        let mut running = 0.0;
        for (bin, weight) in self.cdf.iter_mut().zip(self.weights.iter()) {
            if total > 0.0 {
                running += weight.abs() / total;
            }
            *bin = running;
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn cdf(&self) -> &[f64] {
        &self.cdf
    }

    pub fn entropy(&self) -> f64 {
        stats::shannon_entropy(&self.weights)
    }
}

impl FissionSource for HistSource<'_> {
    fn prepare(&mut self) {
        self.make_cdf();
    }

    /// Invert the CDF: pick the first bin whose cumulative probability
    /// reaches the variate, then place the particle uniformly within that
    /// zone with weight carrying the bin's sign.
    fn sample(&mut self, particle: &mut Particle) -> SlabResult<()> {
        match self.cdf.last() {
            Some(&total) if total > 0.0 => {}
            _ => return Err(SlabError::EmptySource),
        }
        let xi = self.rng.uniform();
        let idx = self.cdf.partition_point(|&c| c < xi).min(self.cdf.len() - 1);
        let id = self
            .mesh
            .zone_id(idx)
            .ok_or_else(|| SlabError::Config(format!("zone index {idx} out of range")))?;
        let (left, right) = self.mesh.zone_interval(id);
        let x = left + self.rng.uniform() * (right - left);
        particle.set_position(x, 0.0, 0.0);
        particle.set_weight(if self.weights[idx] < 0.0 { -1.0 } else { 1.0 });
        particle.set_direction_isotropic();
        Ok(())
    }

    fn score(&mut self, particle: &Particle, count: f64) -> SlabResult<()> {
        let id = self.mesh.locate(particle.x())?;
        let signed = if particle.weight() < 0.0 { -count } else { count };
        self.weights[id.index()] += signed;
        Ok(())
    }

    fn magnitude(&self) -> f64 {
        self.weights.iter().map(|w| w.abs()).sum()
    }

    fn reset(&mut self) {
        self.weights.fill(0.0);
        self.cdf.fill(0.0);
    }

    /// Rebin the histogram onto `mesh`: each bin's weight lands in the
    /// target zone containing the bin's center. On the histogram's own
    /// mesh this is the identity.
    fn shape(&self, mesh: &Mesh) -> SlabResult<Array1<f64>> {
        if std::ptr::eq(self.mesh, mesh) {
            return Ok(self.weights.clone());
        }
        let mut shape = Array1::zeros(mesh.num_zones());
        let centers = self.mesh.zone_centers();
        for (center, weight) in centers.iter().zip(self.weights.iter()) {
            if *weight != 0.0 {
                let id = mesh.locate(*center)?;
                shape[id.index()] += *weight;
            }
        }
        Ok(shape)
    }

    fn empty_like(&self) -> Self {
        HistSource::new(self.mesh, self.rng.seed(), self.rng.stream() + 1)
    }
}
