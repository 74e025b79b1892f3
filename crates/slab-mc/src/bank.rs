// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Bank Source
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Site-bank fission source: an explicit list of fission sites.

use ndarray::Array1;
use slab_geometry::{Field, Mesh};
use slab_types::error::{SlabError, SlabResult};

use crate::particle::Particle;
use crate::rng::RngStream;
use crate::source::FissionSource;

/// One banked fission site. The stored weight only contributes its sign
/// and absolute value; sampled particles always restart at unit
/// magnitude.
#[derive(Debug, Clone, Copy)]
struct Site {
    x: f64,
    y: f64,
    z: f64,
    weight: f64,
}

/// Fission source holding individual sites.
///
/// The bank keeps a logical length separate from its backing storage:
/// `reset` rewinds the length to zero without dropping the allocation, so
/// steady-state cycles stop allocating once the population peaks.
#[derive(Debug, Clone)]
pub struct BankSource {
    sites: Vec<Site>,
    len: usize,
    rng: RngStream,
}

impl BankSource {
    /// Empty bank drawing its sampling randomness from `(seed, stream)`.
    pub fn new(seed: u64, stream: u64) -> Self {
        BankSource {
            sites: Vec::new(),
            len: 0,
            rng: RngStream::new(seed, stream),
        }
    }

    /// Populate a bank by sampling `count` sites from a per-zone weight
    /// field. Sites land uniformly within their zone; each carries the
    /// sign of its zone's weight at unit magnitude.
    pub fn from_field(
        field: &Field<f64>,
        mesh: &Mesh,
        seed: u64,
        stream: u64,
        count: usize,
    ) -> SlabResult<Self> {
        let total = field.abs_total();
        if total <= 0.0 {
            return Err(SlabError::EmptySource);
        }
        let mut cdf = Vec::with_capacity(field.len());
        let mut running = 0.0;
        for value in field.iter() {
            running += value.abs() / total;
            cdf.push(running);
        }
        let mut source = BankSource::new(seed, stream);
        source.sites.reserve(count);
        for _ in 0..count {
            let xi = source.rng.uniform();
            let idx = cdf.partition_point(|&c| c < xi).min(cdf.len() - 1);
            let id = mesh
                .zone_id(idx)
                .ok_or_else(|| SlabError::Config(format!("zone index {idx} out of range")))?;
            let (left, right) = mesh.zone_interval(id);
            let x = left + source.rng.uniform() * (right - left);
            let weight = if field[id] < 0.0 { -1.0 } else { 1.0 };
            source.sites.push(Site {
                x,
                y: 0.0,
                z: 0.0,
                weight,
            });
            source.len += 1;
        }
        Ok(source)
    }

    /// Number of live sites.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Backing storage size, which never shrinks across `reset`.
    pub fn capacity(&self) -> usize {
        self.sites.capacity()
    }

    /// Signed per-zone weight histogram of the live sites.
    pub fn discretized(&self, mesh: &Mesh) -> SlabResult<Array1<f64>> {
        let mut shape = Array1::zeros(mesh.num_zones());
        for site in &self.sites[..self.len] {
            let id = mesh.locate(site.x)?;
            shape[id.index()] += site.weight;
        }
        Ok(shape)
    }

    fn push_site(&mut self, site: Site) {
        if self.len < self.sites.len() {
            self.sites[self.len] = site;
        } else {
            self.sites.push(site);
        }
        self.len += 1;
    }
}

impl FissionSource for BankSource {
    /// Pick a live site uniformly (with replacement) and restart the
    /// particle there with weight ±1.
    fn sample(&mut self, particle: &mut Particle) -> SlabResult<()> {
        if self.len == 0 {
            return Err(SlabError::EmptySource);
        }
        let site = self.sites[self.rng.uniform_int(0, self.len - 1)];
        particle.set_position(site.x, site.y, site.z);
        particle.set_weight(if site.weight < 0.0 { -1.0 } else { 1.0 });
        particle.set_direction_isotropic();
        Ok(())
    }

    fn score(&mut self, particle: &Particle, count: f64) -> SlabResult<()> {
        let copies = count.max(0.0) as u64;
        let site = Site {
            x: particle.x(),
            y: particle.y(),
            z: particle.z(),
            weight: if particle.weight() < 0.0 { -1.0 } else { 1.0 },
        };
        for _ in 0..copies {
            self.push_site(site);
        }
        Ok(())
    }

    fn magnitude(&self) -> f64 {
        self.sites[..self.len].iter().map(|s| s.weight.abs()).sum()
    }

    fn reset(&mut self) {
        self.len = 0;
    }

    fn shape(&self, mesh: &Mesh) -> SlabResult<Array1<f64>> {
        self.discretized(mesh)
    }

    fn empty_like(&self) -> Self {
        BankSource {
            sites: Vec::with_capacity(self.sites.capacity()),
            len: 0,
            rng: self.rng.substream(self.rng.stream() + 1),
        }
    }
}
