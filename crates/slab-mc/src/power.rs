// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Power Iteration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Power-method k-eigenvalue estimation.
//!
//! Each cycle samples a batch of histories from the current fission
//! source, transports them collision to collision, and banks the fission
//! sites they create into the next-cycle source. The eigenvalue update is
//! `k <- k * M / H` where `M` is the produced source magnitude and `H`
//! the history count. Active cycles additionally accumulate eigenvalue,
//! entropy, timing and source-shape statistics.

use std::mem;
use std::time::Instant;

use ndarray::Array1;
use slab_geometry::{Field, Mesh, ZoneId};
use slab_types::config::PowerConfig;
use slab_types::error::{SlabError, SlabResult};
use slab_types::material::CrossSections;

use crate::bank::BankSource;
use crate::particle::Particle;
use crate::rng::{self, CONTROL_STREAM_BASE};
use crate::source::FissionSource;
use crate::stats;

/// Weight magnitude below which a surviving history plays Russian
/// roulette after each collision.
pub const WEIGHT_CUTOFF: f64 = 0.2;

/// Roulette kill probability; survivors are reweighted by
/// `1 / (1 - KILL_PROBABILITY)` to keep the game fair.
pub const KILL_PROBABILITY: f64 = 0.2;

/// Results of a completed power-method run.
///
/// Per-cycle series concatenate inactive cycles first, then active ones,
/// except `fom` and the eigenvalue statistics, which only exist for
/// active cycles.
#[derive(Debug, Clone)]
pub struct PowerRun {
    /// Final cycle eigenvalue estimate.
    pub k: f64,
    /// Mean of the active-cycle estimates.
    pub mean_k: f64,
    /// Population standard deviation of the active-cycle estimates.
    pub stddev_k: f64,
    pub inactive_estimates: Vec<f64>,
    pub active_estimates: Vec<f64>,
    /// Running mean of `active_estimates` after each active cycle.
    pub mean_k_series: Vec<f64>,
    /// Running standard deviation alongside `mean_k_series`.
    pub stddev_k_series: Vec<f64>,
    /// Shannon entropy of the produced source shape, every cycle.
    pub entropy: Vec<f64>,
    /// Cumulative wall-clock seconds at the end of every cycle.
    pub time: Vec<f64>,
    /// Cumulative zone-segment track count at the end of every cycle.
    /// Counts mesh segments traversed, not histories run, so it is finer
    /// grained than the cumulative-history convention other codes report
    /// under this name; do not compare the two directly.
    pub tracks: Vec<f64>,
    /// Figure of merit `1 / (stddev^2 * time)` per active cycle; zero for
    /// the first active cycle, where no spread exists yet.
    pub fom: Vec<f64>,
    /// Per-bin mean of the L2-normalized active-cycle source shapes.
    pub mean_shape: Array1<f64>,
    /// Per-bin population standard deviation of the normalized shapes.
    pub stddev_shape: Array1<f64>,
}

/// Drives cycles of source sampling, transport and eigenvalue updates.
///
/// Two source buffers alternate between feeding histories and banking
/// the fission sites they produce; the buffers swap after every cycle and
/// the drained one is reset in place.
pub struct PowerIterator<'a, S: FissionSource> {
    mesh: &'a Mesh,
    /// Mesh the produced source shape is histogrammed on for entropy and
    /// shape statistics; independent of the transport mesh resolution.
    disc_mesh: &'a Mesh,
    materials: &'a Field<CrossSections>,
    master_seed: u64,
    histories: usize,
    start_zone: ZoneId,
    k: f64,
    cycle_index: usize,
    current: S,
    next: S,
    start: Instant,
    total_tracks: u64,
    inactive_estimates: Vec<f64>,
    active_estimates: Vec<f64>,
    mean_k_series: Vec<f64>,
    stddev_k_series: Vec<f64>,
    entropy: Vec<f64>,
    time: Vec<f64>,
    tracks: Vec<f64>,
    fom: Vec<f64>,
    shape_ensemble: Vec<Array1<f64>>,
}

impl<'a, S: FissionSource> PowerIterator<'a, S> {
    pub fn new(
        mesh: &'a Mesh,
        disc_mesh: &'a Mesh,
        materials: &'a Field<CrossSections>,
        master_seed: u64,
        source: S,
        histories: usize,
    ) -> SlabResult<Self> {
        if histories == 0 {
            return Err(SlabError::Config(
                "power iteration requires at least one history per cycle".to_string(),
            ));
        }
        if materials.len() != mesh.num_zones() {
            return Err(SlabError::Config(format!(
                "expected {} materials (one per zone), got {}",
                mesh.num_zones(),
                materials.len()
            )));
        }
        for (zone, m) in materials.iter().enumerate() {
            m.validate(zone)?;
        }
        let start_zone = mesh
            .zone_id(0)
            .ok_or_else(|| SlabError::Config("mesh has no zones".to_string()))?;
        let next = source.empty_like();
        Ok(PowerIterator {
            mesh,
            disc_mesh,
            materials,
            master_seed,
            histories,
            start_zone,
            k: 1.0,
            cycle_index: 0,
            current: source,
            next,
            start: Instant::now(),
            total_tracks: 0,
            inactive_estimates: Vec::new(),
            active_estimates: Vec::new(),
            mean_k_series: Vec::new(),
            stddev_k_series: Vec::new(),
            entropy: Vec::new(),
            time: Vec::new(),
            tracks: Vec::new(),
            fom: Vec::new(),
            shape_ensemble: Vec::new(),
        })
    }

    /// Current eigenvalue estimate.
    pub fn k(&self) -> f64 {
        self.k
    }

    /// Run `inactive` discarded cycles followed by `active` tallied ones.
    pub fn run(&mut self, inactive: usize, active: usize) -> SlabResult<PowerRun> {
        self.start = Instant::now();
        for _ in 0..inactive {
            self.cycle(false)?;
        }
        for _ in 0..active {
            self.cycle(true)?;
        }
        let (mean_k, stddev_k) = stats::mean_stddev(&self.active_estimates);
        let (mean_shape, stddev_shape) = self.shape_statistics();
        Ok(PowerRun {
            k: self.k,
            mean_k,
            stddev_k,
            inactive_estimates: self.inactive_estimates.clone(),
            active_estimates: self.active_estimates.clone(),
            mean_k_series: self.mean_k_series.clone(),
            stddev_k_series: self.stddev_k_series.clone(),
            entropy: self.entropy.clone(),
            time: self.time.clone(),
            tracks: self.tracks.clone(),
            fom: self.fom.clone(),
            mean_shape,
            stddev_shape,
        })
    }

    /// One full cycle: sample, transport, update k, tally, swap buffers.
    fn cycle(&mut self, active: bool) -> SlabResult<()> {
        self.current.prepare();
        if self.current.magnitude() > 0.0 {
            for slot in 0..self.histories {
                let history = (self.cycle_index * self.histories + slot) as u64;
                let mut particle = Particle::new(self.master_seed, history, self.start_zone);
                self.current.sample(&mut particle)?;
                particle.set_zone(self.mesh.locate(particle.x())?);
                self.total_tracks += Self::track_history(
                    &mut particle,
                    self.mesh,
                    self.materials,
                    self.k,
                    &mut self.next,
                )?;
            }
        } else {
            log::warn!(
                "cycle {:4}: fission source extinct, no histories transported",
                self.cycle_index
            );
        }

        self.k *= self.next.magnitude() / self.histories as f64;
        let elapsed = self.start.elapsed().as_secs_f64();
        let shape = self.next.shape(self.disc_mesh)?;
        let entropy = stats::shannon_entropy(&shape);
        self.entropy.push(entropy);
        self.time.push(elapsed);
        self.tracks.push(self.total_tracks as f64);

        if active {
            self.active_estimates.push(self.k);
            let (mean, stddev) = stats::mean_stddev(&self.active_estimates);
            self.mean_k_series.push(mean);
            self.stddev_k_series.push(stddev);
            let fom = if self.active_estimates.len() > 1 && stddev > 0.0 && elapsed > 0.0 {
                1.0 / (stddev * stddev * elapsed)
            } else {
                0.0
            };
            self.fom.push(fom);
            let norm = stats::l2_norm(&shape);
            self.shape_ensemble.push(if norm > 0.0 {
                &shape / norm
            } else {
                shape
            });
            log::info!(
                "cycle {:4} (active)    k = {:.5}  mean k = {:.5} +/- {:.3e}  H = {:.4}  FOM = {:.3e}  time = {:.3}s",
                self.cycle_index,
                self.k,
                mean,
                stddev,
                entropy,
                fom,
                elapsed
            );
        } else {
            self.inactive_estimates.push(self.k);
            log::info!(
                "cycle {:4} (inactive)  k = {:.5}  H = {:.4}  time = {:.3}s",
                self.cycle_index,
                self.k,
                entropy,
                elapsed
            );
        }

        mem::swap(&mut self.current, &mut self.next);
        self.next.reset();
        self.cycle_index += 1;
        Ok(())
    }

    /// Transport one history to extinction, banking fission sites into
    /// `next`. Returns the number of zone segments tracked.
    ///
    /// At each collision the expected fission yield
    /// `|w| * (nu sigma_f / sigma_t) / k` is rounded stochastically to a
    /// whole site count; `k` is the estimate frozen at the start of the
    /// cycle. Capture is treated implicitly by multiplying the weight by
    /// `sigma_s / sigma_t`, and low-weight histories are terminated by
    /// Russian roulette.
    fn track_history(
        particle: &mut Particle,
        mesh: &Mesh,
        materials: &Field<CrossSections>,
        k: f64,
        next: &mut S,
    ) -> SlabResult<u64> {
        let mut tracks = 0u64;
        loop {
            tracks += particle.transport_to_collision(mesh, materials)?;
            if particle.leaked() {
                break;
            }
            let m = &materials[particle.zone()];
            let sigma_t = m.sigma_t();
            let expected = particle.weight().abs() * (m.nu * m.sigma_f / sigma_t) / k;
            let count = (expected + particle.uniform()).floor();
            if count > 0.0 {
                next.score(particle, count)?;
            }
            particle.set_weight(particle.weight() * m.sigma_s / sigma_t);
            if particle.weight().abs() < WEIGHT_CUTOFF {
                if particle.uniform() < KILL_PROBABILITY {
                    break;
                }
                particle.set_weight(particle.weight() / (1.0 - KILL_PROBABILITY));
            }
        }
        Ok(tracks)
    }

    /// Per-bin mean and population standard deviation of the normalized
    /// active-cycle shapes.
    fn shape_statistics(&self) -> (Array1<f64>, Array1<f64>) {
        let bins = self.disc_mesh.num_zones();
        if self.shape_ensemble.is_empty() {
            return (Array1::zeros(bins), Array1::zeros(bins));
        }
        let n = self.shape_ensemble.len() as f64;
        let mut mean = Array1::<f64>::zeros(bins);
        let mut mean_sq = Array1::<f64>::zeros(bins);
        for shape in &self.shape_ensemble {
            mean += shape;
            mean_sq += &(shape * shape);
        }
        mean /= n;
        mean_sq /= n;
        let stddev = (&mean_sq - &(&mean * &mean)).mapv(|v| v.max(0.0).sqrt());
        (mean, stddev)
    }
}

/// Run a complete power-method calculation from a validated
/// configuration: build the mesh and materials, draw an initial bank from
/// a flat source guess, iterate, and return the tallies.
pub fn power_from_config(config: &PowerConfig) -> SlabResult<PowerRun> {
    config.validate()?;
    let widths = config.geometry.resolved_widths()?;
    let mesh = Mesh::from_zone_widths(&widths, config.geometry.area)?;
    let disc_mesh = Mesh::uniform(mesh.length(), config.geometry.area, config.source_bins)?;
    let materials = Field::from_values(&mesh, config.materials.clone())?;
    let seed = if config.seed == 0 {
        rng::entropy_seed()
    } else {
        config.seed
    };
    log::info!(
        "power iteration: {} zones, {} source bins, {} histories, seed {}",
        mesh.num_zones(),
        disc_mesh.num_zones(),
        config.cycles.histories,
        seed
    );
    let guess = Field::uniform(&disc_mesh, 1.0);
    let source = BankSource::from_field(
        &guess,
        &disc_mesh,
        seed,
        CONTROL_STREAM_BASE,
        config.cycles.histories,
    )?;
    let mut iterator = PowerIterator::new(
        &mesh,
        &disc_mesh,
        &materials,
        seed,
        source,
        config.cycles.histories,
    )?;
    iterator.run(config.cycles.inactive, config.cycles.active)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slab_geometry::Boundary;

    fn flat_bank(mesh: &Mesh, seed: u64, count: usize) -> BankSource {
        let guess = Field::uniform(mesh, 1.0);
        BankSource::from_field(&guess, mesh, seed, CONTROL_STREAM_BASE, count).unwrap()
    }

    #[test]
    fn test_rejects_zero_histories() {
        let mesh = Mesh::uniform(1.0, 1.0, 1).unwrap();
        let materials = Field::uniform(&mesh, CrossSections::new(0.5, 0.2, 0.3, 2.0));
        let source = flat_bank(&mesh, 1, 10);
        assert!(matches!(
            PowerIterator::new(&mesh, &mesh, &materials, 1, source, 0),
            Err(SlabError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_materials() {
        let mesh = Mesh::uniform(1.0, 1.0, 1).unwrap();
        let materials = Field::uniform(&mesh, CrossSections::new(0.0, 0.0, 0.0, 2.0));
        let source = flat_bank(&mesh, 1, 10);
        assert!(matches!(
            PowerIterator::new(&mesh, &mesh, &materials, 1, source, 10),
            Err(SlabError::NonPositiveCrossSection { .. })
        ));
    }

    #[test]
    fn test_fixed_seed_reproduces_estimates() {
        let mesh = Mesh::uniform(2.0, 1.0, 4)
            .unwrap()
            .with_boundaries(Boundary::Reflecting, Boundary::Reflecting);
        let materials = Field::uniform(&mesh, CrossSections::new(0.3, 0.4, 0.3, 2.0));
        let mut runs = Vec::new();
        for _ in 0..2 {
            let source = flat_bank(&mesh, 77, 200);
            let mut iterator =
                PowerIterator::new(&mesh, &mesh, &materials, 77, source, 200).unwrap();
            runs.push(iterator.run(3, 5).unwrap());
        }
        assert_eq!(runs[0].active_estimates, runs[1].active_estimates);
        assert_eq!(runs[0].inactive_estimates, runs[1].inactive_estimates);
        assert_eq!(runs[0].mean_shape, runs[1].mean_shape);
    }

    #[test]
    fn test_extinct_source_drives_k_to_zero() {
        // No fission at all: the first cycle banks nothing, k drops to 0,
        // and the run still completes with empty-source cycles.
        let mesh = Mesh::uniform(1.0, 1.0, 2).unwrap();
        let materials = Field::uniform(&mesh, CrossSections::new(0.2, 0.0, 0.8, 0.0));
        let source = flat_bank(&mesh, 5, 50);
        let mut iterator = PowerIterator::new(&mesh, &mesh, &materials, 5, source, 50).unwrap();
        let run = iterator.run(2, 3).unwrap();
        assert_eq!(run.k, 0.0);
        assert!(run.active_estimates.iter().all(|&k| k == 0.0));
        assert!(run.entropy.iter().skip(1).all(|&h| h == 0.0));
    }

    #[test]
    fn test_series_lengths_and_splits() {
        let mesh = Mesh::uniform(2.0, 1.0, 2)
            .unwrap()
            .with_boundaries(Boundary::Reflecting, Boundary::Reflecting);
        let materials = Field::uniform(&mesh, CrossSections::new(0.0, 1.0, 0.0, 1.0));
        let source = flat_bank(&mesh, 9, 100);
        let mut iterator = PowerIterator::new(&mesh, &mesh, &materials, 9, source, 100).unwrap();
        let run = iterator.run(4, 6).unwrap();
        assert_eq!(run.inactive_estimates.len(), 4);
        assert_eq!(run.active_estimates.len(), 6);
        assert_eq!(run.entropy.len(), 10);
        assert_eq!(run.time.len(), 10);
        assert_eq!(run.tracks.len(), 10);
        assert_eq!(run.fom.len(), 6);
        assert_eq!(run.fom[0], 0.0);
        assert_eq!(run.mean_shape.len(), 2);
        // Track counts are cumulative.
        for pair in run.tracks.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_histogram_source_on_coarser_shape_mesh() {
        use crate::hist::HistSource;
        // Shape statistics on a coarser discretization than the
        // histogram's own mesh must rebin, not mix vector lengths.
        let mesh = Mesh::uniform(20.0, 1.0, 20).unwrap();
        let disc_mesh = Mesh::uniform(20.0, 1.0, 10).unwrap();
        let materials = Field::uniform(&mesh, CrossSections::new(0.8, 0.2, 0.0, 5.0));
        let source = HistSource::from_weights(
            &mesh,
            Array1::from_elem(mesh.num_zones(), 1.0),
            31,
            CONTROL_STREAM_BASE,
        )
        .unwrap();
        let mut iterator =
            PowerIterator::new(&mesh, &disc_mesh, &materials, 31, source, 200).unwrap();
        let run = iterator.run(0, 2).unwrap();
        assert_eq!(run.mean_shape.len(), 10);
        assert_eq!(run.stddev_shape.len(), 10);
        assert!(run.k > 0.0);
    }

    #[test]
    fn test_config_driver_end_to_end() {
        use slab_types::config::{CycleConfig, GeometryConfig};
        let config = PowerConfig {
            geometry: GeometryConfig {
                length: Some(20.0),
                zones: 1,
                zone_widths: None,
                area: 1.0,
            },
            source_bins: 10,
            materials: vec![CrossSections::new(0.8, 0.2, 0.0, 5.0)],
            cycles: CycleConfig {
                inactive: 2,
                active: 3,
                histories: 100,
            },
            seed: 13,
        };
        let run = power_from_config(&config).unwrap();
        assert_eq!(run.active_estimates.len(), 3);
        assert!(run.k > 0.0);
        assert_eq!(run.mean_shape.len(), 10);
    }
}
