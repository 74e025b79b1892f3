// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Particle
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! A weighted Monte Carlo particle and its free-flight transport.

use slab_geometry::{Boundary, Field, Mesh, ZoneId};
use slab_types::error::{SlabError, SlabResult};
use slab_types::material::CrossSections;

use crate::rng::RngStream;

/// A particle carries 3-D position and direction even though the mesh is
/// 1-D; only `x` and the direction cosine `u` drive zone crossings, while
/// `y`/`z` advance passively along accepted flights.
#[derive(Debug, Clone)]
pub struct Particle {
    x: f64,
    y: f64,
    z: f64,
    u: f64,
    v: f64,
    w: f64,
    weight: f64,
    zone: ZoneId,
    leaked: bool,
    rng: RngStream,
}

impl Particle {
    /// New unit-weight particle at the origin with an isotropic direction.
    ///
    /// `history` selects the particle's private RNG substream: every draw
    /// this particle makes (direction, flight distances, roulette) comes
    /// from `(master_seed, history)` and nowhere else.
    pub fn new(master_seed: u64, history: u64, zone: ZoneId) -> Self {
        let rng = RngStream::new(master_seed, history);
        let mut particle = Particle {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            u: 0.0,
            v: 0.0,
            w: 0.0,
            weight: 1.0,
            zone,
            leaked: false,
            rng,
        };
        particle.set_direction_isotropic();
        particle
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn z(&self) -> f64 {
        self.z
    }

    pub fn u(&self) -> f64 {
        self.u
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    pub fn set_zone(&mut self, zone: ZoneId) {
        self.zone = zone;
    }

    pub fn leaked(&self) -> bool {
        self.leaked
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// One draw from this particle's substream.
    pub fn uniform(&mut self) -> f64 {
        self.rng.uniform()
    }

    /// Sample a new direction uniformly over the unit sphere.
    pub fn set_direction_isotropic(&mut self) {
        let phi = 2.0 * std::f64::consts::PI * self.rng.uniform();
        self.u = 2.0 * self.rng.uniform() - 1.0;
        let mu = (1.0 - self.u * self.u).sqrt();
        self.v = mu * phi.cos();
        self.w = mu * phi.sin();
    }

    /// Fly the particle to its next collision site.
    ///
    /// Repeatedly samples a free-flight distance `d = -ln(1 - U) / sigma_t`
    /// in the current zone. If the flight would cross the zone's bounding
    /// node, the particle is clamped to the node and hops into the
    /// neighbor zone with a fresh distance sample; at a vacuum boundary it
    /// leaks, at a reflecting boundary the `x` direction cosine flips.
    /// A flight that stays inside the zone is a collision: position
    /// advances along all three axes, then a new isotropic direction is
    /// sampled for the post-collision flight.
    ///
    /// Returns the number of zone segments traversed (the track count).
    pub fn transport_to_collision(
        &mut self,
        mesh: &Mesh,
        materials: &Field<CrossSections>,
    ) -> SlabResult<u64> {
        let mut segments = 0u64;
        loop {
            segments += 1;
            let sigma_t = materials[self.zone].sigma_t();
            if sigma_t <= 0.0 {
                return Err(SlabError::NonPositiveCrossSection {
                    zone: self.zone.index(),
                    sigma_t,
                });
            }
            // 1 - U keeps the argument in (0, 1], so ln never sees zero.
            let d = -(1.0 - self.rng.uniform()).ln() / sigma_t;
            let candidate = self.x + d * self.u;
            let (left_edge, right_edge) = mesh.zone_interval(self.zone);
            if candidate < left_edge {
                self.x = left_edge;
                let node = mesh.node(mesh.zone(self.zone).left_node);
                match node.left_zone {
                    Some(next) => self.zone = next,
                    None => match mesh.left_boundary() {
                        Boundary::Vacuum => {
                            self.leaked = true;
                            return Ok(segments);
                        }
                        Boundary::Reflecting => self.u = -self.u,
                    },
                }
            } else if candidate > right_edge {
                self.x = right_edge;
                let node = mesh.node(mesh.zone(self.zone).right_node);
                match node.right_zone {
                    Some(next) => self.zone = next,
                    None => match mesh.right_boundary() {
                        Boundary::Vacuum => {
                            self.leaked = true;
                            return Ok(segments);
                        }
                        Boundary::Reflecting => self.u = -self.u,
                    },
                }
            } else {
                self.x = candidate;
                self.y += d * self.v;
                self.z += d * self.w;
                break;
            }
        }
        self.set_direction_isotropic();
        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_mesh(zones: usize) -> Mesh {
        Mesh::uniform(1.0, 1.0, zones).unwrap()
    }

    #[test]
    fn test_direction_is_unit_vector() {
        let mesh = unit_mesh(1);
        for history in 0..50 {
            let p = Particle::new(12, history, mesh.zone_id(0).unwrap());
            let norm = p.u * p.u + p.v * p.v + p.w * p.w;
            assert!((norm - 1.0).abs() < 1e-12, "history {history}: |omega|^2 = {norm}");
        }
    }

    #[test]
    fn test_same_history_reproduces() {
        let mesh = unit_mesh(4);
        let materials = Field::uniform(&mesh, CrossSections::new(0.5, 0.0, 0.5, 0.0));
        let mut a = Particle::new(99, 3, mesh.zone_id(0).unwrap());
        let mut b = Particle::new(99, 3, mesh.zone_id(0).unwrap());
        a.set_position(0.5, 0.0, 0.0);
        b.set_position(0.5, 0.0, 0.0);
        a.set_zone(mesh.locate(0.5).unwrap());
        b.set_zone(mesh.locate(0.5).unwrap());
        a.transport_to_collision(&mesh, &materials).unwrap();
        b.transport_to_collision(&mesh, &materials).unwrap();
        assert_eq!(a.x(), b.x());
        assert_eq!(a.leaked(), b.leaked());
    }

    #[test]
    fn test_vacuum_leak_clamps_to_edge() {
        // A nearly transparent slab: almost every history leaks on the
        // first flight, clamped to x = 0 or x = 1.
        let mesh = unit_mesh(2);
        let materials = Field::uniform(&mesh, CrossSections::new(0.0, 0.0, 1e-8, 0.0));
        let mut leaks = 0;
        for history in 0..200 {
            let mut p = Particle::new(5, history, mesh.zone_id(0).unwrap());
            p.set_position(0.5, 0.0, 0.0);
            p.set_zone(mesh.locate(0.5).unwrap());
            p.transport_to_collision(&mesh, &materials).unwrap();
            if p.leaked() {
                leaks += 1;
                assert!(p.x() == 0.0 || p.x() == 1.0, "leaked at x = {}", p.x());
            }
        }
        assert!(leaks > 190, "only {leaks}/200 histories leaked");
    }

    #[test]
    fn test_reflecting_boundaries_confine_particle() {
        let mesh = unit_mesh(3).with_boundaries(Boundary::Reflecting, Boundary::Reflecting);
        let materials = Field::uniform(&mesh, CrossSections::new(0.0, 0.0, 0.05, 0.0));
        for history in 0..100 {
            let mut p = Particle::new(8, history, mesh.zone_id(0).unwrap());
            p.set_position(0.5, 0.0, 0.0);
            p.set_zone(mesh.locate(0.5).unwrap());
            for _ in 0..5 {
                p.transport_to_collision(&mesh, &materials).unwrap();
                assert!(!p.leaked());
                assert!((0.0..=1.0).contains(&p.x()), "escaped to x = {}", p.x());
            }
        }
    }

    #[test]
    fn test_collision_updates_zone_consistently() {
        let mesh = unit_mesh(10);
        let materials = Field::uniform(&mesh, CrossSections::new(0.9, 0.0, 0.1, 0.0));
        for history in 0..100 {
            let mut p = Particle::new(21, history, mesh.zone_id(0).unwrap());
            p.set_position(0.5, 0.0, 0.0);
            p.set_zone(mesh.locate(0.5).unwrap());
            p.transport_to_collision(&mesh, &materials).unwrap();
            if !p.leaked() {
                let (left, right) = mesh.zone_interval(p.zone());
                assert!(p.x() >= left && p.x() <= right);
            }
        }
    }

    #[test]
    fn test_zero_total_cross_section_is_an_error() {
        let mesh = unit_mesh(1);
        let materials = Field::uniform(&mesh, CrossSections::new(0.0, 0.0, 0.0, 0.0));
        let mut p = Particle::new(1, 0, mesh.zone_id(0).unwrap());
        p.set_position(0.5, 0.0, 0.0);
        let err = p.transport_to_collision(&mesh, &materials).unwrap_err();
        assert!(matches!(
            err,
            SlabError::NonPositiveCrossSection { zone: 0, .. }
        ));
    }
}
