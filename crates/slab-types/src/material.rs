// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Cross Sections
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Macroscopic cross-section data for one material.

use serde::{Deserialize, Serialize};

use crate::error::{SlabError, SlabResult};

/// Macroscopic cross sections [1/cm] and fission multiplicity for a material.
///
/// Absorption and total cross sections are derived, not stored:
/// `sigma_a = sigma_f + sigma_g`, `sigma_t = sigma_a + sigma_s`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSections {
    /// Scattering cross section.
    pub sigma_s: f64,
    /// Fission cross section.
    pub sigma_f: f64,
    /// Capture cross section.
    pub sigma_g: f64,
    /// Mean fission neutrons per fission.
    pub nu: f64,
}

impl CrossSections {
    pub fn new(sigma_s: f64, sigma_f: f64, sigma_g: f64, nu: f64) -> Self {
        CrossSections {
            sigma_s,
            sigma_f,
            sigma_g,
            nu,
        }
    }

    /// Absorption cross section.
    pub fn sigma_a(&self) -> f64 {
        self.sigma_f + self.sigma_g
    }

    /// Total cross section.
    pub fn sigma_t(&self) -> f64 {
        self.sigma_a() + self.sigma_s
    }

    /// Secondary ratio `c = (sigma_s + nu*sigma_f) / sigma_t`, the expected
    /// number of neutrons emerging per collision.
    pub fn c(&self) -> f64 {
        (self.sigma_s + self.nu * self.sigma_f) / self.sigma_t()
    }

    /// Reject non-finite or negative entries and non-positive totals.
    /// A zero total cross section is an invalid physical model here, not a
    /// vacuum treatment.
    pub fn validate(&self, zone: usize) -> SlabResult<()> {
        for (label, v) in [
            ("sigma_s", self.sigma_s),
            ("sigma_f", self.sigma_f),
            ("sigma_g", self.sigma_g),
            ("nu", self.nu),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(SlabError::Config(format!(
                    "material for zone {zone}: {label} must be finite and >= 0, got {v}"
                )));
            }
        }
        let sigma_t = self.sigma_t();
        if sigma_t <= 0.0 {
            return Err(SlabError::NonPositiveCrossSection { zone, sigma_t });
        }
        Ok(())
    }
}
