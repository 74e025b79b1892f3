// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Run configuration for a power-method eigenvalue calculation.

use serde::{Deserialize, Serialize};

use crate::error::{SlabError, SlabResult};
use crate::material::CrossSections;

/// Top-level configuration for one power-method run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerConfig {
    pub geometry: GeometryConfig,
    /// Number of bins used to discretize the fission source.
    pub source_bins: usize,
    /// One material per geometry zone, in zone order.
    pub materials: Vec<CrossSections>,
    pub cycles: CycleConfig,
    /// Master RNG seed; 0 selects system entropy.
    #[serde(default)]
    pub seed: u64,
}

/// Slab geometry: either a uniform subdivision (`length` + `zones`) or an
/// explicit per-zone width list. Exactly one of the two must be given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(default)]
    pub zones: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone_widths: Option<Vec<f64>>,
    /// Cross-sectional area of the slab (default: 1.0).
    #[serde(default = "default_area")]
    pub area: f64,
}

fn default_area() -> f64 {
    1.0
}

/// Cycle schedule: inactive cycles are discarded, active cycles are tallied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CycleConfig {
    pub inactive: usize,
    pub active: usize,
    /// Histories transported per cycle.
    pub histories: usize,
}

impl GeometryConfig {
    /// Resolve to an explicit per-zone width list.
    pub fn resolved_widths(&self) -> SlabResult<Vec<f64>> {
        match (&self.zone_widths, self.length) {
            (Some(widths), None) => Ok(widths.clone()),
            (None, Some(length)) => {
                if self.zones == 0 {
                    return Err(SlabError::Config(
                        "geometry.zones must be >= 1 with a uniform length".to_string(),
                    ));
                }
                Ok(vec![length / self.zones as f64; self.zones])
            }
            (Some(_), Some(_)) => Err(SlabError::Config(
                "geometry.length and geometry.zone_widths are mutually exclusive".to_string(),
            )),
            (None, None) => Err(SlabError::Config(
                "geometry requires either length or zone_widths".to_string(),
            )),
        }
    }

    pub fn total_length(&self) -> SlabResult<f64> {
        Ok(self.resolved_widths()?.iter().sum())
    }
}

impl PowerConfig {
    /// Load from a JSON file.
    pub fn from_file(path: &str) -> SlabResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Fail-fast validation per the error taxonomy: bad lengths, areas,
    /// zone counts, histories and materials are rejected here, never
    /// clamped downstream.
    pub fn validate(&self) -> SlabResult<()> {
        if let Some(length) = self.geometry.length {
            if !length.is_finite() || length <= 0.0 {
                return Err(SlabError::Config(format!(
                    "geometry.length must be finite and > 0, got {length}"
                )));
            }
        }
        let widths = self.geometry.resolved_widths()?;
        if widths.is_empty() {
            return Err(SlabError::Config(
                "geometry must contain at least one zone".to_string(),
            ));
        }
        for (i, w) in widths.iter().enumerate() {
            if !w.is_finite() || *w <= 0.0 {
                return Err(SlabError::Config(format!(
                    "zone {i} width must be finite and > 0, got {w}"
                )));
            }
        }
        if !self.geometry.area.is_finite() || self.geometry.area <= 0.0 {
            return Err(SlabError::Config(format!(
                "geometry.area must be finite and > 0, got {}",
                self.geometry.area
            )));
        }
        if self.source_bins == 0 {
            return Err(SlabError::Config(
                "source_bins must be >= 1".to_string(),
            ));
        }
        if self.cycles.histories == 0 {
            return Err(SlabError::Config(
                "cycles.histories must be >= 1".to_string(),
            ));
        }
        if self.materials.len() != widths.len() {
            return Err(SlabError::Config(format!(
                "expected {} materials (one per zone), got {}",
                widths.len(),
                self.materials.len()
            )));
        }
        for (zone, m) in self.materials.iter().enumerate() {
            m.validate(zone)?;
        }
        Ok(())
    }
}
