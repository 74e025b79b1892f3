// ─────────────────────────────────────────────────────────────────────
// SCPN Slab MC — Field
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Zone-centered data attached to a mesh.

use std::ops::{Index, IndexMut};

use ndarray::Array1;
use slab_types::error::{SlabError, SlabResult};

use crate::mesh::{Mesh, Zone, ZoneId};

/// One value of type `T` per mesh zone, indexed by `ZoneId`.
///
/// The field does not hold a reference to its mesh; construction checks the
/// zone count and the mesh is immutable afterwards, so the pairing stays
/// valid for the lifetime of the run.
#[derive(Debug, Clone)]
pub struct Field<T> {
    data: Vec<T>,
}

impl<T: Clone> Field<T> {
    /// Field with the same value in every zone.
    pub fn uniform(mesh: &Mesh, value: T) -> Self {
        Field {
            data: vec![value; mesh.num_zones()],
        }
    }
}

impl<T> Field<T> {
    /// Field from one value per zone, in zone order.
    pub fn from_values(mesh: &Mesh, values: Vec<T>) -> SlabResult<Self> {
        if values.len() != mesh.num_zones() {
            return Err(SlabError::Config(format!(
                "field length {} does not match zone count {}",
                values.len(),
                mesh.num_zones()
            )));
        }
        Ok(Field { data: values })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, id: ZoneId) -> &T {
        &self.data[id.index()]
    }

    pub fn get_mut(&mut self, id: ZoneId) -> &mut T {
        &mut self.data[id.index()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T> Index<ZoneId> for Field<T> {
    type Output = T;

    fn index(&self, id: ZoneId) -> &T {
        &self.data[id.index()]
    }
}

impl<T> IndexMut<ZoneId> for Field<T> {
    fn index_mut(&mut self, id: ZoneId) -> &mut T {
        &mut self.data[id.index()]
    }
}

impl<T> Index<&Zone> for Field<T> {
    type Output = T;

    fn index(&self, zone: &Zone) -> &T {
        &self.data[zone.id.index()]
    }
}

impl Field<f64> {
    pub fn to_array(&self) -> Array1<f64> {
        Array1::from_vec(self.data.clone())
    }

    /// Signed sum over all zones.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Sum of absolute values over all zones.
    pub fn abs_total(&self) -> f64 {
        self.data.iter().map(|v| v.abs()).sum()
    }

    pub fn fill(&mut self, value: f64) {
        self.data.iter_mut().for_each(|v| *v = value);
    }
}
