//! Catalog entries returned by the orbital backend for a near-Earth object.

use serde::Deserialize;

use crate::{
    constants::Kilometer,
    orbit_type::keplerian_element::OrbitalElements,
};

/// Estimated diameter range of the object
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DiameterRange {
    pub min: Kilometer,
    pub max: Kilometer,
}

impl DiameterRange {
    pub fn mean(&self) -> Kilometer {
        0.5 * (self.min + self.max)
    }
}

/// Closest recorded approach to the Earth
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CloseApproach {
    /// Calendar date as formatted by the NEO feed, e.g. `2029-Apr-13 21:46`
    pub date: String,
    #[serde(rename = "miss_km")]
    pub miss_distance_km: Kilometer,
    /// Relative velocity (km/s)
    #[serde(rename = "vel_kps")]
    pub relative_velocity: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub name: String,
    pub hazardous: bool,
    #[serde(rename = "diameter_km")]
    pub diameter: DiameterRange,
    pub orbit: OrbitalElements,
    #[serde(rename = "closest", default)]
    pub closest_approach: Option<CloseApproach>,
}

/// Metadata of the active target exposed to the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInfo {
    pub id: String,
    pub name: String,
    pub hazardous: bool,
    pub diameter: DiameterRange,
    pub closest_approach: Option<CloseApproach>,
}

impl From<&CatalogEntry> for TargetInfo {
    fn from(entry: &CatalogEntry) -> Self {
        TargetInfo {
            id: entry.id.clone(),
            name: entry.name.clone(),
            hazardous: entry.hazardous,
            diameter: entry.diameter,
            closest_approach: entry.closest_approach.clone(),
        }
    }
}
