#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
};

use neotrack::{
    constants::Position,
    neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::OrbitalElements,
    resolver::{
        catalog::{CatalogEntry, CloseApproach, DiameterRange},
        OrbitCatalog, PositionResolver,
    },
};

/// Resolver answering a fixed position, or a 503 while `failing` is set.
#[derive(Debug, Clone)]
pub struct FixedResolver {
    pub position: Position,
    pub failing: Arc<AtomicBool>,
    pub calls: Arc<AtomicUsize>,
}

impl FixedResolver {
    pub fn new(position: Position) -> Self {
        FixedResolver {
            position,
            failing: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl PositionResolver for FixedResolver {
    async fn resolve(&self, _elements: OrbitalElements) -> Result<Position, NeoTrackError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(NeoTrackError::HttpStatus {
                status: 503,
                url: "http://stub/asteroid_position".into(),
            });
        }
        Ok(self.position)
    }
}

/// In-memory catalog; unknown designations are not found.
#[derive(Debug, Clone, Default)]
pub struct StubCatalog {
    pub entries: HashMap<String, CatalogEntry>,
    pub offline: Arc<AtomicBool>,
}

impl StubCatalog {
    pub fn with(entries: impl IntoIterator<Item = CatalogEntry>) -> Self {
        StubCatalog {
            entries: entries.into_iter().map(|e| (e.id.clone(), e)).collect(),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }
}

impl OrbitCatalog for StubCatalog {
    async fn lookup(&self, target_id: &str) -> Result<CatalogEntry, NeoTrackError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(NeoTrackError::HttpStatus {
                status: 502,
                url: "http://stub/cross_keplarian".into(),
            });
        }
        self.entries
            .get(target_id)
            .cloned()
            .ok_or_else(|| NeoTrackError::TargetNotFound(target_id.to_string()))
    }
}

pub fn sample_elements() -> OrbitalElements {
    OrbitalElements {
        semi_major_axis: 1.3,
        eccentricity: 0.25,
        inclination: 6.0,
        ascending_node_longitude: 45.0,
        periapsis_argument: 120.0,
        mean_anomaly: 10.0,
        epoch: Some(2460950.5),
    }
}

pub fn catalog_entry(id: &str, diameter_km: f64) -> CatalogEntry {
    CatalogEntry {
        id: id.to_string(),
        name: format!("({id})"),
        hazardous: false,
        diameter: DiameterRange {
            min: diameter_km,
            max: diameter_km,
        },
        orbit: sample_elements(),
        closest_approach: Some(CloseApproach {
            date: "2025-Oct-02 04:11".into(),
            miss_distance_km: 1_250_000.0,
            relative_velocity: 11.3,
        }),
    }
}
