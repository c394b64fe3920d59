//! # Orbit state
//!
//! [`OrbitState`] holds the element set of the active target, its mean anomaly and the
//! display scale derived from its physical size. Every mutation is synchronous and
//! touches nothing but the state itself: issuing position requests and maintaining the
//! trail belong to the [`OrbitController`](crate::controller::OrbitController).
//!
//! Each successful mutation bumps a revision number, so callers can tell which element
//! set a result was computed for.

use crate::{
    constants::Degree,
    kepler::wrap_degrees,
    neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::{ElementsUpdate, OrbitalElements},
};

#[derive(Debug, Clone, Default)]
pub struct OrbitState {
    elements: Option<OrbitalElements>,
    display_scale: f64,
    revision: u64,
}

impl OrbitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> Option<&OrbitalElements> {
        self.elements.as_ref()
    }

    pub fn display_scale(&self) -> f64 {
        self.display_scale
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_target(&self) -> bool {
        self.elements.is_some()
    }

    /// Merge `update` into the current elements.
    ///
    /// The merged set is validated before anything is written, so a rejected update
    /// leaves the state untouched.
    ///
    /// Return
    /// ------
    /// * The new revision number.
    /// * [`NeoTrackError::NoActiveTarget`] before the first spawn.
    /// * [`NeoTrackError::InvalidElements`] if the merged set is out of domain.
    pub fn set_elements(&mut self, update: &ElementsUpdate) -> Result<u64, NeoTrackError> {
        let current = self.elements.as_ref().ok_or(NeoTrackError::NoActiveTarget)?;
        let merged = current.merged(update);
        merged.validate()?;

        self.elements = Some(merged);
        self.revision += 1;
        Ok(self.revision)
    }

    /// Add `delta` to the mean anomaly, wrapped into `[0, 360)`.
    ///
    /// Return
    /// ------
    /// * The advanced elements, or `None` when no target is active or `delta` is not
    ///   finite (the mean anomaly is then left untouched).
    pub fn advance(&mut self, delta: Degree) -> Option<OrbitalElements> {
        if !delta.is_finite() {
            return None;
        }
        let elements = self.elements.as_mut()?;
        elements.mean_anomaly = wrap_degrees(elements.mean_anomaly + delta);
        self.revision += 1;
        Some(*elements)
    }

    /// Replace the element set wholesale.
    ///
    /// Return
    /// ------
    /// * The new revision number, or [`NeoTrackError::InvalidElements`] with the state
    ///   left unchanged.
    pub fn reset(
        &mut self,
        elements: OrbitalElements,
        display_scale: f64,
    ) -> Result<u64, NeoTrackError> {
        let elements = elements.normalized()?;
        self.elements = Some(elements);
        self.display_scale = display_scale;
        self.revision += 1;
        Ok(self.revision)
    }
}
