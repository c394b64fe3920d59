//! # Keplerian orbital elements
//!
//! This module defines [`OrbitalElements`](crate::orbit_type::keplerian_element::OrbitalElements),
//! the classical element set `(a, e, i, Ω, ω, M)` driving the simulation, and
//! [`ElementsUpdate`](crate::orbit_type::keplerian_element::ElementsUpdate), the partial
//! set produced by user input.
//!
//! ## Units
//!
//! - Lengths: **AU**
//! - Angles: **degrees**, the convention of the orbital backend query parameters
//! - Epoch: **Julian Date** (TDB)
//!
//! ## Domain
//!
//! Only bound orbits are simulated: `a > 0`, `0 ≤ e < 1`, every field finite.
//! The mean anomaly is kept in `[0, 360)` with [`wrap_degrees`](crate::kepler::wrap_degrees).
//!
//! ## Wire format
//!
//! The serde representation uses the short names of the backend (`a`, `e`, `i`, `om`,
//! `w`, `ma`, `epoch`), so the same struct deserializes the `orbit` block of a catalog
//! entry and serializes into the query of a position request.

use hifitime::{Epoch, Unit};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{AstronomicalUnit, Degree, JulianDate, GAUSS_GRAV, RADEG},
    kepler::wrap_degrees,
    neotrack_errors::NeoTrackError,
};

/// Keplerian orbital elements (osculating, two-body).
///
/// Units
/// -----
/// * `semi_major_axis`: AU.
/// * `eccentricity`: unitless.
/// * `inclination`: degrees.
/// * `ascending_node_longitude`: degrees (Ω).
/// * `periapsis_argument`: degrees (ω).
/// * `mean_anomaly`: degrees (M), wrapped to `[0, 360)`.
/// * `epoch`: Julian Date of the element set, when known.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct OrbitalElements {
    #[serde(rename = "a")]
    pub semi_major_axis: AstronomicalUnit,
    #[serde(rename = "e")]
    pub eccentricity: f64,
    #[serde(rename = "i")]
    pub inclination: Degree,
    #[serde(rename = "om")]
    pub ascending_node_longitude: Degree,
    #[serde(rename = "w")]
    pub periapsis_argument: Degree,
    #[serde(rename = "ma")]
    pub mean_anomaly: Degree,
    #[serde(default, skip_serializing)]
    pub epoch: Option<JulianDate>,
}

impl OrbitalElements {
    /// Check the domain of every field.
    ///
    /// Return
    /// ------
    /// * `Ok(())` for a finite, bound orbit.
    /// * [`NeoTrackError::InvalidElements`] naming the first offending field otherwise.
    pub fn validate(&self) -> Result<(), NeoTrackError> {
        let fields = [
            ("a", self.semi_major_axis),
            ("e", self.eccentricity),
            ("i", self.inclination),
            ("om", self.ascending_node_longitude),
            ("w", self.periapsis_argument),
            ("ma", self.mean_anomaly),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, value)| !value.is_finite()) {
            return Err(NeoTrackError::InvalidElements(format!(
                "{name} must be finite, got {value}"
            )));
        }
        if let Some(epoch) = self.epoch {
            if !epoch.is_finite() {
                return Err(NeoTrackError::InvalidElements(format!(
                    "epoch must be finite, got {epoch}"
                )));
            }
        }
        check_semi_major_axis(self.semi_major_axis)?;
        check_eccentricity(self.eccentricity)?;
        Ok(())
    }

    /// Validate the elements and bring the mean anomaly into `[0, 360)`.
    pub fn normalized(mut self) -> Result<Self, NeoTrackError> {
        self.validate()?;
        self.mean_anomaly = wrap_degrees(self.mean_anomaly);
        Ok(self)
    }

    /// Copy of these elements with `update` merged in. No validation is performed.
    pub fn merged(&self, update: &ElementsUpdate) -> Self {
        OrbitalElements {
            semi_major_axis: update.semi_major_axis.unwrap_or(self.semi_major_axis),
            eccentricity: update.eccentricity.unwrap_or(self.eccentricity),
            inclination: update.inclination.unwrap_or(self.inclination),
            ascending_node_longitude: update
                .ascending_node_longitude
                .unwrap_or(self.ascending_node_longitude),
            periapsis_argument: update
                .periapsis_argument
                .unwrap_or(self.periapsis_argument),
            ..*self
        }
    }

    /// Epoch of the element set as a [`hifitime::Epoch`], if the catalog provided one.
    pub fn reference_epoch(&self) -> Option<Epoch> {
        self.epoch.map(Epoch::from_jde_tdb)
    }

    /// Mean motion of the two-body orbit around the Sun, in degrees per day.
    pub fn mean_motion(&self) -> Degree {
        GAUSS_GRAV / self.semi_major_axis.powf(1.5) / RADEG
    }

    /// Move these elements along their orbit to `target`.
    ///
    /// Only the mean anomaly changes, by `n · (target − epoch)` with `n` the
    /// [`mean_motion`](Self::mean_motion); the result carries `target` as its epoch.
    ///
    /// Return
    /// ------
    /// * The propagated elements.
    /// * [`NeoTrackError::InvalidElements`] if the elements are out of domain or carry no
    ///   epoch to propagate from.
    pub fn propagated_to(&self, target: Epoch) -> Result<Self, NeoTrackError> {
        self.validate()?;
        let start = self.reference_epoch().ok_or_else(|| {
            NeoTrackError::InvalidElements("no reference epoch to propagate from".into())
        })?;
        let days = (target - start).to_unit(Unit::Day);

        Ok(OrbitalElements {
            mean_anomaly: wrap_degrees(self.mean_anomaly + self.mean_motion() * days),
            epoch: Some(target.to_jde_tdb_days()),
            ..*self
        })
    }
}

fn check_semi_major_axis(a: f64) -> Result<(), NeoTrackError> {
    if a <= 0.0 {
        return Err(NeoTrackError::InvalidElements(format!(
            "a must be strictly positive, got {a}"
        )));
    }
    Ok(())
}

fn check_eccentricity(e: f64) -> Result<(), NeoTrackError> {
    if !(0.0..1.0).contains(&e) {
        return Err(NeoTrackError::InvalidElements(format!(
            "e must lie in [0, 1), got {e}"
        )));
    }
    Ok(())
}

/// Partial element set coming from user input (sliders).
///
/// The mean anomaly is owned by the simulation clock and cannot be set here.
#[derive(Debug, Default, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct ElementsUpdate {
    #[serde(default, rename = "a")]
    pub semi_major_axis: Option<AstronomicalUnit>,
    #[serde(default, rename = "e")]
    pub eccentricity: Option<f64>,
    #[serde(default, rename = "i")]
    pub inclination: Option<Degree>,
    #[serde(default, rename = "om")]
    pub ascending_node_longitude: Option<Degree>,
    #[serde(default, rename = "w")]
    pub periapsis_argument: Option<Degree>,
}

impl ElementsUpdate {
    pub fn semi_major_axis(mut self, a: AstronomicalUnit) -> Self {
        self.semi_major_axis = Some(a);
        self
    }

    pub fn eccentricity(mut self, e: f64) -> Self {
        self.eccentricity = Some(e);
        self
    }

    pub fn inclination(mut self, i: Degree) -> Self {
        self.inclination = Some(i);
        self
    }

    pub fn ascending_node_longitude(mut self, om: Degree) -> Self {
        self.ascending_node_longitude = Some(om);
        self
    }

    pub fn periapsis_argument(mut self, w: Degree) -> Self {
        self.periapsis_argument = Some(w);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == ElementsUpdate::default()
    }

    /// Domain check of the fields that are present, without any current state.
    ///
    /// Lets the input port reject a malformed slider value before it is queued.
    pub fn validate(&self) -> Result<(), NeoTrackError> {
        let fields = [
            ("a", self.semi_major_axis),
            ("e", self.eccentricity),
            ("i", self.inclination),
            ("om", self.ascending_node_longitude),
            ("w", self.periapsis_argument),
        ];
        for (name, value) in fields {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(NeoTrackError::InvalidElements(format!(
                        "{name} must be finite, got {value}"
                    )));
                }
            }
        }
        if let Some(a) = self.semi_major_axis {
            check_semi_major_axis(a)?;
        }
        if let Some(e) = self.eccentricity {
            check_eccentricity(e)?;
        }
        Ok(())
    }
}
