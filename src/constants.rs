//! # Constants and type definitions for neotrack
//!
//! Physical constants, unit conversions, simulation defaults and the type aliases
//! shared by every module of the crate.

use nalgebra::Vector3;

use crate::orbit_type::keplerian_element::OrbitalElements;

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// 2π, useful for trigonometric conversions
pub const DPI: f64 = 2. * std::f64::consts::PI;

/// Full turn in degrees
pub const FULL_TURN_DEG: f64 = 360.0;

/// Degrees → radians
pub const RADEG: f64 = std::f64::consts::PI / 180.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// Julian Date of J2000.0 (2000-01-01 12:00:00 TT)
pub const J2000_JD: f64 = 2_451_545.0;

/// Gaussian gravitational constant k (rad/day, heliocentric, AU)
pub const GAUSS_GRAV: f64 = 0.01720209895;

// -------------------------------------------------------------------------------------------------
// Simulation defaults
// -------------------------------------------------------------------------------------------------

/// Number of positions kept in the visual trail
pub const DEFAULT_TRAIL_CAPACITY: usize = 100;

/// Mean anomaly rate of the simulation clock (0.5°/frame at 60 Hz)
pub const DEFAULT_DEGREES_PER_SECOND: f64 = 30.0;

/// Largest wall-clock interval a single tick may account for, in milliseconds
pub const DEFAULT_MAX_TICK_STEP_MS: u64 = 250;

/// Display refresh period driving the clock, in milliseconds
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 16;

/// Default base URL of the orbital backend
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in radians
pub type Radian = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Distance in astronomical units
pub type AstronomicalUnit = f64;
/// Julian Date (days)
pub type JulianDate = f64;

/// Cartesian position of the target, in scene units
pub type Position = Vector3<f64>;

/// Mean J2000 orbital elements of the Earth, as served by the orbital backend.
pub const EARTH_ELEMENTS: OrbitalElements = OrbitalElements {
    semi_major_axis: 1.00000011,
    eccentricity: 0.01671022,
    inclination: 0.00005,
    ascending_node_longitude: -11.26064,
    periapsis_argument: 102.94719,
    mean_anomaly: 100.46435,
    epoch: Some(J2000_JD),
};
