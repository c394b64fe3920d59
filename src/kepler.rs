use std::f64::consts::PI;

use nalgebra::{Rotation3, Vector3};
use roots::{find_root_newton_raphson, SimpleConvergency};

use crate::{
    constants::{Degree, Radian, DPI, FULL_TURN_DEG, RADEG},
    neotrack_errors::NeoTrackError,
    orbit_type::keplerian_element::OrbitalElements,
};

/// Eccentricity above which Newton starts from π instead of M.
const HIGH_ECCENTRICITY: f64 = 0.8;

/// Retourne la valeur principale d'un angle en radians dans [0, 2π).
pub(crate) fn principal_angle(a: Radian) -> Radian {
    a.rem_euclid(DPI)
}

/// Wrap an angle in degrees into `[0, 360)`.
pub fn wrap_degrees(angle: Degree) -> Degree {
    let wrapped = angle.rem_euclid(FULL_TURN_DEG);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= FULL_TURN_DEG {
        0.0
    } else {
        wrapped
    }
}

/// Solve Kepler's equation `E - e·sin(E) = M` for the eccentric anomaly.
///
/// Arguments
/// ---------
/// * `mean_anomaly`: M in radians, any real value.
/// * `eccentricity`: e in `[0, 1)`.
///
/// Return
/// ------
/// * The eccentric anomaly E in radians, in the same revolution as `principal_angle(M)`.
/// * A [`NeoTrackError::RootFindingError`] when Newton–Raphson does not converge.
pub fn solve_kepler_equation(mean_anomaly: Radian, eccentricity: f64) -> Result<Radian, NeoTrackError> {
    let m = principal_angle(mean_anomaly);

    let f = |ecc_anom: f64| -> f64 { ecc_anom - eccentricity * ecc_anom.sin() - m };
    let df = |ecc_anom: f64| -> f64 { 1.0 - eccentricity * ecc_anom.cos() };

    let x0 = if eccentricity > HIGH_ECCENTRICITY { PI } else { m };

    let mut tol = SimpleConvergency {
        eps: f64::EPSILON * 1e2,
        max_iter: 50,
    };

    Ok(find_root_newton_raphson(x0, &f, &df, &mut tol)?)
}

/// Position in the orbital plane (x towards periapsis) for a given eccentric anomaly.
fn orbital_plane_position(semi_major_axis: f64, eccentricity: f64, ecc_anom: Radian) -> Vector3<f64> {
    Vector3::new(
        semi_major_axis * (ecc_anom.cos() - eccentricity),
        semi_major_axis * (1.0 - eccentricity.powi(2)).sqrt() * ecc_anom.sin(),
        0.0,
    )
}

/// Closed-form two-body position of the body described by `elements`.
///
/// The orbital-plane position is rotated by `Rz(Ω)·Rx(i)·Rz(ω)` into the reference
/// frame of the elements. Output is in the length unit of `a`.
///
/// Return
/// ------
/// * The Cartesian position, or an [`NeoTrackError::InvalidElements`] /
///   [`NeoTrackError::RootFindingError`] if the elements cannot be propagated.
pub fn elements_to_position(elements: &OrbitalElements) -> Result<Vector3<f64>, NeoTrackError> {
    elements.validate()?;

    let ecc_anom = solve_kepler_equation(elements.mean_anomaly * RADEG, elements.eccentricity)?;
    let in_plane = orbital_plane_position(
        elements.semi_major_axis,
        elements.eccentricity,
        ecc_anom,
    );

    let rotation = Rotation3::from_axis_angle(
        &Vector3::z_axis(),
        elements.ascending_node_longitude * RADEG,
    ) * Rotation3::from_axis_angle(&Vector3::x_axis(), elements.inclination * RADEG)
        * Rotation3::from_axis_angle(&Vector3::z_axis(), elements.periapsis_argument * RADEG);

    Ok(rotation * in_plane)
}
