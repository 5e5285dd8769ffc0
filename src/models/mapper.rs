//! Map physical binary parameters to fit coordinates.
//!
//! The fits were trained on `[ln q, chiHat, chi_a]` where
//!
//! - `chiHat` is the effective spin of Eq. (3) in arXiv:1508.07253, chosen to
//!   decorrelate the spin dependence from the mass ratio
//! - `chi_a = (chiAz - chiBz) / 2` is the anti-symmetric spin combination
//!
//! The arithmetic below keeps the exact operation order the fits were built with;
//! reordering it changes results in the last bit.

use crate::domain::{BinaryParameters, FitCoordinates};

/// Compute fit coordinates from `q` and the z spin components.
///
/// `q >= 1` is assumed (the validator enforces it). For such `q`, `eta <= 1/4`, so
/// the `chiHat` denominator stays at or above `1 - 19/113`.
pub fn fit_coordinates(q: f64, chi_az: f64, chi_bz: f64) -> FitCoordinates {
    let eta = q / ((1.0 + q) * (1.0 + q));
    let chi_wt_avg = (q * chi_az + chi_bz) / (1.0 + q);
    let chi_hat =
        (chi_wt_avg - 38.0 * eta / 113.0 * (chi_az + chi_bz)) / (1.0 - 76.0 * eta / 113.0);
    let chi_anti = (chi_az - chi_bz) / 2.0;

    FitCoordinates {
        log_q: q.ln(),
        chi_hat,
        chi_anti,
    }
}

/// Fit coordinates for a binary (uses the z spin components only).
pub fn map_parameters(params: &BinaryParameters) -> FitCoordinates {
    fit_coordinates(params.q, params.chi_a.z, params.chi_b.z)
}
