//! Stationary covariance kernels over fit coordinates.
//!
//! The 3dq8 channels use a scaled squared-exponential (RBF) kernel with one length
//! scale per coordinate (ARD), plus a white-noise term on the diagonal:
//!
//! ```text
//! k(a, b) = σ² · exp(-½ Σ_i ((a_i - b_i) / ℓ_i)²) + σ_n² · δ(a, b)
//! ```
//!
//! The white-noise term is applied by the caller; only the RBF part lives here.

/// Squared Euclidean distance after scaling each axis by its length scale.
pub fn scaled_sq_distance(a: &[f64; 3], b: &[f64; 3], length_scales: &[f64; 3]) -> f64 {
    let mut d2 = 0.0;
    for i in 0..3 {
        let d = (a[i] - b[i]) / length_scales[i];
        d2 += d * d;
    }
    d2
}

/// Unit-amplitude RBF correlation.
pub fn rbf(a: &[f64; 3], b: &[f64; 3], length_scales: &[f64; 3]) -> f64 {
    (-0.5 * scaled_sq_distance(a, b, length_scales)).exp()
}
