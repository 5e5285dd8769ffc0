//! Cholesky factorisation of kernel matrices.
//!
//! Kernel matrices built from closely spaced training points are symmetric positive
//! semi-definite in exact arithmetic but can lose definiteness in floating point.
//! When the plain factorisation fails we retry with a small diagonal jitter,
//! scaled to the mean diagonal, before giving up.

use nalgebra::{Cholesky, DMatrix, Dyn};

/// Relative jitter levels tried after a failed plain factorisation.
const JITTER_LEVELS: [f64; 3] = [1e-10, 1e-8, 1e-6];

/// Factor `k = L Lᵀ`, returning the factor and the jitter that was added.
///
/// Returns `None` if the matrix is not square or could not be factored even with
/// the largest jitter.
pub fn cholesky_with_jitter(k: &DMatrix<f64>) -> Option<(Cholesky<f64, Dyn>, f64)> {
    let n = k.nrows();
    if n == 0 || n != k.ncols() {
        return None;
    }
    if let Some(chol) = k.clone().cholesky() {
        return Some((chol, 0.0));
    }

    let mean_diag = k.diagonal().iter().map(|v| v.abs()).sum::<f64>() / n as f64;
    let scale = mean_diag.max(f64::MIN_POSITIVE);
    for &rel in &JITTER_LEVELS {
        let jitter = rel * scale;
        let mut m = k.clone();
        for i in 0..n {
            m[(i, i)] += jitter;
        }
        if let Some(chol) = m.cholesky() {
            return Some((chol, jitter));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factors_spd_matrix_without_jitter() {
        let k = DMatrix::from_row_slice(2, 2, &[4.0, 2.0, 2.0, 3.0]);
        let (chol, jitter) = cholesky_with_jitter(&k).unwrap();
        assert_eq!(jitter, 0.0);
        let l = chol.l();
        let rebuilt = &l * l.transpose();
        assert!((rebuilt - k).norm() < 1e-12);
    }

    #[test]
    fn singular_psd_matrix_needs_jitter() {
        // Two identical training points: rank one.
        let k = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let (_, jitter) = cholesky_with_jitter(&k).unwrap();
        assert!(jitter > 0.0);
    }

    #[test]
    fn rejects_indefinite_and_non_square() {
        let k = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        assert!(cholesky_with_jitter(&k).is_none());
        let k = DMatrix::<f64>::zeros(2, 3);
        assert!(cholesky_with_jitter(&k).is_none());
    }
}
