//! In-memory Gaussian process regression fits.
//!
//! `GprScalarFit` is a reference `ScalarFit`: it conditions a GP with fixed
//! hyper-parameters on training data that is already in memory and returns the
//! posterior mean and 1-sigma at new coordinates. Hyper-parameter optimisation and
//! reading fit coefficients from disk are left to whoever builds the fit.
//!
//! Targets are normalised to zero mean and unit variance before conditioning and
//! predictions are mapped back, matching how the 3dq8 channels were trained.
//!
//! Posterior (normalised units):
//!
//! ```text
//! mean(x*) = k*ᵀ α,            α = K⁻¹ y
//! var(x*)  = k(x*, x*) - vᵀv,  v = L⁻¹ k*,  K = L Lᵀ
//! ```
//!
//! `k(x*, x*)` includes the white-noise term, so the reported sigma never drops
//! below the noise floor.

use std::collections::BTreeMap;
use std::sync::Arc;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::domain::{FitCoordinates, FitKey, ScalarFitResult};
use crate::error::FitError;
use crate::fit::evaluator::{FitSource, ScalarFit};
use crate::math::{cholesky_with_jitter, rbf};

/// Fixed kernel hyper-parameters: `amplitude · RBF(length_scales) + noise_level · δ`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GprKernel {
    pub amplitude: f64,
    /// One length scale per fit coordinate (`log_q`, `chi_hat`, `chi_anti`).
    pub length_scales: [f64; 3],
    pub noise_level: f64,
}

impl GprKernel {
    fn check(&self, key: FitKey) -> Result<(), FitError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.amplitude) {
            return Err(FitError::evaluator(key, "kernel amplitude must be finite and > 0"));
        }
        if !self.length_scales.iter().all(|&l| positive(l)) {
            return Err(FitError::evaluator(key, "kernel length scales must be finite and > 0"));
        }
        if !(self.noise_level.is_finite() && self.noise_level >= 0.0) {
            return Err(FitError::evaluator(key, "kernel noise level must be finite and >= 0"));
        }
        Ok(())
    }

    fn cross(&self, a: &[f64; 3], b: &[f64; 3]) -> f64 {
        self.amplitude * rbf(a, b, &self.length_scales)
    }
}

/// A GP conditioned on one channel's training data.
#[derive(Debug, Clone)]
pub struct GprScalarFit {
    key: FitKey,
    kernel: GprKernel,
    x_train: Vec<[f64; 3]>,
    /// `K⁻¹ y` in normalised units.
    alpha: DVector<f64>,
    /// Lower Cholesky factor of `K`.
    l: DMatrix<f64>,
    y_mean: f64,
    y_std: f64,
}

impl GprScalarFit {
    /// Condition a GP for channel `key` on `(x_train, y_train)`.
    pub fn condition(
        key: FitKey,
        x_train: Vec<[f64; 3]>,
        y_train: &[f64],
        kernel: GprKernel,
    ) -> Result<Self, FitError> {
        kernel.check(key)?;
        let n = x_train.len();
        if n == 0 {
            return Err(FitError::evaluator(key, "no training points"));
        }
        if y_train.len() != n {
            return Err(FitError::evaluator(
                key,
                format!("{} training coordinates but {} targets", n, y_train.len()),
            ));
        }
        let finite_x = x_train.iter().flatten().all(|v| v.is_finite());
        if !(finite_x && y_train.iter().all(|v| v.is_finite())) {
            return Err(FitError::evaluator(key, "non-finite training data"));
        }

        let y_mean = y_train.iter().sum::<f64>() / n as f64;
        let var = y_train.iter().map(|y| (y - y_mean).powi(2)).sum::<f64>() / n as f64;
        // Constant targets: keep unit scale so predictions return the constant.
        let y_std = if var > 0.0 { var.sqrt() } else { 1.0 };
        let y_norm = DVector::from_iterator(n, y_train.iter().map(|y| (y - y_mean) / y_std));

        let k = DMatrix::from_fn(n, n, |i, j| {
            let c = kernel.cross(&x_train[i], &x_train[j]);
            if i == j { c + kernel.noise_level } else { c }
        });
        let Some((chol, jitter)) = cholesky_with_jitter(&k) else {
            return Err(FitError::evaluator(key, "kernel matrix is not positive definite"));
        };
        if jitter > 0.0 {
            tracing::debug!(key = key.as_str(), jitter, "kernel matrix needed diagonal jitter");
        }

        let alpha = chol.solve(&y_norm);
        let l = chol.l();

        tracing::debug!(key = key.as_str(), n, y_mean, y_std, "conditioned GPR fit");
        Ok(Self {
            key,
            kernel,
            x_train,
            alpha,
            l,
            y_mean,
            y_std,
        })
    }

    pub fn key(&self) -> FitKey {
        self.key
    }

    pub fn n_train(&self) -> usize {
        self.x_train.len()
    }
}

impl ScalarFit for GprScalarFit {
    fn evaluate(&self, coords: &FitCoordinates) -> Result<ScalarFitResult, FitError> {
        let x = coords.as_array();
        let k_star = DVector::from_iterator(
            self.x_train.len(),
            self.x_train.iter().map(|xi| self.kernel.cross(&x, xi)),
        );

        let mean = k_star.dot(&self.alpha);
        let Some(v) = self.l.solve_lower_triangular(&k_star) else {
            return Err(FitError::evaluator(self.key, "singular Cholesky factor"));
        };
        let prior_var = self.kernel.amplitude + self.kernel.noise_level;
        let var = (prior_var - v.dot(&v)).max(0.0);

        Ok(ScalarFitResult {
            value: mean * self.y_std + self.y_mean,
            sigma: var.sqrt() * self.y_std,
        })
    }
}

/// In-memory set of conditioned fits, one per channel.
#[derive(Debug, Clone, Default)]
pub struct GprFitSet {
    fits: BTreeMap<FitKey, Arc<GprScalarFit>>,
}

impl GprFitSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fit under its own channel key, replacing any previous one.
    pub fn insert(&mut self, fit: GprScalarFit) -> Option<Arc<GprScalarFit>> {
        self.fits.insert(fit.key(), Arc::new(fit))
    }

    pub fn with(mut self, fit: GprScalarFit) -> Self {
        self.insert(fit);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = FitKey> + '_ {
        self.fits.keys().copied()
    }
}

impl FitSource for GprFitSet {
    type Fit = Arc<GprScalarFit>;

    fn load_scalar_fit(&self, key: FitKey) -> Result<Self::Fit, FitError> {
        self.fits
            .get(&key)
            .cloned()
            .ok_or_else(|| FitError::evaluator(key, "no fit loaded for this channel"))
    }
}
