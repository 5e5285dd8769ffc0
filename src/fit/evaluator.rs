//! Seams to the scalar fit collaborator.
//!
//! - `FitSource` loads one scalar fit per channel (`load_scalar_fit`)
//! - `ScalarFit` is a loaded fit: posterior mean and 1-sigma at a coordinate
//! - `FitEvaluator` evaluates a named channel (`evaluate_scalar_fit`); the
//!   dispatcher only talks to this trait
//!
//! `LoadedFits` adapts a `FitSource` into a `FitEvaluator` by loading the four 3dq8
//! channels once. Implementations must be `Send + Sync`: a loaded set is shared
//! read-only by every caller.

use std::sync::Arc;

use crate::domain::{FitCoordinates, FitKey, ScalarFitResult};
use crate::error::FitError;

/// A loaded scalar fit.
pub trait ScalarFit: Send + Sync {
    fn evaluate(&self, coords: &FitCoordinates) -> Result<ScalarFitResult, FitError>;
}

/// Something scalar fits can be loaded from.
pub trait FitSource {
    type Fit: ScalarFit;

    fn load_scalar_fit(&self, key: FitKey) -> Result<Self::Fit, FitError>;
}

/// Evaluates a named scalar channel at fit coordinates.
pub trait FitEvaluator: Send + Sync {
    fn evaluate_scalar_fit(
        &self,
        key: FitKey,
        coords: &FitCoordinates,
    ) -> Result<ScalarFitResult, FitError>;
}

impl<T: ScalarFit + ?Sized> ScalarFit for Arc<T> {
    fn evaluate(&self, coords: &FitCoordinates) -> Result<ScalarFitResult, FitError> {
        (**self).evaluate(coords)
    }
}

impl<T: FitEvaluator + ?Sized> FitEvaluator for &T {
    fn evaluate_scalar_fit(
        &self,
        key: FitKey,
        coords: &FitCoordinates,
    ) -> Result<ScalarFitResult, FitError> {
        (**self).evaluate_scalar_fit(key, coords)
    }
}

impl<T: FitEvaluator + ?Sized> FitEvaluator for Arc<T> {
    fn evaluate_scalar_fit(
        &self,
        key: FitKey,
        coords: &FitCoordinates,
    ) -> Result<ScalarFitResult, FitError> {
        (**self).evaluate_scalar_fit(key, coords)
    }
}

/// The four 3dq8 channels, loaded once.
#[derive(Debug, Clone)]
pub struct LoadedFits<F> {
    mc: F,
    chi_cz: F,
    vel_cx: F,
    vel_cy: F,
}

impl<F: ScalarFit> LoadedFits<F> {
    /// Load every channel in `FitKey::ALL` from `source`.
    pub fn load<S>(source: &S) -> Result<Self, FitError>
    where
        S: FitSource<Fit = F> + ?Sized,
    {
        let load = |key: FitKey| {
            tracing::debug!(key = key.as_str(), "loading scalar fit");
            source.load_scalar_fit(key)
        };
        Ok(Self {
            mc: load(FitKey::MC)?,
            chi_cz: load(FitKey::ChiCz)?,
            vel_cx: load(FitKey::VelCx)?,
            vel_cy: load(FitKey::VelCy)?,
        })
    }

    pub fn get(&self, key: FitKey) -> &F {
        match key {
            FitKey::MC => &self.mc,
            FitKey::ChiCz => &self.chi_cz,
            FitKey::VelCx => &self.vel_cx,
            FitKey::VelCy => &self.vel_cy,
        }
    }
}

impl<F: ScalarFit> FitEvaluator for LoadedFits<F> {
    fn evaluate_scalar_fit(
        &self,
        key: FitKey,
        coords: &FitCoordinates,
    ) -> Result<ScalarFitResult, FitError> {
        let out = self.get(key).evaluate(coords)?;
        if !(out.value.is_finite() && out.sigma.is_finite()) {
            return Err(FitError::evaluator(
                key,
                format!("non-finite result (value={}, sigma={})", out.value, out.sigma),
            ));
        }
        Ok(out)
    }
}
