//! Validate → map → evaluate → assemble.
//!
//! `RemnantModel` wraps a `FitEvaluator` and exposes the remnant quantities:
//!
//! - `mass`: `mC`
//! - `spin`: `chiCz`, returned as `(0, 0, chiCz)`
//! - `kick`: `velCx`, `velCy`, returned as `(velCx, velCy, 0)`
//! - `all`: the four channels above, in that order
//!
//! Inputs are validated before any evaluator call, so a failing call never reaches
//! the fits. Fit coordinates are computed once per call and shared by every
//! channel. Nothing is cached between calls.

use nalgebra::Vector3;
use rayon::prelude::*;

use crate::domain::{
    BinaryParameters, EvalOptions, Evaluated, FitCoordinates, FitKey, OutputSelector,
    RemnantOutput, RemnantProperties, ScalarFitResult,
};
use crate::error::FitError;
use crate::fit::evaluator::FitEvaluator;
use crate::fit::limits::ParamLimits;
use crate::models::map_parameters;

/// Remnant surrogate backed by a scalar fit evaluator.
#[derive(Debug, Clone)]
pub struct RemnantModel<E> {
    evaluator: E,
    limits: ParamLimits,
}

impl<E: FitEvaluator> RemnantModel<E> {
    /// Model with the 3dq8 validation envelope.
    pub fn new(evaluator: E) -> Self {
        Self::with_limits(evaluator, ParamLimits::THREE_DQ8)
    }

    pub fn with_limits(evaluator: E, limits: ParamLimits) -> Self {
        Self { evaluator, limits }
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Validate `params` and compute its fit coordinates without evaluating any fit.
    pub fn prepare(
        &self,
        params: &BinaryParameters,
    ) -> Result<Evaluated<FitCoordinates>, FitError> {
        let warnings = self.limits.validate(params)?;
        let coords = map_parameters(params);
        tracing::debug!(
            q = params.q,
            log_q = coords.log_q,
            chi_hat = coords.chi_hat,
            chi_anti = coords.chi_anti,
            "mapped to fit coordinates"
        );
        Ok(Evaluated::new(coords, warnings))
    }

    /// Evaluate the quantities chosen by `selector`.
    ///
    /// `EvalOptions` carries no settings for the 3dq8 fits; unknown options are
    /// rejected when it is built.
    pub fn evaluate(
        &self,
        selector: OutputSelector,
        params: &BinaryParameters,
        _options: &EvalOptions,
    ) -> Result<Evaluated<RemnantOutput>, FitError> {
        let Evaluated {
            value: coords,
            warnings,
        } = self.prepare(params)?;

        let output = match selector {
            OutputSelector::Mass => {
                let (mass, mass_err) = self.mass_at(&coords)?;
                RemnantOutput::Mass { mass, mass_err }
            }
            OutputSelector::Spin => {
                let (spin, spin_err) = self.spin_at(&coords)?;
                RemnantOutput::Spin { spin, spin_err }
            }
            OutputSelector::Kick => {
                let (kick, kick_err) = self.kick_at(&coords)?;
                RemnantOutput::Kick { kick, kick_err }
            }
            OutputSelector::All => RemnantOutput::All(self.all_at(&coords)?),
        };

        Ok(Evaluated::new(output, warnings))
    }

    /// Remnant mass and its 1-sigma error.
    pub fn mass(
        &self,
        q: f64,
        chi_a: [f64; 3],
        chi_b: [f64; 3],
        _options: &EvalOptions,
    ) -> Result<Evaluated<(f64, f64)>, FitError> {
        let params = BinaryParameters::new(q, chi_a, chi_b);
        let Evaluated { value: coords, warnings } = self.prepare(&params)?;
        Ok(Evaluated::new(self.mass_at(&coords)?, warnings))
    }

    /// Remnant spin vector and its 1-sigma error vector (x, y are zero).
    pub fn spin(
        &self,
        q: f64,
        chi_a: [f64; 3],
        chi_b: [f64; 3],
        _options: &EvalOptions,
    ) -> Result<Evaluated<(Vector3<f64>, Vector3<f64>)>, FitError> {
        let params = BinaryParameters::new(q, chi_a, chi_b);
        let Evaluated { value: coords, warnings } = self.prepare(&params)?;
        Ok(Evaluated::new(self.spin_at(&coords)?, warnings))
    }

    /// Recoil kick vector and its 1-sigma error vector (z is zero).
    pub fn kick(
        &self,
        q: f64,
        chi_a: [f64; 3],
        chi_b: [f64; 3],
        _options: &EvalOptions,
    ) -> Result<Evaluated<(Vector3<f64>, Vector3<f64>)>, FitError> {
        let params = BinaryParameters::new(q, chi_a, chi_b);
        let Evaluated { value: coords, warnings } = self.prepare(&params)?;
        Ok(Evaluated::new(self.kick_at(&coords)?, warnings))
    }

    /// Mass, spin and kick together.
    pub fn all(
        &self,
        q: f64,
        chi_a: [f64; 3],
        chi_b: [f64; 3],
        _options: &EvalOptions,
    ) -> Result<Evaluated<RemnantProperties>, FitError> {
        let params = BinaryParameters::new(q, chi_a, chi_b);
        let Evaluated { value: coords, warnings } = self.prepare(&params)?;
        Ok(Evaluated::new(self.all_at(&coords)?, warnings))
    }

    /// Evaluate many binaries in parallel. Results keep the input order and each
    /// element fails or succeeds on its own.
    pub fn evaluate_batch(
        &self,
        selector: OutputSelector,
        params: &[BinaryParameters],
        options: &EvalOptions,
    ) -> Vec<Result<Evaluated<RemnantOutput>, FitError>> {
        params
            .par_iter()
            .map(|p| self.evaluate(selector, p, options))
            .collect()
    }

    fn channel(&self, key: FitKey, coords: &FitCoordinates) -> Result<ScalarFitResult, FitError> {
        let out = self.evaluator.evaluate_scalar_fit(key, coords)?;
        tracing::debug!(key = key.as_str(), value = out.value, sigma = out.sigma, "evaluated fit");
        Ok(out)
    }

    fn mass_at(&self, coords: &FitCoordinates) -> Result<(f64, f64), FitError> {
        let mc = self.channel(FitKey::MC, coords)?;
        Ok((mc.value, mc.sigma))
    }

    fn spin_at(&self, coords: &FitCoordinates) -> Result<(Vector3<f64>, Vector3<f64>), FitError> {
        let chi = self.channel(FitKey::ChiCz, coords)?;
        Ok((
            Vector3::new(0.0, 0.0, chi.value),
            Vector3::new(0.0, 0.0, chi.sigma),
        ))
    }

    fn all_at(&self, coords: &FitCoordinates) -> Result<RemnantProperties, FitError> {
        let (mass, mass_err) = self.mass_at(coords)?;
        let (spin, spin_err) = self.spin_at(coords)?;
        let (kick, kick_err) = self.kick_at(coords)?;
        Ok(RemnantProperties {
            mass,
            spin,
            kick,
            mass_err,
            spin_err,
            kick_err,
        })
    }

    fn kick_at(&self, coords: &FitCoordinates) -> Result<(Vector3<f64>, Vector3<f64>), FitError> {
        let vx = self.channel(FitKey::VelCx, coords)?;
        let vy = self.channel(FitKey::VelCy, coords)?;
        Ok((
            Vector3::new(vx.value, vy.value, 0.0),
            Vector3::new(vx.sigma, vy.sigma, 0.0),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::domain::{DiagnosticKind, RangeParameter};

    /// Records every call; returns a value/sigma derived from the key and the
    /// coordinates so assembly mistakes show up.
    #[derive(Default)]
    struct CountingEvaluator {
        calls: Mutex<Vec<(FitKey, FitCoordinates)>>,
        fail_on: Option<FitKey>,
    }

    impl CountingEvaluator {
        fn failing_on(key: FitKey) -> Self {
            Self {
                fail_on: Some(key),
                ..Self::default()
            }
        }

        fn keys(&self) -> Vec<FitKey> {
            self.calls.lock().unwrap().iter().map(|(k, _)| *k).collect()
        }
    }

    impl FitEvaluator for CountingEvaluator {
        fn evaluate_scalar_fit(
            &self,
            key: FitKey,
            coords: &FitCoordinates,
        ) -> Result<ScalarFitResult, FitError> {
            self.calls.lock().unwrap().push((key, *coords));
            if self.fail_on == Some(key) {
                return Err(FitError::evaluator(key, "boom"));
            }
            let tag = match key {
                FitKey::MC => 1.0,
                FitKey::ChiCz => 2.0,
                FitKey::VelCx => 3.0,
                FitKey::VelCy => 4.0,
            };
            Ok(ScalarFitResult {
                value: tag + coords.chi_hat,
                sigma: tag * 1e-3,
            })
        }
    }

    const CHI_A: [f64; 3] = [0.0, 0.0, 0.6];
    const CHI_B: [f64; 3] = [0.0, 0.0, -0.7];

    fn opts() -> EvalOptions {
        EvalOptions::default()
    }

    #[test]
    fn all_calls_each_channel_once_in_order() {
        let model = RemnantModel::new(CountingEvaluator::default());
        let out = model.all(4.3, CHI_A, CHI_B, &opts()).unwrap();
        assert_eq!(
            model.evaluator().keys(),
            vec![FitKey::MC, FitKey::ChiCz, FitKey::VelCx, FitKey::VelCy]
        );
        assert!(out.warnings.is_empty());

        let chi_hat = crate::models::fit_coordinates(4.3, 0.6, -0.7).chi_hat;
        let (mass, spin, kick, mass_err, spin_err, kick_err) = out.value.as_tuple();
        assert_eq!(mass, 1.0 + chi_hat);
        assert_eq!(spin, Vector3::new(0.0, 0.0, 2.0 + chi_hat));
        assert_eq!(kick, Vector3::new(3.0 + chi_hat, 4.0 + chi_hat, 0.0));
        assert_eq!(mass_err, 1e-3);
        assert_eq!(spin_err, Vector3::new(0.0, 0.0, 2e-3));
        assert_eq!(kick_err, Vector3::new(3e-3, 4e-3, 0.0));
    }

    #[test]
    fn coordinates_are_shared_across_channels() {
        let model = RemnantModel::new(CountingEvaluator::default());
        model.all(4.3, CHI_A, CHI_B, &opts()).unwrap();
        let expected = crate::models::fit_coordinates(4.3, 0.6, -0.7);
        let calls = model.evaluator().calls.lock().unwrap();
        assert!(calls.iter().all(|(_, c)| *c == expected));
    }

    #[test]
    fn single_quantity_entry_points() {
        let model = RemnantModel::new(CountingEvaluator::default());

        let (m, m_err) = model.mass(2.0, CHI_A, CHI_B, &opts()).unwrap().value;
        assert!(m > 0.0 && m_err == 1e-3);
        assert_eq!(model.evaluator().keys(), vec![FitKey::MC]);

        let (s, s_err) = model.spin(2.0, CHI_A, CHI_B, &opts()).unwrap().value;
        assert_eq!((s.x, s.y, s_err.x, s_err.y), (0.0, 0.0, 0.0, 0.0));
        assert_eq!(s_err.z, 2e-3);

        let (k, k_err) = model.kick(2.0, CHI_A, CHI_B, &opts()).unwrap().value;
        assert_eq!((k.z, k_err.z), (0.0, 0.0));
        assert_eq!(
            model.evaluator().keys(),
            vec![FitKey::MC, FitKey::ChiCz, FitKey::VelCx, FitKey::VelCy]
        );
    }

    #[test]
    fn selector_dispatch_matches_entry_points() {
        let model = RemnantModel::new(CountingEvaluator::default());
        let params = BinaryParameters::new(2.0, CHI_A, CHI_B);
        for selector in [
            OutputSelector::Mass,
            OutputSelector::Spin,
            OutputSelector::Kick,
            OutputSelector::All,
        ] {
            let out = model.evaluate(selector, &params, &opts()).unwrap();
            assert_eq!(out.value.selector(), selector);
        }
        // 1 + 1 + 2 + 4
        assert_eq!(model.evaluator().keys().len(), 8);
    }

    #[test]
    fn validation_failure_makes_no_evaluator_calls() {
        let model = RemnantModel::new(CountingEvaluator::default());
        assert!(matches!(
            model.mass(0.5, CHI_A, CHI_B, &opts()),
            Err(FitError::InvalidInput(_))
        ));
        assert!(matches!(
            model.all(11.0, CHI_A, CHI_B, &opts()),
            Err(FitError::OutOfRange(_))
        ));
        assert!(matches!(
            model.kick(2.0, [0.1, 0.0, 0.5], CHI_B, &opts()),
            Err(FitError::InvalidInput(_))
        ));
        assert!(model.evaluator().keys().is_empty());
    }

    #[test]
    fn unsupported_option_is_rejected_before_evaluation() {
        let model = RemnantModel::new(CountingEvaluator::default());
        let result = EvalOptions::from_pairs([("foo", "true")])
            .and_then(|o| model.mass(4.3, CHI_A, CHI_B, &o));
        assert_eq!(result, Err(FitError::UnsupportedOption("foo".to_string())));
        assert!(model.evaluator().keys().is_empty());
    }

    #[test]
    fn training_range_warnings_do_not_change_values() {
        let model = RemnantModel::new(CountingEvaluator::default());
        let out = model.mass(9.0, [0.0, 0.0, 0.0], [0.0, 0.0, 0.0], &opts()).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert_eq!(out.warnings[0].kind, DiagnosticKind::TrainingRangeWarning);
        assert_eq!(out.warnings[0].parameter, RangeParameter::MassRatio);

        let chi_hat = crate::models::fit_coordinates(9.0, 0.0, 0.0).chi_hat;
        assert_eq!(out.value, (1.0 + chi_hat, 1e-3));
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let model = RemnantModel::new(CountingEvaluator::default());
        let a = model.mass(4.3, CHI_A, CHI_B, &opts()).unwrap();
        let b = model.mass(4.3, CHI_A, CHI_B, &opts()).unwrap();
        assert_eq!(a.value.0.to_bits(), b.value.0.to_bits());
        assert_eq!(a.value.1.to_bits(), b.value.1.to_bits());
        // No caching: both calls reached the evaluator.
        assert_eq!(model.evaluator().keys().len(), 2);
    }

    #[test]
    fn evaluator_failure_propagates_without_partial_result() {
        let model = RemnantModel::new(CountingEvaluator::failing_on(FitKey::VelCx));
        let err = model.all(4.3, CHI_A, CHI_B, &opts()).unwrap_err();
        assert!(matches!(err, FitError::Evaluator { key: FitKey::VelCx, .. }));
        assert_eq!(
            model.evaluator().keys(),
            vec![FitKey::MC, FitKey::ChiCz, FitKey::VelCx]
        );
    }

    #[test]
    fn batch_keeps_order_and_isolates_failures() {
        let model = RemnantModel::new(CountingEvaluator::default());
        let params = vec![
            BinaryParameters::aligned(1.0, 0.0, 0.0),
            BinaryParameters::aligned(12.0, 0.0, 0.0),
            BinaryParameters::aligned(9.0, 0.9, 0.0),
        ];
        let out = model.evaluate_batch(OutputSelector::Mass, &params, &opts());
        assert_eq!(out.len(), 3);

        let first = out[0].as_ref().unwrap();
        assert_eq!(first.value, RemnantOutput::Mass { mass: 1.0, mass_err: 1e-3 });
        assert!(matches!(out[1], Err(FitError::OutOfRange(_))));
        assert_eq!(out[2].as_ref().unwrap().warnings.len(), 2);
        assert_eq!(model.evaluator().keys().len(), 2);
    }

    #[test]
    fn custom_limits_are_honoured() {
        let limits = ParamLimits {
            q_train: 2.0,
            q_allowed: 3.0,
            ..ParamLimits::THREE_DQ8
        };
        let model = RemnantModel::with_limits(CountingEvaluator::default(), limits);
        assert!(matches!(
            model.mass(4.3, CHI_A, CHI_B, &opts()),
            Err(FitError::OutOfRange(_))
        ));
        assert_eq!(model.mass(2.5, CHI_A, CHI_B, &opts()).unwrap().warnings.len(), 1);
    }
}
