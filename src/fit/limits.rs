//! Range validation against the training and extrapolation envelopes.
//!
//! Two nested boxes in `(q, |chiAz|, |chiBz|)`:
//!
//! - training limits: inside, the fits interpolate
//! - allowed limits: inside, the fits extrapolate reasonably; a diagnostic is
//!   returned and evaluation proceeds
//!
//! Beyond the allowed box, or with structurally wrong input, validation fails.
//! Checks run in a fixed order (chiA in-plane, chiB in-plane, q, chiA, chiB) and the
//! first hard failure wins.

use nalgebra::Vector3;

use crate::domain::{BinaryParameters, Diagnostic, DiagnosticKind, RangeParameter};
use crate::error::FitError;

/// Validation envelope of a surrogate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamLimits {
    /// Maximum in-plane spin magnitude treated as zero.
    pub in_plane_tol: f64,
    pub q_train: f64,
    pub q_allowed: f64,
    pub chi_train: f64,
    pub chi_allowed: f64,
}

impl ParamLimits {
    /// Envelope of the 3dq8 fits (trained to q = 8, |chi| = 0.8 with small margins).
    pub const THREE_DQ8: ParamLimits = ParamLimits {
        in_plane_tol: 1e-10,
        q_train: 8.01,
        q_allowed: 10.01,
        chi_train: 0.81,
        chi_allowed: 1.0,
    };

    /// Validate a binary, returning the training-range diagnostics it raises.
    pub fn validate(&self, params: &BinaryParameters) -> Result<Vec<Diagnostic>, FitError> {
        self.check_in_plane(&params.chi_a, "chiA")?;
        self.check_in_plane(&params.chi_b, "chiB")?;

        let mut warnings = Vec::new();
        warnings.extend(self.check_mass_ratio(params.q)?);
        warnings.extend(self.check_spin(params.chi_a.z, RangeParameter::SpinA)?);
        warnings.extend(self.check_spin(params.chi_b.z, RangeParameter::SpinB)?);
        Ok(warnings)
    }

    fn check_in_plane(&self, chi: &Vector3<f64>, label: &str) -> Result<(), FitError> {
        let in_plane = (chi.x * chi.x + chi.y * chi.y).sqrt();
        // Negated so NaN components fail as well.
        if !(in_plane <= self.in_plane_tol) {
            return Err(FitError::InvalidInput(format!(
                "The x and y components of {label} should be zero \
                 (in-plane magnitude {in_plane:e})."
            )));
        }
        Ok(())
    }

    fn check_mass_ratio(&self, q: f64) -> Result<Option<Diagnostic>, FitError> {
        if q.is_nan() {
            return Err(FitError::InvalidInput("Mass ratio is NaN.".to_string()));
        }
        // -inf lands here, +inf past the allowed limit.
        if q < 1.0 {
            return Err(FitError::InvalidInput(format!("Mass ratio should be >= 1, got {q}.")));
        }
        if q > self.q_allowed {
            return Err(FitError::OutOfRange(format!(
                "Mass ratio outside allowed range (q = {q} > {}).",
                self.q_allowed
            )));
        }
        if q > self.q_train {
            return Ok(Some(training_warning(RangeParameter::MassRatio, q, self.q_train)));
        }
        Ok(None)
    }

    fn check_spin(
        &self,
        chi_z: f64,
        parameter: RangeParameter,
    ) -> Result<Option<Diagnostic>, FitError> {
        if chi_z.is_nan() {
            return Err(FitError::InvalidInput(format!(
                "{} is NaN.",
                parameter.display_name()
            )));
        }
        let mag = chi_z.abs();
        if mag > self.chi_allowed {
            return Err(FitError::OutOfRange(format!(
                "{} outside allowed range ({} = {mag} > {}).",
                parameter.display_name(),
                parameter.symbol(),
                self.chi_allowed
            )));
        }
        if mag > self.chi_train {
            return Ok(Some(training_warning(parameter, mag, self.chi_train)));
        }
        Ok(None)
    }
}

impl Default for ParamLimits {
    fn default() -> Self {
        Self::THREE_DQ8
    }
}

/// Validate against the 3dq8 envelope.
pub fn validate(params: &BinaryParameters) -> Result<Vec<Diagnostic>, FitError> {
    ParamLimits::THREE_DQ8.validate(params)
}

/// Build a training-range diagnostic and log it right away, so it is reported even
/// when a later check fails.
fn training_warning(parameter: RangeParameter, value: f64, limit: f64) -> Diagnostic {
    let w = Diagnostic {
        kind: DiagnosticKind::TrainingRangeWarning,
        parameter,
        value,
        limit,
    };
    tracing::warn!(parameter = parameter.symbol(), value, limit, "{w}");
    w
}
