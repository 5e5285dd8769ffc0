//! Shared domain types.
//!
//! Everything here is transient and computed per call. The only long-lived state
//! in the crate is the loaded fit set, which is owned by the caller and only read.
//!
//! Vectors are expressed in the coorbital frame at `t = -100 M` from the peak of
//! the waveform: `z` along the orbital angular momentum, `x` along the line of
//! separation from the smaller to the larger black hole, `y` completing the triad.
//! Spins are dimensionless (Kerr parameter convention).

use std::fmt;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// A scalar output channel of the surrogate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FitKey {
    /// Remnant mass.
    #[serde(rename = "mC")]
    MC,
    /// Remnant spin, z component.
    #[serde(rename = "chiCz")]
    ChiCz,
    /// Kick velocity, x component.
    #[serde(rename = "velCx")]
    VelCx,
    /// Kick velocity, y component.
    #[serde(rename = "velCy")]
    VelCy,
}

impl FitKey {
    /// All channels, in evaluation order.
    pub const ALL: [FitKey; 4] = [FitKey::MC, FitKey::ChiCz, FitKey::VelCx, FitKey::VelCy];

    pub fn as_str(self) -> &'static str {
        match self {
            FitKey::MC => "mC",
            FitKey::ChiCz => "chiCz",
            FitKey::VelCx => "velCx",
            FitKey::VelCy => "velCy",
        }
    }
}

impl fmt::Display for FitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which remnant quantities to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputSelector {
    Mass,
    Spin,
    Kick,
    All,
}

impl OutputSelector {
    /// Scalar channels required by this selector, in call order.
    pub fn fit_keys(self) -> &'static [FitKey] {
        match self {
            OutputSelector::Mass => &[FitKey::MC],
            OutputSelector::Spin => &[FitKey::ChiCz],
            OutputSelector::Kick => &[FitKey::VelCx, FitKey::VelCy],
            OutputSelector::All => &FitKey::ALL,
        }
    }
}

/// Physical parameters of an aligned-spin binary.
///
/// `q >= 1` is the mass ratio (larger over smaller), `chi_a` the spin of the
/// heavier hole and `chi_b` that of the lighter one. Only the z components may be
/// non-zero; this is checked by the range validator, not by construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BinaryParameters {
    pub q: f64,
    pub chi_a: Vector3<f64>,
    pub chi_b: Vector3<f64>,
}

impl BinaryParameters {
    pub fn new(q: f64, chi_a: [f64; 3], chi_b: [f64; 3]) -> Self {
        Self {
            q,
            chi_a: Vector3::from(chi_a),
            chi_b: Vector3::from(chi_b),
        }
    }

    /// Binary with spins purely along `z`.
    pub fn aligned(q: f64, chi_az: f64, chi_bz: f64) -> Self {
        Self::new(q, [0.0, 0.0, chi_az], [0.0, 0.0, chi_bz])
    }
}

/// Coordinates the regression was trained on, in the order the fits expect them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitCoordinates {
    pub log_q: f64,
    pub chi_hat: f64,
    pub chi_anti: f64,
}

impl FitCoordinates {
    pub fn as_array(&self) -> [f64; 3] {
        [self.log_q, self.chi_hat, self.chi_anti]
    }
}

/// Posterior mean and 1-sigma error of one scalar channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalarFitResult {
    pub value: f64,
    pub sigma: f64,
}

/// Complete remnant estimate.
///
/// `spin` only carries a z component and `kick` only x/y components; the other
/// slots are zero by the symmetry of the non-precessing model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemnantProperties {
    pub mass: f64,
    pub spin: Vector3<f64>,
    pub kick: Vector3<f64>,
    pub mass_err: f64,
    pub spin_err: Vector3<f64>,
    pub kick_err: Vector3<f64>,
}

impl RemnantProperties {
    /// `(mass, spin, kick, mass_err, spin_err, kick_err)`.
    #[allow(clippy::type_complexity)]
    pub fn as_tuple(
        &self,
    ) -> (f64, Vector3<f64>, Vector3<f64>, f64, Vector3<f64>, Vector3<f64>) {
        (
            self.mass,
            self.spin,
            self.kick,
            self.mass_err,
            self.spin_err,
            self.kick_err,
        )
    }
}

/// The subset of remnant quantities requested by an `OutputSelector`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "output", rename_all = "lowercase")]
pub enum RemnantOutput {
    Mass { mass: f64, mass_err: f64 },
    Spin { spin: Vector3<f64>, spin_err: Vector3<f64> },
    Kick { kick: Vector3<f64>, kick_err: Vector3<f64> },
    All(RemnantProperties),
}

impl RemnantOutput {
    pub fn selector(&self) -> OutputSelector {
        match self {
            RemnantOutput::Mass { .. } => OutputSelector::Mass,
            RemnantOutput::Spin { .. } => OutputSelector::Spin,
            RemnantOutput::Kick { .. } => OutputSelector::Kick,
            RemnantOutput::All(_) => OutputSelector::All,
        }
    }
}

/// Input parameter a range check applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeParameter {
    MassRatio,
    SpinA,
    SpinB,
}

impl RangeParameter {
    pub fn display_name(self) -> &'static str {
        match self {
            RangeParameter::MassRatio => "Mass ratio",
            RangeParameter::SpinA => "Spin magnitude of BhA",
            RangeParameter::SpinB => "Spin magnitude of BhB",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            RangeParameter::MassRatio => "q",
            RangeParameter::SpinA => "|chiAz|",
            RangeParameter::SpinB => "|chiBz|",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Inside the allowed envelope but outside the training data; the fit is
    /// extrapolating.
    TrainingRangeWarning,
}

/// A non-fatal finding raised while validating inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub parameter: RangeParameter,
    /// Checked value (`q` or `|chi_z|`).
    pub value: f64,
    /// Limit that was exceeded.
    pub limit: f64,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiagnosticKind::TrainingRangeWarning => write!(
                f,
                "{} outside training range ({} = {}, training limit {}); extrapolating.",
                self.parameter.display_name(),
                self.parameter.symbol(),
                self.value,
                self.limit
            ),
        }
    }
}

/// A computed value together with the diagnostics raised while producing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluated<T> {
    pub value: T,
    pub warnings: Vec<Diagnostic>,
}

impl<T> Evaluated<T> {
    pub fn new(value: T, warnings: Vec<Diagnostic>) -> Self {
        Self { value, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Evaluation-time options.
///
/// The 3dq8 fits recognize no options; the structure exists so that callers pass
/// options through one checked type. Building it from key/value input rejects
/// every unknown key with `FitError::UnsupportedOption`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EvalOptions {}

impl EvalOptions {
    /// Option keys accepted by `from_pairs` / `from_json`.
    pub const RECOGNIZED: &'static [&'static str] = &[];

    /// Build options from `key = value` pairs (e.g. CLI `--opt` flags).
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, FitError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
    {
        for (key, _value) in pairs {
            let key = key.as_ref();
            if !Self::RECOGNIZED.contains(&key) {
                return Err(FitError::UnsupportedOption(key.to_string()));
            }
        }
        Ok(Self::default())
    }

    /// Build options from a JSON object.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, FitError> {
        let Some(map) = value.as_object() else {
            return Err(FitError::InvalidInput(
                "Evaluation options must be a JSON object.".to_string(),
            ));
        };
        Self::from_pairs(map.iter())?;
        serde_json::from_value(value.clone())
            .map_err(|e| FitError::InvalidInput(format!("Invalid evaluation options: {e}")))
    }
}
