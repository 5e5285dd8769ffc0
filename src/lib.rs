//! `bh-remnant` library crate.
//!
//! Evaluates the 3dq8 Gaussian process surrogate for the remnant of a
//! non-precessing binary black hole merger: final mass, final spin and recoil
//! kick, each with a 1-sigma error estimate.
//!
//! Inputs are the mass ratio `q = m_A / m_B >= 1` and the dimensionless spins
//! `chi_a`, `chi_b` (z components only). The fits were trained on
//! `q <= 8, |chi_z| <= 0.8` and extrapolate to `q <= 10, |chi_z| <= 1`; outside
//! the training box results carry `TrainingRangeWarning` diagnostics.
//!
//! Vectors live in the coorbital frame at `t = -100 M` from the waveform peak:
//! `z` along the orbital angular momentum, `x` from the smaller to the larger
//! black hole, `y` completing the triad.
//!
//! The scalar fits themselves are a collaborator behind `fit::FitEvaluator`;
//! `fit::GprFitSet` is an in-memory implementation.
//!
//! The binary (`remnant`) is a thin wrapper around this library.

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fit;
pub mod logging;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{
    BinaryParameters, Diagnostic, DiagnosticKind, EvalOptions, Evaluated, FitCoordinates, FitKey,
    OutputSelector, RemnantOutput, RemnantProperties, ScalarFitResult,
};
pub use error::FitError;
pub use fit::{FitEvaluator, FitSource, LoadedFits, ParamLimits, RemnantModel, ScalarFit};
