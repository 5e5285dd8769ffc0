//! Shared "check" pipeline used by the CLI.
//!
//! options -> range validation -> fit coordinates
//!
//! No fit is evaluated here: this is what the binary can do without a loaded fit
//! set, and it is the part of every evaluation that can fail on user input.

use serde::Serialize;

use crate::domain::{BinaryParameters, Diagnostic, EvalOptions, FitCoordinates};
use crate::error::AppError;
use crate::fit::ParamLimits;

/// A check run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct CheckConfig {
    pub params: BinaryParameters,
    /// Raw `key=value` evaluation options.
    pub options: Vec<(String, String)>,
    pub json: bool,
    pub deny_warnings: bool,
}

/// Outputs of a single `remnant check` run.
#[derive(Debug, Clone, Serialize)]
pub struct CheckReport {
    pub params: BinaryParameters,
    pub coordinates: FitCoordinates,
    pub warnings: Vec<Diagnostic>,
}

/// Reject unknown options, validate the binary and map it to fit coordinates.
pub fn run_check(config: &CheckConfig) -> Result<CheckReport, AppError> {
    EvalOptions::from_pairs(config.options.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;

    let warnings = ParamLimits::THREE_DQ8.validate(&config.params)?;
    let coordinates = crate::models::map_parameters(&config.params);

    Ok(CheckReport {
        params: config.params,
        coordinates,
        warnings,
    })
}
