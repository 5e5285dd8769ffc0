//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - runs the check pipeline
//! - prints the report

use clap::Parser;

use crate::cli::{CheckArgs, Command};
use crate::domain::BinaryParameters;
use crate::error::AppError;

pub mod pipeline;

use pipeline::CheckConfig;

/// Entry point for the `remnant` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init_tracing(cli.log_level.as_deref())?;

    match cli.command {
        Command::Check(args) => handle_check(args),
    }
}

fn handle_check(args: CheckArgs) -> Result<(), AppError> {
    let config = check_config_from_args(&args)?;
    let report = pipeline::run_check(&config)?;

    if config.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| AppError::new(4, format!("Failed to serialize report: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", crate::report::format_check_report(&report));
    }

    if config.deny_warnings && !report.warnings.is_empty() {
        return Err(AppError::new(
            1,
            format!("{} training-range warning(s) raised.", report.warnings.len()),
        ));
    }
    Ok(())
}

pub fn check_config_from_args(args: &CheckArgs) -> Result<CheckConfig, AppError> {
    let chi_a = spin_from_arg(&args.chi_a, "--chi-a")?;
    let chi_b = spin_from_arg(&args.chi_b, "--chi-b")?;
    let options = args
        .options
        .iter()
        .map(|raw| parse_option(raw))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CheckConfig {
        params: BinaryParameters::new(args.q, chi_a, chi_b),
        options,
        json: args.json,
        deny_warnings: args.deny_warnings,
    })
}

fn spin_from_arg(values: &[f64], flag: &str) -> Result<[f64; 3], AppError> {
    <[f64; 3]>::try_from(values).map_err(|_| {
        AppError::new(
            2,
            format!("{flag} expects three comma-separated components, got {}.", values.len()),
        )
    })
}

/// `key=value`; a bare `key` is read as `key=true`.
fn parse_option(raw: &str) -> Result<(String, String), AppError> {
    let (key, value) = raw.split_once('=').unwrap_or((raw, "true"));
    let key = key.trim();
    if key.is_empty() {
        return Err(AppError::new(2, format!("Invalid option '{raw}': expected KEY=VALUE.")));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(chi_a: Vec<f64>, options: Vec<&str>) -> CheckArgs {
        CheckArgs {
            q: 4.3,
            chi_a,
            chi_b: vec![0.0, 0.0, -0.7],
            options: options.into_iter().map(String::from).collect(),
            json: false,
            deny_warnings: true,
        }
    }

    #[test]
    fn config_from_args() {
        let config =
            check_config_from_args(&args(vec![0.0, 0.0, 0.6], vec!["foo=1", "bar"])).unwrap();
        assert_eq!(config.params, BinaryParameters::aligned(4.3, 0.6, -0.7));
        assert_eq!(
            config.options,
            vec![("foo".to_string(), "1".to_string()), ("bar".to_string(), "true".to_string())]
        );
        assert!(config.deny_warnings);
    }

    #[test]
    fn spin_needs_three_components() {
        let err = check_config_from_args(&args(vec![0.6], vec![])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("--chi-a"));
    }

    #[test]
    fn empty_option_key_is_rejected() {
        let err = check_config_from_args(&args(vec![0.0, 0.0, 0.6], vec!["=1"])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
