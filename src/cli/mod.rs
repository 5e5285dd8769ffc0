//! Command-line parsing for the remnant surrogate.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! validation and evaluation code.

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "remnant", version, about = "Binary black hole remnant surrogate (3dq8)")]
pub struct Cli {
    /// Log filter directive (e.g. `debug`, `bh_remnant=trace`). Overrides `REMNANT_LOG`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate a binary against the fit's training/extrapolation range and print
    /// its fit coordinates.
    Check(CheckArgs),
}

/// Options for checking a binary.
#[derive(Debug, Parser, Clone)]
pub struct CheckArgs {
    /// Mass ratio `q = m_A / m_B >= 1`.
    #[arg(short, long)]
    pub q: f64,

    /// Spin of the heavier black hole, `x,y,z` (x and y must be zero).
    #[arg(
        long = "chi-a",
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = [0.0, 0.0, 0.0]
    )]
    pub chi_a: Vec<f64>,

    /// Spin of the lighter black hole, `x,y,z` (x and y must be zero).
    #[arg(
        long = "chi-b",
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = [0.0, 0.0, 0.0]
    )]
    pub chi_b: Vec<f64>,

    /// Evaluation option `KEY=VALUE` (repeatable). The 3dq8 fits accept none.
    #[arg(long = "opt", value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Exit with a non-zero status when any training-range warning is raised.
    #[arg(long)]
    pub deny_warnings: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_check_with_negative_spin() {
        let cli = Cli::parse_from([
            "remnant", "check", "-q", "4.3", "--chi-a", "0,0,0.6", "--chi-b", "0,0,-0.7",
        ]);
        let Command::Check(args) = cli.command;
        assert_eq!(args.q, 4.3);
        assert_eq!(args.chi_a, vec![0.0, 0.0, 0.6]);
        assert_eq!(args.chi_b, vec![0.0, 0.0, -0.7]);
        assert!(args.options.is_empty());
    }

    #[test]
    fn spins_default_to_zero() {
        let cli = Cli::parse_from(["remnant", "check", "--q", "2", "--opt", "foo=1", "--json"]);
        let Command::Check(args) = cli.command;
        assert_eq!(args.chi_a, vec![0.0, 0.0, 0.0]);
        assert_eq!(args.chi_b, vec![0.0, 0.0, 0.0]);
        assert_eq!(args.options, vec!["foo=1".to_string()]);
        assert!(args.json);
    }
}
