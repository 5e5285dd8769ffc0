//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - physical inputs (`BinaryParameters`) and fit coordinates (`FitCoordinates`)
//! - scalar channels (`FitKey`) and output selection (`OutputSelector`)
//! - assembled results (`RemnantProperties`, `RemnantOutput`)
//! - diagnostics and evaluation options (`Diagnostic`, `Evaluated`, `EvalOptions`)

pub mod types;

pub use types::*;
