//! Mathematical utilities: covariance kernels and SPD factorisation.

pub mod kernel;
pub mod linalg;

pub use kernel::*;
pub use linalg::*;
