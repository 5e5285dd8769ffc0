//! Surrogate evaluation.
//!
//! Responsibilities:
//!
//! - validate inputs against the training / extrapolation envelope (`limits`)
//! - abstract the scalar fit collaborator (`evaluator`)
//! - assemble remnant quantities from scalar channels (`dispatch`)
//! - provide an in-memory GPR implementation of the collaborator (`gpr`)

pub mod dispatch;
pub mod evaluator;
pub mod gpr;
pub mod limits;

pub use dispatch::*;
pub use evaluator::*;
pub use gpr::*;
pub use limits::*;
