//! Parameter mapping for the 3dq8 surrogate.
//!
//! Kept as small, pure functions so validation and dispatch code stay generic.

pub mod mapper;

pub use mapper::*;
