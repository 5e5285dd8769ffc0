//! Terminal formatting for check reports and remnant estimates.

pub mod format;

pub use format::*;
