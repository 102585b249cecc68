//! Reporting utilities: price ranges and formatted terminal output.
//!
//! We keep formatting code in one place so the pipeline stays free of
//! presentation concerns.

pub mod format;
pub mod range;

pub use format::*;
pub use range::*;
