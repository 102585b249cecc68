//! Input/output helpers.
//!
//! - model/encoder artifact loading (`artifacts`)
//! - property input files (`input`)
//! - prediction report exports (`export`)

pub mod artifacts;
pub mod export;
pub mod input;

pub use artifacts::{ArtifactError, Artifacts};
pub use export::*;
pub use input::*;
