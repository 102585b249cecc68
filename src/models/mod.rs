//! Regression models and property-type model selection.
//!
//! Two regressor families are supported, both evaluated as small pure
//! functions over a feature row:
//!
//! - `linear`: intercept + coefficients
//! - `tree`: gradient-boosted tree ensembles

pub mod linear;
pub mod model;
pub mod tree;

pub use model::*;
