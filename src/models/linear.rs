//! Linear regression: `y = intercept + Σ cᵢ xᵢ`.

use nalgebra::DVectorView;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearModel {
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Caller guarantees `x.len() == self.n_features()`.
    pub fn predict(&self, x: &[f64]) -> f64 {
        let coef = DVectorView::from_slice(&self.coefficients, self.coefficients.len());
        let x = DVectorView::from_slice(x, x.len());
        self.intercept + coef.dot(&x)
    }

    pub fn check(&self) -> Result<(), String> {
        if !self.intercept.is_finite() {
            return Err("linear intercept is not finite".to_string());
        }
        if let Some(i) = self.coefficients.iter().position(|c| !c.is_finite()) {
            return Err(format!("linear coefficient {i} is not finite"));
        }
        Ok(())
    }
}
