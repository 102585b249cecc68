//! Gradient-boosted regression trees (XGBoost-style).
//!
//! Prediction is `base_score + Σ leaf(tree, x)`. Each tree is a flat node
//! array rooted at index 0; a split sends `x[feature] < threshold` left, and a
//! NaN input follows `default_left`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsemble {
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
        #[serde(default = "default_left")]
        default_left: bool,
    },
    Leaf {
        leaf: f64,
    },
}

fn default_left() -> bool {
    true
}

impl TreeEnsemble {
    pub fn predict(&self, x: &[f64]) -> f64 {
        self.base_score + self.trees.iter().map(|t| t.predict(x)).sum::<f64>()
    }

    /// Highest feature index referenced by any split, if any.
    #[cfg(test)]
    fn max_feature(&self) -> Option<usize> {
        self.trees
            .iter()
            .flat_map(|t| t.nodes.iter())
            .filter_map(|n| match n {
                Node::Split { feature, .. } => Some(*feature),
                Node::Leaf { .. } => None,
            })
            .max()
    }

    /// Structural checks so `predict` can index without bounds failures and
    /// always terminates.
    pub fn check(&self, n_features: usize) -> Result<(), String> {
        if !self.base_score.is_finite() {
            return Err("base_score is not finite".to_string());
        }
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.check(n_features).map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(())
    }
}

impl Tree {
    fn predict(&self, x: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { leaf } => return *leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let v = x[*feature];
                    let go_left = if v.is_nan() { *default_left } else { v < *threshold };
                    idx = if go_left { *left } else { *right };
                }
            }
        }
    }

    // Children must point forward, which rules out cycles.
    fn check(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        let n = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {i}: leaf value is not finite"));
                    }
                }
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if *feature >= n_features {
                        return Err(format!(
                            "node {i}: feature {feature} out of range (model has {n_features} features)"
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {i}: threshold is NaN"));
                    }
                    for child in [*left, *right] {
                        if child <= i || child >= n {
                            return Err(format!("node {i}: invalid child index {child}"));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
