use serde::Deserialize;

use backend_domain::{FeatureMatrix, OutlierLabel, ScoringError};

use super::ArtifactError;

const ARTIFACT: &str = "isolation forest";
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone, Deserialize)]
pub struct IsolationForestArtifact {
    pub n_features: usize,
    pub max_samples: usize,
    pub offset: f64,
    pub trees: Vec<IsolationTreeArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IsolationTreeArtifact {
    /// Maps tree-local feature indices to matrix columns when the tree was
    /// grown on a feature subspace.
    #[serde(default)]
    pub features: Option<Vec<usize>>,
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        n_samples: f64,
    },
}

/// Average path length of an unsuccessful search in a binary search tree of
/// `n` samples.
pub fn average_path_length(n: f64) -> f64 {
    if n <= 1.0 {
        0.0
    } else if n <= 2.0 {
        1.0
    } else {
        2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
    }
}

#[derive(Debug, Clone)]
struct IsolationTree {
    // Node feature indices are already mapped to matrix columns.
    nodes: Vec<TreeNode>,
}

impl IsolationTree {
    /// Samples are compared at single precision, the width the exported
    /// thresholds were learned at.
    fn path_length(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        let mut depth = 0.0;
        loop {
            match self.nodes[index] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if f64::from(x[feature] as f32) <= threshold {
                        left
                    } else {
                        right
                    };
                    depth += 1.0;
                }
                TreeNode::Leaf { n_samples } => return depth + average_path_length(n_samples),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct FittedIsolationForest {
    n_features: usize,
    offset: f64,
    trees: Vec<IsolationTree>,
    // c(max_samples) times the tree count; zero when max_samples is 1.
    denominator: f64,
}

impl FittedIsolationForest {
    pub fn from_json(bytes: &[u8]) -> Result<Self, ArtifactError> {
        let artifact: IsolationForestArtifact =
            serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse {
                artifact: ARTIFACT,
                source,
            })?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: IsolationForestArtifact) -> Result<Self, ArtifactError> {
        if artifact.trees.is_empty() {
            return Err(invalid("no trees"));
        }
        if artifact.n_features == 0 {
            return Err(invalid("n_features must be at least 1"));
        }
        if artifact.max_samples == 0 {
            return Err(invalid("max_samples must be at least 1"));
        }
        if !artifact.offset.is_finite() {
            return Err(invalid("offset must be finite"));
        }

        let n_features = artifact.n_features;
        let trees = artifact
            .trees
            .into_iter()
            .enumerate()
            .map(|(index, tree)| build_tree(index, tree, n_features))
            .collect::<Result<Vec<_>, _>>()?;
        let denominator = trees.len() as f64 * average_path_length(artifact.max_samples as f64);

        Ok(Self {
            n_features,
            offset: artifact.offset,
            trees,
            denominator,
        })
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Raw anomaly score in [-1, 0); lower means more abnormal.
    pub fn score_samples(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, ScoringError> {
        self.check_width(matrix)?;
        Ok(matrix
            .rows()
            .map(|x| {
                let depths: f64 = self.trees.iter().map(|tree| tree.path_length(x)).sum();
                let ratio = if self.denominator == 0.0 {
                    1.0
                } else {
                    depths / self.denominator
                };
                -(2.0_f64.powf(-ratio))
            })
            .collect())
    }

    /// Score shifted by the fitted offset; negative values are outliers.
    pub fn decision_function(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, ScoringError> {
        Ok(self
            .score_samples(matrix)?
            .into_iter()
            .map(|score| score - self.offset)
            .collect())
    }

    pub fn predict(&self, matrix: &FeatureMatrix) -> Result<Vec<OutlierLabel>, ScoringError> {
        Ok(self
            .decision_function(matrix)?
            .into_iter()
            .map(OutlierLabel::from_decision)
            .collect())
    }

    fn check_width(&self, matrix: &FeatureMatrix) -> Result<(), ScoringError> {
        if matrix.n_cols() != self.n_features {
            return Err(ScoringError::DimensionMismatch {
                expected: self.n_features,
                actual: matrix.n_cols(),
            });
        }
        Ok(())
    }
}

fn build_tree(
    index: usize,
    tree: IsolationTreeArtifact,
    n_features: usize,
) -> Result<IsolationTree, ArtifactError> {
    if tree.nodes.is_empty() {
        return Err(invalid(format!("tree {}: no nodes", index)));
    }
    if let Some(features) = &tree.features {
        if let Some(bad) = features.iter().find(|f| **f >= n_features) {
            return Err(invalid(format!(
                "tree {}: subspace feature {} out of range for {} features",
                index, bad, n_features
            )));
        }
    }

    let node_count = tree.nodes.len();
    let mut nodes = Vec::with_capacity(node_count);
    for (position, node) in tree.nodes.into_iter().enumerate() {
        let node = match node {
            TreeNode::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                // Children always follow their parent, so descent terminates.
                if left <= position || right <= position || left >= node_count || right >= node_count
                {
                    return Err(invalid(format!(
                        "tree {} node {}: child index out of range",
                        index, position
                    )));
                }
                let column = match &tree.features {
                    Some(features) => features.get(feature).copied(),
                    None => Some(feature),
                };
                let column = match column {
                    Some(column) if column < n_features => column,
                    _ => {
                        return Err(invalid(format!(
                            "tree {} node {}: feature {} out of range",
                            index, position, feature
                        )))
                    }
                };
                if threshold.is_nan() {
                    return Err(invalid(format!(
                        "tree {} node {}: threshold is NaN",
                        index, position
                    )));
                }
                TreeNode::Split {
                    feature: column,
                    threshold,
                    left,
                    right,
                }
            }
            TreeNode::Leaf { n_samples } => {
                if !n_samples.is_finite() || n_samples < 0.0 {
                    return Err(invalid(format!(
                        "tree {} node {}: invalid leaf size {}",
                        index, position, n_samples
                    )));
                }
                node
            }
        };
        nodes.push(node);
    }
    Ok(IsolationTree { nodes })
}

fn invalid(reason: impl Into<String>) -> ArtifactError {
    ArtifactError::Invalid {
        artifact: ARTIFACT,
        reason: reason.into(),
    }
}
