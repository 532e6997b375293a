use log::info;

use super::{Instance, MaxEntClassifier, instance_derivative};
use crate::{
    algebra::{Layout, Matrix},
    config::OptimizerConfig,
    data::{Cursor, Dataset},
    error::{OptimErr, Result},
    optimization::{Optimizer, OptimizerBuilder, Summary},
};

/// Trains `MaxEntClassifier`s with the configured optimizer.
#[derive(Debug, Clone)]
pub struct MaxEntTrainer {
    config: OptimizerConfig,
}

impl MaxEntTrainer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Trains a classifier on `set`.
    ///
    /// The label count is one more than the largest label seen, and the weights take the
    /// layout of the first instance's features: dense with the same width, or sparse.
    ///
    /// # Arguments
    /// * `set` - The labeled training instances.
    ///
    /// # Returns
    /// The trained classifier along with the optimizer's summary, or an error if the
    /// dataset is empty, the configuration is invalid or the optimization diverges.
    pub fn train<D>(&self, set: &D) -> Result<(MaxEntClassifier, Summary)>
    where
        D: Dataset<Instance = Instance>,
    {
        let (layout, num_labels) = inspect(set).ok_or(OptimErr::EmptyDataset)?;
        let mut optimizer = OptimizerBuilder::new().build(&self.config)?;

        let mut weights = match layout {
            Layout::Dense(width) => Matrix::dense(num_labels - 1, width),
            Layout::Sparse => Matrix::sparse(num_labels - 1),
        };

        info!(
            optimizer = optimizer.name(),
            instances = set.len(),
            labels = num_labels;
            "training max-ent classifier"
        );

        let summary = optimizer.optimize_weights(&mut weights, instance_derivative, set)?;
        Ok((MaxEntClassifier::new(weights), summary))
    }
}

/// Returns the feature layout of the first instance and the label count, `None` if `set`
/// is empty.
fn inspect<D: Dataset<Instance = Instance>>(set: &D) -> Option<(Layout, usize)> {
    let mut cursor = set.cursor();
    let layout = cursor.instance()?.features.layout();

    let mut max_label = 0;
    while let Some(instance) = cursor.instance() {
        max_label = max_label.max(instance.label);
        cursor.advance();
    }

    Some((layout, max_label.max(1) + 1))
}
