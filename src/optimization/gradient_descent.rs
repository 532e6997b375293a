use log::info;

use super::{
    Optimizer, Regularization, Summary, compute_regularization, learning_rate::LearningRate,
    optimizer::{Convergence, mean_scale},
};
use crate::{
    algebra::Matrix,
    config::OptimizerConfig,
    data::{Cursor, Dataset},
    error::Result,
};

/// Full-batch, mini-batch or stochastic gradient descent.
#[derive(Debug, Clone)]
pub struct GradientDescent {
    batch_size: usize,
    learning_rate: f64,
    characteristic_time: f64,
    max_iterations: usize,
    regularization: Regularization,
    regularization_factor: f64,
    converging_delta_weight: f64,
    converging_steps: usize,
}

impl GradientDescent {
    /// Creates a new `GradientDescent` optimizer.
    ///
    /// # Arguments
    /// * `config` - The optimizer settings, `gd_batch_size` selects the variant.
    ///
    /// # Returns
    /// A new `GradientDescent` instance.
    pub fn new(config: &OptimizerConfig) -> Self {
        Self {
            batch_size: config.gd_batch_size,
            learning_rate: config.learning_rate,
            characteristic_time: config.characteristic_time,
            max_iterations: config.max_iterations,
            regularization: config.regularization,
            regularization_factor: config.regularization_factor,
            converging_delta_weight: config.converging_delta_weight,
            converging_steps: config.converging_steps,
        }
    }

    /// Adds the regularization term for a batch of `processed` instances out of `total`
    /// and moves `weights` along the resulting direction.
    fn apply_batch(
        &mut self,
        weights: &mut Matrix,
        derivative: &mut Matrix,
        processed: usize,
        total: usize,
        lr: &mut LearningRate,
    ) -> f64 {
        let reg = compute_regularization(weights, self.regularization, self.regularization_factor);
        let total = total as f64;
        derivative.increment(&reg, processed as f64 / (total * total));

        let delta = self.delta_x(weights, derivative);
        let rate = lr.next_rate();
        weights.increment(&delta, rate);
        derivative.clear();

        rate
    }
}

impl Optimizer for GradientDescent {
    fn clear(&mut self) {}

    fn delta_x(&mut self, _x: &Matrix, g: &Matrix) -> Matrix {
        g.opposite()
    }

    fn optimize_weights<D, F>(
        &mut self,
        weights: &mut Matrix,
        derivative: F,
        set: &D,
    ) -> Result<Summary>
    where
        D: Dataset,
        F: Fn(&Matrix, &D::Instance, &mut Matrix) + Sync,
    {
        let total = set.len();
        let scale = mean_scale(total);

        let mut lr = LearningRate::new(self.learning_rate, self.characteristic_time);
        let mut monitor =
            Convergence::new(weights, self.converging_delta_weight, self.converging_steps);
        let mut accumulated = weights.populate();
        let mut instance_derivative = weights.populate();
        let mut cursor = set.cursor();
        let mut rate = self.learning_rate;
        let mut step = 0;

        info!(instances = total, batch_size = self.batch_size; "starting gradient descent");

        while self.max_iterations == 0 || step < self.max_iterations {
            step += 1;
            accumulated.clear();

            cursor.start();
            let mut processed = 0;
            while let Some(instance) = cursor.instance() {
                derivative(weights, instance, &mut instance_derivative);
                accumulated.increment(&instance_derivative, scale);
                cursor.advance();
                processed += 1;

                if self.batch_size > 0 && processed >= self.batch_size {
                    rate = self.apply_batch(weights, &mut accumulated, processed, total, &mut lr);
                    processed = 0;
                }
            }

            if processed > 0 {
                rate = self.apply_batch(weights, &mut accumulated, processed, total, &mut lr);
            }

            if monitor.check(step, weights, rate)? {
                info!(step = step; "converged");
                return Ok(monitor.summary(step, true));
            }
        }

        Ok(monitor.summary(step, false))
    }
}
