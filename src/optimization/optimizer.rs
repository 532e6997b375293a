use log::{error, info};

use crate::{
    algebra::Matrix,
    data::Dataset,
    error::{OptimErr, Result},
};

/// Defines the strategy for moving the weights of a log-linear model towards a minimum.
pub trait Optimizer {
    /// Forgets every piece of state kept from previous calls, so the optimizer can be reused.
    fn clear(&mut self);

    /// Computes the step to apply to `x` given the derivative `g` at `x`.
    ///
    /// # Arguments
    /// * `x` - The current weights.
    /// * `g` - The derivative of the objective at `x`.
    ///
    /// # Returns
    /// The step direction, shaped like `x`.
    ///
    /// # Panics
    /// If `x` and `g` have different label counts.
    fn delta_x(&mut self, x: &Matrix, g: &Matrix) -> Matrix;

    /// Optimizes `weights` in place over `set`.
    ///
    /// # Arguments
    /// * `weights` - The weights to optimize.
    /// * `derivative` - Writes the derivative of one instance's objective at the given
    ///   weights into its output matrix.
    /// * `set` - The training instances.
    ///
    /// # Returns
    /// A summary of the run, or `Diverged` if the weights norm stops being finite. On
    /// `Diverged`, `weights` holds the last iterate with a finite norm.
    fn optimize_weights<D, F>(
        &mut self,
        weights: &mut Matrix,
        derivative: F,
        set: &D,
    ) -> Result<Summary>
    where
        D: Dataset,
        F: Fn(&Matrix, &D::Instance, &mut Matrix) + Sync;
}

/// The outcome of an `optimize_weights` run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Epochs for gradient descent, iterations for L-BFGS.
    pub iterations: usize,
    pub converged: bool,
    /// The last `|dw| / |w|` ratio.
    pub last_ratio: f64,
}

/// The factor turning a sum over `total` instances into their mean, 0 for an empty set.
pub(crate) fn mean_scale(total: usize) -> f64 {
    if total == 0 { 0. } else { 1. / total as f64 }
}

/// Tracks the relative weight change between iterations and decides when to stop.
#[derive(Debug)]
pub(crate) struct Convergence {
    threshold: f64,
    required: usize,
    streak: usize,
    last_ratio: f64,
    old_weights: Matrix,
    weights_delta: Matrix,
}

impl Convergence {
    /// Creates a new monitor starting from the current `weights`.
    ///
    /// # Arguments
    /// * `weights` - The weights before the first iteration.
    /// * `threshold` - The `|dw| / |w|` ratio under which an iteration is converging.
    /// * `required` - The amount of consecutive converging iterations needed to stop.
    pub fn new(weights: &Matrix, threshold: f64, required: usize) -> Self {
        Self {
            threshold,
            required,
            streak: 0,
            last_ratio: f64::INFINITY,
            old_weights: weights.clone(),
            weights_delta: weights.populate(),
        }
    }

    /// Checks the weights after iteration `step`.
    ///
    /// # Returns
    /// Whether the run converged, or `Diverged` if the weights norm isn't finite. In that
    /// case `weights` is rolled back to the previous iterate.
    pub fn check(&mut self, step: usize, weights: &mut Matrix, lr: f64) -> Result<bool> {
        let norm = weights.norm();
        if !norm.is_finite() {
            error!(step = step; "optimization failed: does not converge");
            weights.copy_from(&self.old_weights);
            return Err(OptimErr::Diverged { step });
        }

        self.weights_delta
            .weighted_sum(1., weights, -1., &self.old_weights);
        self.old_weights.copy_from(weights);
        let delta_norm = self.weights_delta.norm();

        let ratio = if delta_norm == 0. { 0. } else { delta_norm / norm };
        self.last_ratio = ratio;
        info!(step = step, ratio = ratio, norm = norm, lr = lr; "iteration done");

        if ratio < self.threshold {
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        Ok(self.streak >= self.required)
    }

    pub fn summary(&self, iterations: usize, converged: bool) -> Summary {
        Summary {
            iterations,
            converged,
            last_ratio: self.last_ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streak_must_be_consecutive() {
        let mut weights = Matrix::from_values(&[[100.]]);
        let mut monitor = Convergence::new(&weights, 0.01, 2);

        weights.set(0, 0, 100.5);
        assert!(!monitor.check(1, &mut weights, 1.).unwrap());

        weights.set(0, 0, 150.);
        assert!(!monitor.check(2, &mut weights, 1.).unwrap());

        weights.set(0, 0, 150.1);
        assert!(!monitor.check(3, &mut weights, 1.).unwrap());

        weights.set(0, 0, 150.2);
        assert!(monitor.check(4, &mut weights, 1.).unwrap());
    }

    #[test]
    fn unchanged_zero_weights_converge() {
        let mut weights = Matrix::dense(2, 2);
        let mut monitor = Convergence::new(&weights, 1e-6, 1);

        assert!(monitor.check(1, &mut weights, 1.).unwrap());
        assert_eq!(monitor.summary(1, true).last_ratio, 0.);
    }

    #[test]
    fn nan_weights_diverge_and_roll_back() {
        let mut weights = Matrix::from_values(&[[1., 2.]]);
        let mut monitor = Convergence::new(&weights, 1e-6, 3);

        weights.set(0, 0, 4.);
        assert!(!monitor.check(1, &mut weights, 1.).unwrap());

        weights.set(0, 1, f64::NAN);
        let err = monitor.check(2, &mut weights, 1.).unwrap_err();
        assert!(matches!(err, OptimErr::Diverged { step: 2 }));
        assert_eq!(weights, Matrix::from_values(&[[4., 2.]]));
    }

    #[test]
    fn infinite_weights_diverge() {
        let mut weights = Matrix::from_values(&[[1., 2.]]);
        let mut monitor = Convergence::new(&weights, 1e-6, 3);

        weights.set(0, 0, f64::NEG_INFINITY);
        let err = monitor.check(1, &mut weights, 1.).unwrap_err();
        assert!(matches!(err, OptimErr::Diverged { step: 1 }));
        assert_eq!(weights, Matrix::from_values(&[[1., 2.]]));
    }

    #[test]
    fn empty_sets_scale_to_zero() {
        assert_eq!(mean_scale(0), 0.);
        assert_eq!(mean_scale(4), 0.25);
    }
}
