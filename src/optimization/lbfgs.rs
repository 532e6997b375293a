use log::info;
use rayon::{ThreadPoolBuilder, prelude::*};

use super::{
    Optimizer, Regularization, Summary, compute_regularization, learning_rate::LearningRate,
    optimizer::{Convergence, mean_scale},
};
use crate::{
    algebra::{Matrix, matrix_dot},
    config::{OptimizerConfig, check_history_size},
    data::{Cursor, Dataset, interleaved},
    error::Result,
};

/// The last `size` steps of an L-BFGS run, stored circularly.
///
/// For step `i`: `xs` and `gs` hold `x_i` and `g_i`, `ss` holds `s_i = x_(i+1) - x_i`,
/// `ys` holds `y_i = g_(i+1) - g_i` and `ro` holds `1 / (y_i · s_i)`, or 0 when that isn't
/// finite so the pair drops out of the recursion.
#[derive(Debug, Clone, Default)]
struct History {
    size: usize,
    xs: Vec<Matrix>,
    gs: Vec<Matrix>,
    ss: Vec<Matrix>,
    ys: Vec<Matrix>,
    ro: Vec<f64>,
    alpha: Vec<f64>,
}

impl History {
    /// Allocates `size` zeroed slots shaped like `x`.
    fn new(size: usize, x: &Matrix) -> Self {
        let zeros = x.populate();
        Self {
            size,
            xs: vec![zeros.clone(); size],
            gs: vec![zeros.clone(); size],
            ss: vec![zeros.clone(); size],
            ys: vec![zeros; size],
            ro: vec![0.; size],
            alpha: vec![0.; size],
        }
    }

    #[inline]
    fn slot(&self, step: usize) -> usize {
        step % self.size
    }
}

/// Limited-memory BFGS.
///
/// Only the last `lbfgs_history_size` steps are kept to approximate the inverse Hessian,
/// following Nocedal, J. (1980). "Updating Quasi-Newton Matrices with Limited Storage".
///
/// The derivative of each iteration is computed by a pool of workers, each one streaming an
/// interleaved shard of the dataset.
#[derive(Debug, Clone)]
pub struct Lbfgs {
    k: usize,
    history: History,
    history_size: usize,
    workers: usize,
    learning_rate: f64,
    characteristic_time: f64,
    max_iterations: usize,
    regularization: Regularization,
    regularization_factor: f64,
    converging_delta_weight: f64,
    converging_steps: usize,
}

impl Lbfgs {
    /// Creates a new `Lbfgs` optimizer.
    ///
    /// # Arguments
    /// * `config` - The optimizer settings.
    ///
    /// # Returns
    /// A new `Lbfgs` instance, or `InvalidConfig` if the history size is less than 2.
    pub fn new(config: &OptimizerConfig) -> Result<Self> {
        config.validate()?;
        check_history_size(config.lbfgs_history_size)?;

        Ok(Self {
            k: 0,
            history: History::default(),
            history_size: config.lbfgs_history_size,
            workers: config.workers,
            learning_rate: config.learning_rate,
            characteristic_time: config.characteristic_time,
            max_iterations: config.max_iterations,
            regularization: config.regularization,
            regularization_factor: config.regularization_factor,
            converging_delta_weight: config.converging_delta_weight,
            converging_steps: config.converging_steps,
        })
    }

    /// The amount of `delta_x` calls since the last `clear`.
    pub fn step(&self) -> usize {
        self.k
    }
}

impl Optimizer for Lbfgs {
    fn clear(&mut self) {
        self.k = 0;
    }

    fn delta_x(&mut self, x: &Matrix, g: &Matrix) -> Matrix {
        assert_eq!(
            x.num_labels(),
            g.num_labels(),
            "x and g must have the same label count"
        );

        let k = self.k;
        if k == 0 {
            self.history = History::new(self.history_size, x);
        }

        let h = &mut self.history;
        let curr = h.slot(k);
        h.xs[curr].copy_from(x);
        h.gs[curr].copy_from(g);

        if k == 0 {
            self.k += 1;
            return g.opposite();
        }

        let prev = h.slot(k - 1);
        h.ss[prev].weighted_sum(1., &h.xs[curr], -1., &h.xs[prev]);
        h.ys[prev].weighted_sum(1., &h.gs[curr], -1., &h.gs[prev]);
        let ro = 1. / matrix_dot(Some(&h.ys[prev]), Some(&h.ss[prev]));
        h.ro[prev] = if ro.is_finite() { ro } else { 0. };

        let lower = k.saturating_sub(h.size);

        let mut q = g.clone();
        for i in (lower..k).rev() {
            let j = h.slot(i);
            h.alpha[j] = h.ro[j] * h.ss[j].dot(&q);
            q.increment(&h.ys[j], -h.alpha[j]);
        }

        let mut z = q;
        for i in lower..k {
            let j = h.slot(i);
            let beta = h.ro[j] * h.ys[j].dot(&z);
            z.increment(&h.ss[j], h.alpha[j] - beta);
        }

        self.k += 1;
        z.opposite()
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
        let pool = ThreadPoolBuilder::new().num_threads(self.workers).build()?;
        let workers = pool.current_num_threads();

        let total = set.len();
        let scale = mean_scale(total);
        let shards = interleaved(set, workers);
        let mut partials: Vec<Matrix> = (0..workers).map(|_| weights.populate()).collect();
        let mut scratch: Vec<Matrix> = (0..workers).map(|_| weights.populate()).collect();

        self.clear();
        let mut lr = LearningRate::new(self.learning_rate, self.characteristic_time);
        let mut monitor =
            Convergence::new(weights, self.converging_delta_weight, self.converging_steps);
        let mut gradient = weights.populate();
        let mut step = 0;

        info!(instances = total, workers = workers, history_size = self.history_size; "starting L-BFGS");

        while self.max_iterations == 0 || step < self.max_iterations {
            step += 1;

            let current: &Matrix = weights;
            pool.install(|| {
                shards
                    .par_iter()
                    .zip(partials.par_iter_mut())
                    .zip(scratch.par_iter_mut())
                    .for_each(|((shard, partial), instance_derivative)| {
                        partial.clear();
                        let mut cursor = shard.cursor();
                        while let Some(instance) = cursor.instance() {
                            derivative(current, instance, instance_derivative);
                            partial.increment(instance_derivative, scale);
                            cursor.advance();
                        }
                    });
            });

            gradient.clear();
            for partial in &partials {
                gradient.increment(partial, 1.);
            }

            let reg = compute_regularization(weights, self.regularization, self.regularization_factor);
            gradient.increment(&reg, scale);

            let delta = self.delta_x(weights, &gradient);
            let rate = lr.next_rate();
            weights.increment(&delta, rate);

            if monitor.check(step, weights, rate)? {
                info!(step = step; "converged");
                return Ok(monitor.summary(step, true));
            }
        }

        Ok(monitor.summary(step, false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{data::InMemoryDataset, optimization::GradientDescent};

    fn lbfgs() -> Lbfgs {
        Lbfgs::new(&OptimizerConfig::default()).unwrap()
    }

    fn quartic_gradient(x: &Matrix, g: &mut Matrix) {
        for key in 0..2 {
            g.set(0, key, 4. * x.get(0, key).powi(3));
        }
    }

    #[test]
    fn first_step_matches_gradient_descent() {
        let x = Matrix::from_values(&[[1., 0.3], [-2., 0.5]]);
        let g = Matrix::from_values(&[[0.1, -0.7], [3.3, 1e-9]]);

        let mut opt = lbfgs();
        let mut gd = GradientDescent::new(&OptimizerConfig::default());
        assert_eq!(opt.delta_x(&x, &g), gd.delta_x(&x, &g));
        assert_eq!(opt.step(), 1);
    }

    #[test]
    fn clear_restarts_from_gradient_descent() {
        let mut opt = lbfgs();
        let mut x = Matrix::from_values(&[[1., 0.3]]);
        let mut g = x.populate();

        for _ in 0..4 {
            quartic_gradient(&x, &mut g);
            let delta = opt.delta_x(&x, &g);
            x.increment(&delta, 1.);
        }

        opt.clear();
        assert_eq!(opt.step(), 0);

        quartic_gradient(&x, &mut g);
        assert_eq!(opt.delta_x(&x, &g), g.opposite());
    }

    #[test]
    fn quartic_minimum() {
        let mut opt = lbfgs();
        let mut x = Matrix::from_values(&[[1., 0.3]]);
        let mut g = x.populate();

        let mut steps = 0;
        loop {
            quartic_gradient(&x, &mut g);
            let delta = opt.delta_x(&x, &g);
            x.increment(&delta, 1.);
            steps += 1;

            if delta.norm() < 1e-4 {
                break;
            }
            assert!(steps < 500, "L-BFGS didn't reach the minimum");
        }

        assert!(x.get(0, 0).abs() < 0.01);
        assert!(x.get(0, 1).abs() < 0.01);
    }

    #[test]
    fn quartic_minimum_on_sparse_weights() {
        let mut opt = lbfgs();
        let mut x = Matrix::sparse(1);
        x.set(0, 0, 1.);
        x.set(0, 1, 0.3);
        let mut g = Matrix::sparse(1);

        for _ in 0..500 {
            quartic_gradient(&x, &mut g);
            let delta = opt.delta_x(&x, &g);
            x.increment(&delta, 1.);
            if delta.norm() < 1e-4 {
                break;
            }
        }

        assert!(x.get(0, 0).abs() < 0.01);
        assert!(x.get(0, 1).abs() < 0.01);
    }

    #[test]
    #[should_panic(expected = "same label count")]
    fn mismatched_labels_panic() {
        lbfgs().delta_x(&Matrix::dense(2, 2), &Matrix::dense(1, 2));
    }

    #[test]
    fn history_of_one_is_rejected() {
        let config = OptimizerConfig {
            lbfgs_history_size: 1,
            ..Default::default()
        };
        assert!(Lbfgs::new(&config).is_err());
    }

    fn mean_derivative(w: &Matrix, target: &f64, out: &mut Matrix) {
        out.set(0, 0, w.get(0, 0) - target);
    }

    /// `f(w) = mean((w - t)^2) / 2` is minimized by the mean of the targets in one step.
    fn fit_mean(workers: usize) -> (Matrix, Summary) {
        let set = InMemoryDataset::new(vec![1., 2., 3., 6.]);
        let config = OptimizerConfig {
            workers,
            max_iterations: 10,
            ..Default::default()
        };

        let mut weights = Matrix::dense(1, 1);
        let summary = Lbfgs::new(&config)
            .unwrap()
            .optimize_weights(&mut weights, mean_derivative, &set)
            .unwrap();

        (weights, summary)
    }

    #[test]
    fn optimize_quadratic() {
        let (weights, summary) = fit_mean(1);
        assert_eq!(weights.get(0, 0), 3.);
        assert!(summary.converged);
        assert_eq!(summary.iterations, 4);
        assert_eq!(summary.last_ratio, 0.);
    }

    #[test]
    fn zero_step_pairs_are_skipped() {
        let mut opt = lbfgs();
        let x = Matrix::from_values(&[[3.]]);
        let g = Matrix::dense(1, 1);

        for _ in 0..4 {
            let delta = opt.delta_x(&x, &g);
            assert_eq!(delta.get(0, 0), 0.);
        }
        assert!(opt.history.ro.iter().all(|ro| *ro == 0.));
    }

    #[test]
    fn starting_at_the_minimum_converges() {
        let set = InMemoryDataset::new(vec![3., 3.]);
        let mut weights = Matrix::from_values(&[[3.]]);

        let summary = lbfgs()
            .optimize_weights(&mut weights, mean_derivative, &set)
            .unwrap();

        assert!(summary.converged);
        assert_eq!(summary.iterations, 3);
        assert_eq!(weights.get(0, 0), 3.);
    }

    #[test]
    fn empty_dataset_keeps_weights() {
        let set = InMemoryDataset::<f64>::new(Vec::new());
        let config = OptimizerConfig {
            regularization: Regularization::L2,
            max_iterations: 5,
            ..Default::default()
        };
        let mut weights = Matrix::from_values(&[[0.5, -1.]]);

        let summary = Lbfgs::new(&config)
            .unwrap()
            .optimize_weights(&mut weights, mean_derivative, &set)
            .unwrap();

        assert!(summary.converged);
        assert_eq!(summary.iterations, 3);
        assert_eq!(weights, Matrix::from_values(&[[0.5, -1.]]));
    }

    #[test]
    fn worker_count_does_not_change_the_result() {
        let (single, _) = fit_mean(1);
        for workers in [2, 3, 4, 7] {
            let (multi, summary) = fit_mean(workers);
            assert_eq!(multi, single);
            assert!(summary.converged);
        }
    }
}
