//! Maximum-entropy (multinomial logistic) classification on top of the optimizers.
//!
//! Label `0` is the baseline: its weights are fixed at zero, so a model over `L` labels
//! keeps `L - 1` weight rows, row `i` holding the weights of label `i + 1`.

mod classifier;
mod trainer;

pub use classifier::{MaxEntClassifier, Prediction};
pub use trainer::MaxEntTrainer;

use crate::algebra::{Matrix, Vector, dot};

/// A labeled feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    pub features: Vector,
    pub label: usize,
}

impl Instance {
    pub fn new(features: Vector, label: usize) -> Self {
        Self { features, label }
    }
}

/// Writes the derivative of `instance`'s negative log-likelihood at `weights` into `out`.
///
/// For row `i`, `out_i = (exp(w_i · x) / z - [label == i + 1]) * x` where
/// `z = 1 + sum_j exp(w_j · x)`. Sparse rows only hold the instance's feature keys.
///
/// # Panics
/// If `out` doesn't have as many labels as `weights`, or the features aren't homogeneous
/// with the weights.
pub fn instance_derivative(weights: &Matrix, instance: &Instance, out: &mut Matrix) {
    assert_eq!(
        weights.num_labels(),
        out.num_labels(),
        "the derivative must have as many labels as the weights"
    );

    let features = &instance.features;
    let mut z = 1.;

    for (w, row) in weights.rows().zip(out.rows_mut()) {
        let exp = dot(features, w).exp();
        z += exp;

        if row.is_sparse() {
            row.clear();
            for key in features.keys() {
                row.set(key, exp);
            }
        } else {
            row.fill(exp);
        }
    }

    let inverse_z = 1. / z;
    for (i, row) in out.rows_mut().enumerate() {
        let b = if instance.label == i + 1 { -1. } else { 0. };
        row.multiply(inverse_z, b, features);
    }
}
