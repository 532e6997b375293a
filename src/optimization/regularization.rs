use serde::{Deserialize, Serialize};

use crate::algebra::Matrix;

/// The penalty added to the objective to keep weights small.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regularization {
    #[default]
    None,
    L1,
    L2,
}

/// Computes the regularization term of the derivative for `weights`.
///
/// # Arguments
/// * `weights` - The current weights.
/// * `scheme` - The regularization scheme.
/// * `factor` - The regularization strength.
///
/// # Returns
/// A matrix shaped like `weights`. L1 yields `+factor` for positive weights and `-factor`
/// otherwise, L2 yields `factor * weight`. Only keys present in `weights` are set.
pub fn compute_regularization(weights: &Matrix, scheme: Regularization, factor: f64) -> Matrix {
    let mut reg = weights.populate();

    let term: fn(f64, f64) -> f64 = match scheme {
        Regularization::None => return reg,
        Regularization::L1 => |w: f64, factor: f64| if w > 0. { factor } else { -factor },
        Regularization::L2 => |w: f64, factor: f64| factor * w,
    };

    for (row, reg_row) in weights.rows().zip(reg.rows_mut()) {
        for key in row.keys() {
            reg_row.set(key, term(row.get(key), factor));
        }
    }

    reg
}
