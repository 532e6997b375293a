use crate::algebra::{Matrix, Vector, dot};

/// The outcome of classifying one feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: usize,
    /// The probability of every label, summing up to 1.
    pub distribution: Vec<f64>,
}

/// A trained maximum-entropy classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct MaxEntClassifier {
    weights: Matrix,
}

impl MaxEntClassifier {
    /// Creates a new classifier from the weights of labels `1..=weights.num_labels()`.
    pub fn new(weights: Matrix) -> Self {
        Self { weights }
    }

    #[inline]
    pub fn num_labels(&self) -> usize {
        self.weights.num_labels() + 1
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    /// Returns the most probable label for `features` along with the label distribution.
    ///
    /// Ties resolve to the lowest label.
    ///
    /// # Panics
    /// If `features` isn't homogeneous with the weights.
    pub fn predict(&self, features: &Vector) -> Prediction {
        let mut distribution = Vec::with_capacity(self.num_labels());
        distribution.push(1.);

        let mut label = 0;
        let mut best = 1.;
        for (i, w) in self.weights.rows().enumerate() {
            let exp = dot(w, features).exp();
            if exp > best {
                label = i + 1;
                best = exp;
            }
            distribution.push(exp);
        }

        let z: f64 = distribution.iter().sum();
        distribution.iter_mut().for_each(|p| *p /= z);

        Prediction {
            label,
            distribution,
        }
    }
}
