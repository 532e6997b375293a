use std::ops::Range;

use ndarray::{Array1, ArrayView1, Zip};

use super::VectorOps;

/// A fixed-length vector whose keys are implicitly `0..len`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseVector {
    values: Array1<f64>,
}

impl DenseVector {
    /// Creates a new zero-filled `DenseVector`.
    ///
    /// # Arguments
    /// * `len` - The dimension of the vector, it can't change afterwards.
    pub fn zeros(len: usize) -> Self {
        Self {
            values: Array1::zeros(len),
        }
    }

    /// Creates a new `DenseVector` holding a copy of `values`.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            values: Array1::from_vec(values.to_vec()),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> Range<usize> {
        0..self.len()
    }

    pub fn view(&self) -> ArrayView1<'_, f64> {
        self.values.view()
    }

    /// Overwrites every value, the i-th element becomes `values[i]`.
    ///
    /// # Panics
    /// If `values` doesn't have exactly `len` elements.
    pub fn set_values(&mut self, values: &[f64]) {
        assert_eq!(
            self.len(),
            values.len(),
            "set_values got {} values for a dense vector of length {}",
            values.len(),
            self.len()
        );
        self.values.assign(&ArrayView1::from(values));
    }

    fn check_len(&self, other: &Self, op: &str) {
        assert_eq!(
            self.len(),
            other.len(),
            "{op} on dense vectors of different lengths"
        );
    }
}

impl VectorOps for DenseVector {
    fn get(&self, key: usize) -> f64 {
        self.values.get(key).copied().unwrap_or(0.)
    }

    /// # Panics
    /// If `key` is out of range.
    fn set(&mut self, key: usize, value: f64) {
        self.values[key] = value;
    }

    fn clear(&mut self) {
        self.values.fill(0.);
    }

    fn fill(&mut self, value: f64) {
        self.values.fill(value);
    }

    fn scale(&mut self, s: f64) {
        self.values *= s;
    }

    fn norm_squared(&self) -> f64 {
        self.values.dot(&self.values)
    }

    fn populate(&self) -> Self {
        Self::zeros(self.len())
    }

    fn opposite(&self) -> Self {
        Self {
            values: -&self.values,
        }
    }

    fn copy_from(&mut self, other: &Self) {
        self.check_len(other, "copy_from");
        self.values.assign(&other.values);
    }

    fn increment(&mut self, other: &Self, alpha: f64) {
        self.check_len(other, "increment");
        self.values.scaled_add(alpha, &other.values);
    }

    fn weighted_sum(&mut self, a: f64, v1: &Self, b: f64, v2: &Self) {
        self.check_len(v1, "weighted_sum");
        self.check_len(v2, "weighted_sum");
        Zip::from(&mut self.values)
            .and(&v1.values)
            .and(&v2.values)
            .for_each(|v, &x, &y| *v = a * x + b * y);
    }

    fn multiply(&mut self, a: f64, b: f64, other: &Self) {
        self.check_len(other, "multiply");
        Zip::from(&mut self.values)
            .and(&other.values)
            .for_each(|v, &o| *v = (*v * a + b) * o);
    }

    fn dot(&self, other: &Self) -> f64 {
        self.check_len(other, "dot");
        self.values.dot(&other.values)
    }
}
