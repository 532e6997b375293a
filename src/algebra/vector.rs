use std::{iter::Copied, ops::Range, slice};

use super::{DenseVector, SparseVector};

/// The algebra contract shared by both value-storage strategies.
///
/// Binary operations assume homogeneous operands, `Vector` is the one place where that
/// is checked.
pub trait VectorOps: Clone {
    /// Returns the value of `key`, absent or out of range keys read as `0`.
    fn get(&self, key: usize) -> f64;
    fn set(&mut self, key: usize, value: f64);

    /// Resets every value to `0`.
    fn clear(&mut self);

    /// Sets every existing entry to `value`.
    fn fill(&mut self, value: f64);

    /// `v = s * v`
    fn scale(&mut self, s: f64);
    fn norm_squared(&self) -> f64;

    /// Returns the Euclidean norm.
    fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    /// Returns a new zero vector with the same layout.
    fn populate(&self) -> Self;

    /// Returns `-v` as a new vector.
    fn opposite(&self) -> Self;
    fn copy_from(&mut self, other: &Self);

    /// `v = v + alpha * other`
    fn increment(&mut self, other: &Self, alpha: f64);

    /// `v = a * v1 + b * v2`
    fn weighted_sum(&mut self, a: f64, v1: &Self, b: f64, v2: &Self);

    /// `v_i = (v_i * a + b) * other_i`
    fn multiply(&mut self, a: f64, b: f64, other: &Self);
    fn dot(&self, other: &Self) -> f64;
}

/// The storage strategy of a `Vector`, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Dense(usize),
    Sparse,
}

/// A vector that is either dense or sparse.
///
/// Binary operations panic unless both operands share the same `Layout`.
#[derive(Debug, Clone, PartialEq)]
pub enum Vector {
    Dense(DenseVector),
    Sparse(SparseVector),
}

/// Runs `$body` with both operands unwrapped after the homogeneity guard.
macro_rules! homogeneous {
    ($op:literal, $lhs:expr, $rhs:expr, |$a:ident, $b:ident| $body:expr) => {{
        let (left, right) = ($lhs, $rhs);
        assert_homogeneous($op, left.layout(), right.layout());
        match (left, right) {
            (Vector::Dense($a), Vector::Dense($b)) => $body,
            (Vector::Sparse($a), Vector::Sparse($b)) => $body,
            _ => unreachable!(),
        }
    }};
}

fn assert_homogeneous(op: &str, lhs: Layout, rhs: Layout) {
    assert!(
        lhs == rhs,
        "cannot {op} heterogeneous vectors: {lhs:?} and {rhs:?}"
    );
}

impl Vector {
    /// Creates a new zero-filled dense vector of length `len`.
    pub fn dense(len: usize) -> Self {
        Self::Dense(DenseVector::zeros(len))
    }

    /// Creates a new empty sparse vector.
    pub fn sparse() -> Self {
        Self::Sparse(SparseVector::new())
    }

    /// Creates a new dense vector holding a copy of `values`.
    pub fn from_values(values: &[f64]) -> Self {
        Self::Dense(DenseVector::from_slice(values))
    }

    pub fn layout(&self) -> Layout {
        match self {
            Vector::Dense(v) => Layout::Dense(v.len()),
            Vector::Sparse(_) => Layout::Sparse,
        }
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, Vector::Sparse(_))
    }

    /// Returns whether `self` and `other` can be combined: same layout and, when dense,
    /// the same length.
    pub fn is_homogeneous(&self, other: &Vector) -> bool {
        self.layout() == other.layout()
    }

    /// Iterates the keys holding values, `0..len` for dense vectors.
    pub fn keys(&self) -> Keys<'_> {
        match self {
            Vector::Dense(v) => Keys::Dense(v.keys()),
            Vector::Sparse(v) => Keys::Sparse(v.keys().iter().copied()),
        }
    }

    /// Overwrites the vector so that key `i` holds `values[i]`.
    ///
    /// # Panics
    /// For dense vectors whose length differs from `values.len()`.
    pub fn set_values(&mut self, values: &[f64]) {
        match self {
            Vector::Dense(v) => v.set_values(values),
            Vector::Sparse(v) => v.set_values(values),
        }
    }

    pub fn get(&self, key: usize) -> f64 {
        match self {
            Vector::Dense(v) => v.get(key),
            Vector::Sparse(v) => v.get(key),
        }
    }

    /// # Panics
    /// For dense vectors, if `key` is out of range.
    pub fn set(&mut self, key: usize, value: f64) {
        match self {
            Vector::Dense(v) => v.set(key, value),
            Vector::Sparse(v) => v.set(key, value),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Vector::Dense(v) => v.clear(),
            Vector::Sparse(v) => v.clear(),
        }
    }

    pub fn fill(&mut self, value: f64) {
        match self {
            Vector::Dense(v) => v.fill(value),
            Vector::Sparse(v) => v.fill(value),
        }
    }

    pub fn scale(&mut self, s: f64) {
        match self {
            Vector::Dense(v) => v.scale(s),
            Vector::Sparse(v) => v.scale(s),
        }
    }

    pub fn norm_squared(&self) -> f64 {
        match self {
            Vector::Dense(v) => v.norm_squared(),
            Vector::Sparse(v) => v.norm_squared(),
        }
    }

    pub fn norm(&self) -> f64 {
        self.norm_squared().sqrt()
    }

    pub fn populate(&self) -> Self {
        match self {
            Vector::Dense(v) => Vector::Dense(v.populate()),
            Vector::Sparse(v) => Vector::Sparse(v.populate()),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Vector::Dense(v) => Vector::Dense(v.opposite()),
            Vector::Sparse(v) => Vector::Sparse(v.opposite()),
        }
    }

    /// Deep copies `other` into `self`.
    pub fn copy_from(&mut self, other: &Vector) {
        homogeneous!("copy", self, other, |a, b| a.copy_from(b))
    }

    pub fn increment(&mut self, other: &Vector, alpha: f64) {
        homogeneous!("increment", self, other, |a, b| a.increment(b, alpha))
    }

    pub fn multiply(&mut self, a: f64, b: f64, other: &Vector) {
        homogeneous!("multiply", self, other, |v, o| v.multiply(a, b, o))
    }

    pub fn weighted_sum(&mut self, a: f64, v1: &Vector, b: f64, v2: &Vector) {
        assert_homogeneous("weighted-sum", self.layout(), v1.layout());
        assert_homogeneous("weighted-sum", self.layout(), v2.layout());

        match (self, v1, v2) {
            (Vector::Dense(v), Vector::Dense(x), Vector::Dense(y)) => v.weighted_sum(a, x, b, y),
            (Vector::Sparse(v), Vector::Sparse(x), Vector::Sparse(y)) => {
                v.weighted_sum(a, x, b, y)
            }
            _ => unreachable!(),
        }
    }
}

/// Returns the dot product `v1 · v2`.
///
/// For sparse vectors only the keys of `v1` are visited.
///
/// # Panics
/// If the operands are heterogeneous.
pub fn dot(v1: &Vector, v2: &Vector) -> f64 {
    homogeneous!("dot", v1, v2, |a, b| a.dot(b))
}

/// Iterator over the keys of a `Vector`.
#[derive(Debug, Clone)]
pub enum Keys<'a> {
    Dense(Range<usize>),
    Sparse(Copied<slice::Iter<'a, usize>>),
}

impl Iterator for Keys<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            Keys::Dense(keys) => keys.next(),
            Keys::Sparse(keys) => keys.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Keys::Dense(keys) => keys.size_hint(),
            Keys::Sparse(keys) => keys.size_hint(),
        }
    }
}
