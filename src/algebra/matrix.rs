use super::{Layout, Vector, vector};

/// Per-label weights: an ordered sequence of `Vector`s sharing one layout.
///
/// Operations between two matrices panic when the label counts differ, or when any pair
/// of rows is heterogeneous.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: Vec<Vector>,
    layout: Layout,
}

impl Matrix {
    /// Creates a new zero-filled dense `Matrix`.
    ///
    /// # Arguments
    /// * `labels` - The amount of rows.
    /// * `width` - The amount of values per row.
    pub fn dense(labels: usize, width: usize) -> Self {
        Self {
            rows: (0..labels).map(|_| Vector::dense(width)).collect(),
            layout: Layout::Dense(width),
        }
    }

    /// Creates a new sparse `Matrix` with `labels` empty rows.
    pub fn sparse(labels: usize) -> Self {
        Self {
            rows: (0..labels).map(|_| Vector::sparse()).collect(),
            layout: Layout::Sparse,
        }
    }

    /// Creates a new dense `Matrix` from its row values.
    ///
    /// # Panics
    /// If `rows` is empty or the rows have different lengths.
    pub fn from_values<R: AsRef<[f64]>>(rows: &[R]) -> Self {
        Self::from_rows(rows.iter().map(|r| Vector::from_values(r.as_ref())).collect())
    }

    /// Creates a new `Matrix` taking ownership of `rows`.
    ///
    /// # Panics
    /// If `rows` is empty or the rows aren't homogeneous.
    pub fn from_rows(rows: Vec<Vector>) -> Self {
        assert!(
            !rows.is_empty(),
            "a matrix built from rows needs at least one row"
        );

        let layout = rows[0].layout();
        assert!(
            rows.iter().all(|r| r.layout() == layout),
            "every row of a matrix must share the same layout"
        );

        Self { rows, layout }
    }

    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    #[inline]
    pub fn is_sparse(&self) -> bool {
        self.layout == Layout::Sparse
    }

    #[inline]
    pub fn num_labels(&self) -> usize {
        self.rows.len()
    }

    /// Returns the width of every row.
    ///
    /// # Panics
    /// If the matrix is sparse, sparse rows don't have a fixed width.
    pub fn num_values(&self) -> usize {
        match self.layout {
            Layout::Dense(width) => width,
            Layout::Sparse => panic!("num_values is undefined for a sparse matrix"),
        }
    }

    #[inline]
    pub fn row(&self, label: usize) -> &Vector {
        &self.rows[label]
    }

    #[inline]
    pub fn row_mut(&mut self, label: usize) -> &mut Vector {
        &mut self.rows[label]
    }

    pub fn rows(&self) -> impl Iterator<Item = &Vector> {
        self.rows.iter()
    }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Vector> {
        self.rows.iter_mut()
    }

    /// Returns the value at `(label, key)`, `0` if the key is missing.
    ///
    /// # Panics
    /// If `label` is out of range.
    pub fn get(&self, label: usize, key: usize) -> f64 {
        self.rows[label].get(key)
    }

    pub fn set(&mut self, label: usize, key: usize, value: f64) {
        self.rows[label].set(key, value);
    }

    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(Vector::clear);
    }

    pub fn scale(&mut self, s: f64) {
        self.rows.iter_mut().for_each(|r| r.scale(s));
    }

    /// Returns the square root of the sum of every squared entry.
    pub fn norm(&self) -> f64 {
        self.rows.iter().map(Vector::norm_squared).sum::<f64>().sqrt()
    }

    /// Returns a new zero-filled matrix with the same layout and label count.
    pub fn populate(&self) -> Self {
        Self {
            rows: self.rows.iter().map(Vector::populate).collect(),
            layout: self.layout,
        }
    }

    /// Returns `-m` as a new matrix.
    pub fn opposite(&self) -> Self {
        Self {
            rows: self.rows.iter().map(Vector::opposite).collect(),
            layout: self.layout,
        }
    }

    /// Deep copies `other` into `self`.
    pub fn copy_from(&mut self, other: &Matrix) {
        self.check_labels(other, "copy");
        self.rows
            .iter_mut()
            .zip(&other.rows)
            .for_each(|(r, o)| r.copy_from(o));
    }

    /// `m = m + alpha * other`
    pub fn increment(&mut self, other: &Matrix, alpha: f64) {
        self.check_labels(other, "increment");
        self.rows
            .iter_mut()
            .zip(&other.rows)
            .for_each(|(r, o)| r.increment(o, alpha));
    }

    /// `m = a * m1 + b * m2`
    pub fn weighted_sum(&mut self, a: f64, m1: &Matrix, b: f64, m2: &Matrix) {
        self.check_labels(m1, "weighted-sum");
        self.check_labels(m2, "weighted-sum");
        self.rows
            .iter_mut()
            .zip(m1.rows.iter().zip(&m2.rows))
            .for_each(|(r, (x, y))| r.weighted_sum(a, x, b, y));
    }

    /// Returns the sum of the per-label dot products.
    pub fn dot(&self, other: &Matrix) -> f64 {
        self.check_labels(other, "dot");
        self.rows
            .iter()
            .zip(&other.rows)
            .map(|(r, o)| vector::dot(r, o))
            .sum()
    }

    fn check_labels(&self, other: &Matrix, op: &str) {
        assert_eq!(
            self.num_labels(),
            other.num_labels(),
            "cannot {op} matrices with different label counts"
        );
    }
}

/// Returns the sum of the per-label dot products, or `0` when either matrix is absent.
pub fn matrix_dot(one: Option<&Matrix>, two: Option<&Matrix>) -> f64 {
    match (one, two) {
        (Some(one), Some(two)) => one.dot(two),
        _ => 0.,
    }
}
