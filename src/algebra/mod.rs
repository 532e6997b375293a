mod dense;
mod matrix;
mod sparse;
mod vector;

pub use dense::DenseVector;
pub use matrix::{Matrix, matrix_dot};
pub use sparse::SparseVector;
pub use vector::{Keys, Layout, Vector, VectorOps, dot};
