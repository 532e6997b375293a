mod builder;
mod gradient_descent;
mod lbfgs;
mod learning_rate;
mod optimizer;
mod regularization;

pub use builder::{AnyOptimizer, OptimizerBuilder};
pub use gradient_descent::GradientDescent;
pub use lbfgs::Lbfgs;
pub use learning_rate::LearningRate;
pub use optimizer::{Optimizer, Summary};
pub use regularization::{Regularization, compute_regularization};
