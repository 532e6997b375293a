pub mod algebra;
pub mod config;
pub mod data;
pub mod error;
pub mod maxent;
pub mod optimization;

pub use config::OptimizerConfig;
pub use error::{OptimErr, Result};
