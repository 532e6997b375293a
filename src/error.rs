use std::{
    error::Error,
    fmt::{self, Display},
    io,
};

/// The result type used across the optimization engine.
pub type Result<T> = std::result::Result<T, OptimErr>;

/// The optimization engine's error type.
///
/// Contract violations inside the algebra (heterogeneous operands, mismatched label counts)
/// are programmer errors and panic instead of producing one of these.
#[derive(Debug)]
pub enum OptimErr {
    /// The configured optimizer name doesn't match any known optimizer.
    UnknownOptimizer(String),
    /// A configuration value is out of its valid range.
    InvalidConfig(&'static str),
    /// The weights norm became NaN during the run.
    Diverged { step: usize },
    /// There are no instances to train on.
    EmptyDataset,
    /// The dedicated worker pool couldn't be created.
    WorkerPool(rayon::ThreadPoolBuildError),
    /// The configuration couldn't be parsed.
    Json(serde_json::Error),
    Io(io::Error),
}

impl Display for OptimErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimErr::UnknownOptimizer(name) => {
                write!(f, "unknown optimizer name {name:?}, expected \"gd\" or \"lbfgs\"")
            }
            OptimErr::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            OptimErr::Diverged { step } => {
                write!(f, "optimization failed: does not converge (step {step})")
            }
            OptimErr::EmptyDataset => write!(f, "cannot train on an empty dataset"),
            OptimErr::WorkerPool(e) => write!(f, "failed to build worker pool: {e}"),
            OptimErr::Json(e) => write!(f, "malformed config: {e}"),
            OptimErr::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl Error for OptimErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OptimErr::WorkerPool(e) => Some(e),
            OptimErr::Json(e) => Some(e),
            OptimErr::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rayon::ThreadPoolBuildError> for OptimErr {
    fn from(value: rayon::ThreadPoolBuildError) -> Self {
        Self::WorkerPool(value)
    }
}

impl From<serde_json::Error> for OptimErr {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<io::Error> for OptimErr {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}
