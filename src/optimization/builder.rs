use super::{GradientDescent, Lbfgs, Optimizer, Summary};
use crate::{
    algebra::Matrix,
    config::OptimizerConfig,
    data::Dataset,
    error::{OptimErr, Result},
};

/// Any of the optimizers `OptimizerBuilder` can build.
#[derive(Debug, Clone)]
pub enum AnyOptimizer {
    GradientDescent(GradientDescent),
    Lbfgs(Lbfgs),
}

/// Runs `$body` with the concrete optimizer bound to `$opt`.
macro_rules! dispatch {
    ($self:expr, |$opt:ident| $body:expr) => {
        match $self {
            AnyOptimizer::GradientDescent($opt) => $body,
            AnyOptimizer::Lbfgs($opt) => $body,
        }
    };
}

impl AnyOptimizer {
    /// The name this optimizer is built from.
    pub fn name(&self) -> &'static str {
        match self {
            AnyOptimizer::GradientDescent(_) => "gd",
            AnyOptimizer::Lbfgs(_) => "lbfgs",
        }
    }
}

impl Optimizer for AnyOptimizer {
    fn clear(&mut self) {
        dispatch!(self, |opt| opt.clear())
    }

    fn delta_x(&mut self, x: &Matrix, g: &Matrix) -> Matrix {
        dispatch!(self, |opt| opt.delta_x(x, g))
    }

    fn optimize_weights<D, F>(
        &mut self,
        weights: &mut Matrix,
        derivative: F,
        set: &D,
    ) -> Result<Summary>
    where
        D: Dataset,
        F: Fn(&Matrix, &D::Instance, &mut Matrix) + Sync,
    {
        dispatch!(self, |opt| opt.optimize_weights(weights, derivative, set))
    }
}

/// Builds optimizers given a configuration.
#[derive(Debug, Default)]
pub struct OptimizerBuilder;

impl OptimizerBuilder {
    /// Creates a new `OptimizerBuilder`.
    pub fn new() -> Self {
        Self
    }

    /// Builds the optimizer named by `config`.
    ///
    /// # Arguments
    /// * `config` - The optimizer settings.
    ///
    /// # Returns
    /// A new optimizer, `UnknownOptimizer` if the name isn't `"gd"` nor `"lbfgs"` or
    /// `InvalidConfig` if a setting is out of range.
    pub fn build(&self, config: &OptimizerConfig) -> Result<AnyOptimizer> {
        config.validate()?;

        match config.name.as_str() {
            "gd" => Ok(AnyOptimizer::GradientDescent(GradientDescent::new(config))),
            "lbfgs" => Ok(AnyOptimizer::Lbfgs(Lbfgs::new(config)?)),
            name => Err(OptimErr::UnknownOptimizer(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(name: &str) -> OptimizerConfig {
        OptimizerConfig {
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn builds_by_name() {
        let builder = OptimizerBuilder::new();
        assert_eq!(builder.build(&config("gd")).unwrap().name(), "gd");
        assert_eq!(builder.build(&config("lbfgs")).unwrap().name(), "lbfgs");
    }

    #[test]
    fn unknown_name_is_an_error() {
        let err = OptimizerBuilder::new().build(&config("adam")).unwrap_err();
        assert!(matches!(err, OptimErr::UnknownOptimizer(name) if name == "adam"));
    }

    #[test]
    fn invalid_settings_are_checked_first() {
        let config = OptimizerConfig {
            name: "gd".into(),
            converging_steps: 0,
            ..Default::default()
        };
        let err = OptimizerBuilder::new().build(&config).unwrap_err();
        assert!(matches!(err, OptimErr::InvalidConfig(_)));
    }

    #[test]
    fn dispatches_delta_x() {
        let x = Matrix::from_values(&[[1., 1.]]);
        let g = Matrix::from_values(&[[2., -4.]]);

        for name in ["gd", "lbfgs"] {
            let mut opt = OptimizerBuilder::new().build(&config(name)).unwrap();
            assert_eq!(opt.delta_x(&x, &g), Matrix::from_values(&[[-2., 4.]]));
        }
    }
}
