use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{OptimErr, Result},
    optimization::Regularization,
};

/// Settings shared by every optimizer.
///
/// Missing JSON fields take their `Default` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Either `"gd"` or `"lbfgs"`.
    pub name: String,
    pub regularization: Regularization,
    pub regularization_factor: f64,
    pub learning_rate: f64,
    /// `0` keeps the learning rate constant.
    pub characteristic_time: f64,
    /// `0` means unbounded.
    pub max_iterations: usize,
    /// Threshold on `|dw| / |w|` below which an iteration counts as converging.
    pub converging_delta_weight: f64,
    /// Consecutive converging iterations needed to stop.
    pub converging_steps: usize,
    /// Instances per weight update: `0` for full batch, `1` for stochastic gradient descent.
    pub gd_batch_size: usize,
    pub lbfgs_history_size: usize,
    /// `0` uses all the available parallelism.
    pub workers: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            name: "lbfgs".into(),
            regularization: Regularization::None,
            regularization_factor: 1.,
            learning_rate: 1.,
            characteristic_time: 0.,
            max_iterations: 0,
            converging_delta_weight: 1e-6,
            converging_steps: 3,
            gd_batch_size: 0,
            lbfgs_history_size: 5,
            workers: 0,
        }
    }
}

impl OptimizerConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks every value is within its valid range.
    ///
    /// # Returns
    /// An `InvalidConfig` error naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0. {
            return Err(OptimErr::InvalidConfig("learning_rate must be positive"));
        }

        if self.characteristic_time.is_nan() || self.characteristic_time < 0. {
            return Err(OptimErr::InvalidConfig(
                "characteristic_time must not be negative",
            ));
        }

        if !self.regularization_factor.is_finite() || self.regularization_factor < 0. {
            return Err(OptimErr::InvalidConfig(
                "regularization_factor must not be negative",
            ));
        }

        if self.converging_delta_weight.is_nan() || self.converging_delta_weight < 0. {
            return Err(OptimErr::InvalidConfig(
                "converging_delta_weight must not be negative",
            ));
        }

        if self.converging_steps == 0 {
            return Err(OptimErr::InvalidConfig(
                "converging_steps must be at least 1",
            ));
        }

        if self.name == "lbfgs" {
            check_history_size(self.lbfgs_history_size)?;
        }

        Ok(())
    }
}

/// L-BFGS needs two slots to hold a step besides the current iterate.
pub(crate) fn check_history_size(size: usize) -> Result<()> {
    if size < 2 {
        return Err(OptimErr::InvalidConfig(
            "lbfgs_history_size must be at least 2",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = OptimizerConfig::default();
        assert_eq!(config.lbfgs_history_size, 5);
        assert_eq!(config.workers, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = OptimizerConfig::from_json_str(
            r#"{ "name": "gd", "regularization": "l2", "gd_batch_size": 1 }"#,
        )
        .unwrap();

        assert_eq!(config.name, "gd");
        assert_eq!(config.regularization, Regularization::L2);
        assert_eq!(config.gd_batch_size, 1);
        assert_eq!(config.lbfgs_history_size, 5);
    }

    #[test]
    fn short_history_is_rejected() {
        let err = OptimizerConfig::from_json_str(r#"{ "lbfgs_history_size": 1 }"#).unwrap_err();
        assert!(matches!(err, OptimErr::InvalidConfig(_)));
    }

    #[test]
    fn gradient_descent_ignores_history_size() {
        let config = OptimizerConfig::from_json_str(
            r#"{ "name": "gd", "lbfgs_history_size": 0 }"#,
        )
        .unwrap();
        assert_eq!(config.lbfgs_history_size, 0);
    }

    #[test]
    fn zero_converging_steps_is_rejected() {
        let config = OptimizerConfig {
            name: "gd".into(),
            converging_steps: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(OptimErr::InvalidConfig(_))));
    }

    #[test]
    fn negative_learning_rate_is_rejected() {
        let config = OptimizerConfig {
            learning_rate: -0.1,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(OptimErr::InvalidConfig(_))));
    }

    #[test]
    fn malformed_json() {
        let err = OptimizerConfig::from_json_str("{ \"name\": 3 }").unwrap_err();
        assert!(matches!(err, OptimErr::Json(_)));

        let err = OptimizerConfig::from_json_str(r#"{ "regularization": "l3" }"#).unwrap_err();
        assert!(matches!(err, OptimErr::Json(_)));
    }

    #[test]
    fn missing_file() {
        let err = OptimizerConfig::from_path("/nonexistent/optimizer.json").unwrap_err();
        assert!(matches!(err, OptimErr::Io(_)));
    }
}
