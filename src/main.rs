use std::env;

use anyhow::{Context, Result};
use log::info;

use loglinear::{
    OptimizerConfig,
    algebra::Vector,
    data::InMemoryDataset,
    maxent::{Instance, MaxEntTrainer},
    optimization::Regularization,
};

fn default_config() -> OptimizerConfig {
    OptimizerConfig {
        name: "lbfgs".into(),
        regularization: Regularization::L2,
        regularization_factor: 1.,
        learning_rate: 1.,
        converging_delta_weight: 1e-6,
        converging_steps: 3,
        ..Default::default()
    }
}

fn toy_dataset() -> InMemoryDataset<Instance> {
    [
        ([1., 1., 1., 3.], 0),
        ([1., 3., 1., 5.], 0),
        ([1., 3., 4., 7.], 1),
        ([1., 2., 8., 6.], 1),
    ]
    .into_iter()
    .map(|(features, label)| Instance::new(Vector::from_values(&features), label))
    .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    let config = match env::args().nth(1) {
        Some(path) => OptimizerConfig::from_path(&path)
            .with_context(|| format!("failed to load optimizer config from {path}"))?,
        None => default_config(),
    };
    info!("using optimizer {:?}", config.name);

    let set = toy_dataset();
    let (classifier, summary) = MaxEntTrainer::new(config)
        .train(&set)
        .context("training failed")?;

    println!(
        "{} after {} iterations (last |dw|/|w| = {:.3e})",
        if summary.converged { "converged" } else { "stopped" },
        summary.iterations,
        summary.last_ratio
    );

    for (i, instance) in set.instances().iter().enumerate() {
        let prediction = classifier.predict(&instance.features);
        println!(
            "#{i}: label {} predicted {} {:.4?}",
            instance.label, prediction.label, prediction.distribution
        );
    }

    Ok(())
}
