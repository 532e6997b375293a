/// Annealed learning rate.
///
/// `rate(t) = base / (1 + t / characteristic_time)`, constant `base` when the
/// characteristic time isn't positive.
#[derive(Debug, Clone)]
pub struct LearningRate {
    base: f64,
    characteristic_time: f64,
    step: usize,
}

impl LearningRate {
    /// Creates a new `LearningRate`.
    ///
    /// # Arguments
    /// * `base` - The rate of the first step.
    /// * `characteristic_time` - The amount of steps it takes the rate to halve.
    pub fn new(base: f64, characteristic_time: f64) -> Self {
        Self {
            base,
            characteristic_time,
            step: 0,
        }
    }

    /// Returns the rate for the current step and moves to the next one.
    pub fn next_rate(&mut self) -> f64 {
        let t = self.step as f64;
        self.step += 1;

        if self.characteristic_time > 0. {
            self.base / (1. + t / self.characteristic_time)
        } else {
            self.base
        }
    }

    pub fn step(&self) -> usize {
        self.step
    }
}
