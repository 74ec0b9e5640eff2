//! Linear function approximation
//!
//! Small `ndarray` regressor used where a learned function of the state is
//! needed: the surrogate world of the planner and the temperature
//! predictor of adaptive softmax.

use async_trait::async_trait;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use tdrl_core::{check_values, Episode, Model, RLError, Result};

use crate::utils::check_positive;

/// Linear model `y = W x + b` trained by normalised least-mean-squares
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    nb_outputs: usize,
    learning_rate: f64,
    epochs: usize,
    weights: Option<Array2<f64>>,
    bias: Array1<f64>,
}

impl LinearModel {
    /// Default step size
    pub const DEFAULT_LEARNING_RATE: f64 = 0.5;
    /// Default number of passes over every batch
    pub const DEFAULT_EPOCHS: usize = 10;

    /// Create an untrained model with `nb_outputs` outputs
    pub fn new(nb_outputs: usize, learning_rate: f64, epochs: usize) -> Result<Self> {
        if nb_outputs == 0 {
            return Err(RLError::config("a linear model needs at least one output"));
        }
        check_positive("learning_rate", learning_rate)?;
        if epochs == 0 {
            return Err(RLError::config("epochs must be at least 1"));
        }
        Ok(Self {
            nb_outputs,
            learning_rate,
            epochs,
            weights: None,
            bias: Array1::zeros(nb_outputs),
        })
    }

    /// Create an untrained model with the default learning rate and epochs
    pub fn with_defaults(nb_outputs: usize) -> Result<Self> {
        Self::new(nb_outputs, Self::DEFAULT_LEARNING_RATE, Self::DEFAULT_EPOCHS)
    }

    /// Whether the model has been fitted at least once
    #[must_use]
    pub fn is_trained(&self) -> bool {
        self.weights.is_some()
    }

    /// Predict the outputs for one input, zeros before the first fit
    pub fn predict(&self, input: &[f64]) -> Result<Vec<f64>> {
        let Some(weights) = &self.weights else {
            return Ok(vec![0.0; self.nb_outputs]);
        };
        check_input(weights.ncols(), input)?;

        let output = weights.dot(&ArrayView1::from(input)) + &self.bias;
        Ok(output.to_vec())
    }

    /// Fit the model on `(input, target)` pairs and return the mean squared
    /// error after training
    pub fn fit(&mut self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        if inputs.len() != targets.len() {
            return Err(RLError::DimensionMismatch {
                expected: inputs.len(),
                actual: targets.len(),
            });
        }
        let Some(first) = inputs.first() else {
            return Ok(0.0);
        };

        let nb_outputs = self.nb_outputs;
        let width = self.weights.as_ref().map_or(first.len(), |weights| weights.ncols());
        for (input, target) in inputs.iter().zip(targets) {
            check_input(width, input)?;
            check_values(target, nb_outputs)?;
        }

        let weights = self
            .weights
            .get_or_insert_with(|| Array2::zeros((nb_outputs, width)));

        for _ in 0..self.epochs {
            for (input, target) in inputs.iter().zip(targets) {
                let x = ArrayView1::from(input.as_slice());
                let error = weights.dot(&x) + &self.bias - ArrayView1::from(target.as_slice());
                let step = self.learning_rate / (1.0 + x.dot(&x));

                let gradient = error
                    .view()
                    .insert_axis(Axis(1))
                    .dot(&x.insert_axis(Axis(0)));
                weights.scaled_add(-step, &gradient);
                self.bias.scaled_add(-step, &error);
            }
        }

        self.mean_squared_error(inputs, targets)
    }

    #[allow(clippy::cast_precision_loss)]
    fn mean_squared_error(&self, inputs: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64> {
        let mut total = 0.0;
        for (input, target) in inputs.iter().zip(targets) {
            let prediction = self.predict(input)?;
            total += prediction
                .iter()
                .zip(target)
                .map(|(p, t)| (p - t).powi(2))
                .sum::<f64>();
        }
        Ok(total / (inputs.len() * self.nb_outputs) as f64)
    }
}

fn check_input(expected: usize, input: &[f64]) -> Result<()> {
    if input.len() == expected {
        Ok(())
    } else {
        Err(RLError::DimensionMismatch {
            expected,
            actual: input.len(),
        })
    }
}

#[async_trait]
impl Model for LinearModel {
    fn nb_actions(&self) -> usize {
        self.nb_outputs
    }

    async fn values(&mut self, episode: &Episode) -> Result<Vec<f64>> {
        self.predict(episode.last_state()?)
    }

    async fn learn(&mut self, episodes: &[Episode]) -> Result<()> {
        let mut inputs = Vec::new();
        let mut targets = Vec::new();

        for episode in episodes {
            for step in episode.steps() {
                if let Some(values) = &step.values {
                    inputs.push(step.state.clone());
                    targets.push(values.clone());
                }
            }
        }

        let error = self.fit(&inputs, &targets)?;
        tracing::trace!(samples = inputs.len(), error, "linear model fitted");
        Ok(())
    }
}
