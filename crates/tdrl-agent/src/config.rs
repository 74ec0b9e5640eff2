//! Serializable descriptions of strategies and models

use serde::{Deserialize, Serialize};
use tdrl_core::{DiscreteModel, LearningStrategy, Model, Result};

use crate::{
    AdaptiveSoftmax, AdvantageLearning, BatchAdvantageLearning, BatchQLearning, EGreedy,
    LinearModel, QLearning, Softmax,
};

fn default_beta() -> f64 {
    AdaptiveSoftmax::<QLearning>::DEFAULT_BETA
}

fn default_min_temperature() -> f64 {
    AdaptiveSoftmax::<QLearning>::DEFAULT_MIN_TEMPERATURE
}

fn default_learning_rate() -> f64 {
    LinearModel::DEFAULT_LEARNING_RATE
}

fn default_epochs() -> usize {
    LinearModel::DEFAULT_EPOCHS
}

/// Learning strategy tree, e.g.
///
/// ```json
/// {"kind": "egreedy", "epsilon": 0.1,
///  "inner": {"kind": "qlearning", "alpha": 0.5, "gamma": 0.9}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Online Q-learning
    #[serde(rename = "qlearning")]
    QLearning {
        /// Learning rate
        alpha: f64,
        /// Discount factor
        gamma: f64,
    },
    /// Online advantage learning
    Advantage {
        /// Learning rate
        alpha: f64,
        /// Discount factor
        gamma: f64,
        /// Advantage scaling
        kappa: f64,
    },
    /// Q-learning applied backward at the end of each episode
    #[serde(rename = "batch_qlearning")]
    BatchQLearning {
        /// Learning rate
        alpha: f64,
        /// Discount factor
        gamma: f64,
    },
    /// Advantage learning applied backward at the end of each episode
    BatchAdvantage {
        /// Learning rate
        alpha: f64,
        /// Discount factor
        gamma: f64,
        /// Advantage scaling
        kappa: f64,
    },
    /// Epsilon-greedy over an inner strategy
    #[serde(rename = "egreedy")]
    EGreedy {
        /// Exploration rate
        epsilon: f64,
        /// Scoring strategy
        inner: Box<StrategyConfig>,
    },
    /// Softmax over an inner strategy
    Softmax {
        /// Fixed temperature
        temperature: f64,
        /// Scoring strategy
        inner: Box<StrategyConfig>,
    },
    /// Softmax with a learned temperature over an inner strategy
    AdaptiveSoftmax {
        /// Discount of the temperature filter
        #[serde(default = "default_beta")]
        beta: f64,
        /// Temperature floor
        #[serde(default = "default_min_temperature")]
        min_temperature: f64,
        /// Scoring strategy
        inner: Box<StrategyConfig>,
    },
}

impl StrategyConfig {
    /// Parse a strategy tree from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build the strategy tree for a world with `nb_actions` actions
    pub fn build(&self, nb_actions: usize) -> Result<Box<dyn LearningStrategy>> {
        let strategy: Box<dyn LearningStrategy> = match self {
            Self::QLearning { alpha, gamma } => {
                Box::new(QLearning::new(nb_actions, *alpha, *gamma)?)
            }
            Self::Advantage {
                alpha,
                gamma,
                kappa,
            } => Box::new(AdvantageLearning::new(nb_actions, *alpha, *gamma, *kappa)?),
            Self::BatchQLearning { alpha, gamma } => {
                Box::new(BatchQLearning::new(nb_actions, *alpha, *gamma)?)
            }
            Self::BatchAdvantage {
                alpha,
                gamma,
                kappa,
            } => Box::new(BatchAdvantageLearning::new(
                nb_actions, *alpha, *gamma, *kappa,
            )?),
            Self::EGreedy { epsilon, inner } => {
                Box::new(EGreedy::new(inner.build(nb_actions)?, *epsilon)?)
            }
            Self::Softmax { temperature, inner } => {
                Box::new(Softmax::new(inner.build(nb_actions)?, *temperature)?)
            }
            Self::AdaptiveSoftmax {
                beta,
                min_temperature,
                inner,
            } => Box::new(AdaptiveSoftmax::with_parameters(
                inner.build(nb_actions)?,
                *beta,
                *min_temperature,
            )?),
        };
        Ok(strategy)
    }
}

/// Value model description
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Tabular model
    #[default]
    Discrete,
    /// Linear function approximation
    Linear {
        /// Step size
        #[serde(default = "default_learning_rate")]
        learning_rate: f64,
        /// Passes over every batch
        #[serde(default = "default_epochs")]
        epochs: usize,
    },
}

impl ModelConfig {
    /// Build the model for a world with `nb_actions` actions
    pub fn build(&self, nb_actions: usize) -> Result<Box<dyn Model>> {
        let model: Box<dyn Model> = match self {
            Self::Discrete => Box::new(DiscreteModel::new(nb_actions)?),
            Self::Linear {
                learning_rate,
                epochs,
            } => Box::new(LinearModel::new(nb_actions, *learning_rate, *epochs)?),
        };
        Ok(model)
    }
}
