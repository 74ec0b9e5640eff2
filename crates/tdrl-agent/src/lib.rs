//! Temporal-difference learning agents
//!
//! This crate provides:
//! - Q-learning and advantage learning, online and batch
//! - Epsilon-greedy, softmax and adaptive softmax exploration
//! - A linear value model
//! - The training loop and a model-based planner built on it

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod adaptive;
pub mod advantage;
pub mod config;
pub mod egreedy;
pub mod linear;
pub mod planner;
pub mod qlearning;
pub mod softmax;
pub mod summary;
pub mod trainer;
pub mod utils;

// Re-export learning strategies
pub use adaptive::AdaptiveSoftmax;
pub use advantage::{AdvantageLearning, BatchAdvantageLearning};
pub use egreedy::{egreedy_distribution, EGreedy};
pub use qlearning::{BatchQLearning, QLearning};
pub use softmax::{softmax_distribution, Softmax};

// Re-export models and the training loop
pub use config::{ModelConfig, StrategyConfig};
pub use linear::LinearModel;
pub use planner::{ModelWorld, PlanningModel, MAX_ROLLOUT_LENGTH, ROLLOUT_COUNT};
pub use trainer::TrainingLoop;

// Re-export utilities
pub use summary::{episode_rewards, windowed_means};
pub use utils::{check_distribution, sample_action};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AdaptiveSoftmax, AdvantageLearning, BatchAdvantageLearning, BatchQLearning, EGreedy,
        LinearModel, ModelConfig, PlanningModel, QLearning, Softmax, StrategyConfig,
        TrainingLoop,
    };
    pub use tdrl_core::prelude::*;
}
