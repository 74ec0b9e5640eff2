//! Core temporal-difference learning traits and types
//!
//! This crate provides the bounded [`Episode`] record shared by every
//! learning rule, together with the contracts that tie a training run
//! together: [`World`], [`Model`] and [`LearningStrategy`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod encoding;
pub mod episode;
pub mod error;
pub mod learning;
pub mod model;
pub mod stop;
pub mod world;

// Re-export core traits and types
pub use config::TrainingConfig;
pub use encoding::Encoding;
pub use episode::{Episode, TimeStep, DEFAULT_CAPACITY};
pub use error::{RLError, Result};
pub use learning::{argmax, max_value, LearningStrategy, Scores};
pub use model::{check_values, DiscreteModel, Model};
pub use stop::StopSignal;
pub use world::{check_action, Step, World};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Encoding, Episode, LearningStrategy, Model, RLError, Result, Scores, Step, StopSignal,
        TrainingConfig, World,
    };
}
