//! World (environment) contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{RLError, Result};

/// Result of performing one action in a world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Next raw (not encoded) state
    pub state: Vec<f64>,
    /// Reward signal
    pub reward: f64,
    /// Whether the episode is over
    pub terminal: bool,
}

impl Step {
    /// Create a new step
    #[must_use]
    pub fn new(state: Vec<f64>, reward: f64, terminal: bool) -> Self {
        Self {
            state,
            reward,
            terminal,
        }
    }
}

/// World that receives actions and produces new states and rewards
#[async_trait]
pub trait World: Send {
    /// Number of actions that can be performed. This number cannot change
    /// during the lifetime of the world.
    fn nb_actions(&self) -> usize;

    /// Put the world back in its initial configuration and return the
    /// initial raw state. Stochastic worlds may draw a new initial state.
    async fn reset(&mut self) -> Result<Vec<f64>>;

    /// Perform an action and return the next raw state, the reward and
    /// whether the episode is finished.
    async fn perform_action(&mut self, action: usize) -> Result<Step>;

    /// Encode a raw state into the feature vector stored in episodes
    fn encode(&self, state: &[f64]) -> Result<Vec<f64>> {
        Ok(state.to_vec())
    }

    /// Release the resources held by the world
    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

#[async_trait]
impl<W> World for Box<W>
where
    W: World + ?Sized,
{
    fn nb_actions(&self) -> usize {
        (**self).nb_actions()
    }

    async fn reset(&mut self) -> Result<Vec<f64>> {
        (**self).reset().await
    }

    async fn perform_action(&mut self, action: usize) -> Result<Step> {
        (**self).perform_action(action).await
    }

    fn encode(&self, state: &[f64]) -> Result<Vec<f64>> {
        (**self).encode(state)
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}

/// Check that `action` is a valid action index
pub fn check_action(action: usize, nb_actions: usize) -> Result<()> {
    if action < nb_actions {
        Ok(())
    } else {
        Err(RLError::InvalidAction { action, nb_actions })
    }
}
