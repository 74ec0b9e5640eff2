//! One-dimensional corridor

use async_trait::async_trait;
use tdrl_core::{check_action, RLError, Result, Step, World};

/// Corridor of `length` cells. The agent starts in cell 0 and the episode
/// ends with a reward of 10 when it reaches the last cell; every other
/// move costs 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corridor {
    length: usize,
    position: usize,
}

impl Corridor {
    /// Move towards cell 0
    pub const LEFT: usize = 0;
    /// Move towards the goal
    pub const RIGHT: usize = 1;
    /// Reward for reaching the goal
    pub const GOAL_REWARD: f64 = 10.0;
    /// Reward for any other move
    pub const STEP_REWARD: f64 = -1.0;

    /// Create a corridor of `length` cells
    pub fn new(length: usize) -> Result<Self> {
        if length < 2 {
            return Err(RLError::config(format!(
                "a corridor needs at least 2 cells, got {length}"
            )));
        }
        Ok(Self {
            length,
            position: 0,
        })
    }

    /// Current cell
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[allow(clippy::cast_precision_loss)]
    fn state(&self) -> Vec<f64> {
        vec![self.position as f64]
    }
}

#[async_trait]
impl World for Corridor {
    fn nb_actions(&self) -> usize {
        2
    }

    async fn reset(&mut self) -> Result<Vec<f64>> {
        self.position = 0;
        Ok(self.state())
    }

    async fn perform_action(&mut self, action: usize) -> Result<Step> {
        check_action(action, 2)?;

        self.position = if action == Self::RIGHT {
            self.position + 1
        } else {
            self.position.saturating_sub(1)
        };

        if self.position == self.length - 1 {
            Ok(Step::new(self.state(), Self::GOAL_REWARD, true))
        } else {
            Ok(Step::new(self.state(), Self::STEP_REWARD, false))
        }
    }
}
