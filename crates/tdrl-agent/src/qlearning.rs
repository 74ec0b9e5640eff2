//! Q-learning, online and batch

use serde::{Deserialize, Serialize};
use tdrl_core::{
    check_action, max_value, Episode, LearningStrategy, RLError, Result, Scores,
};

use crate::utils::{check_positive, check_unit_interval};

/// Action, reward and best next value of the transition at time `t`
pub(crate) fn transition_at(episode: &Episode, t: usize) -> Result<(usize, f64, f64)> {
    let (action, reward) = episode
        .transition(t)
        .ok_or_else(|| RLError::InvalidState(format!("no complete transition at time step {t}")))?;
    let next_value = episode
        .values(t + 1)
        .map(max_value)
        .ok_or_else(|| RLError::InvalidState(format!("no values at time step {}", t + 1)))?;
    Ok((action, reward, next_value))
}

/// Values of time step `t`, checked against the action about to be updated
pub(crate) fn values_at(episode: &mut Episode, t: usize, action: usize) -> Result<&mut Vec<f64>> {
    let values = episode
        .values_mut(t)
        .ok_or_else(|| RLError::InvalidState(format!("no values at time step {t}")))?;
    check_action(action, values.len())?;
    Ok(values)
}

/// Q-Learning learning strategy.
///
/// The scores it returns are Q-values, not probabilities: wrap it in
/// [`EGreedy`](crate::EGreedy) or [`Softmax`](crate::Softmax) to obtain an
/// action distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QLearning {
    nb_actions: usize,
    alpha: f64,
    gamma: f64,
}

impl QLearning {
    /// Create a new Q-learning strategy with learning rate `alpha` and
    /// discount factor `gamma`
    pub fn new(nb_actions: usize, alpha: f64, gamma: f64) -> Result<Self> {
        check_positive("alpha", alpha)?;
        check_unit_interval("gamma", gamma)?;
        Ok(Self {
            nb_actions,
            alpha,
            gamma,
        })
    }

    /// Learning rate
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Discount factor
    #[must_use]
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Apply the Q-learning update to the transition at time `t` and
    /// return its TD error
    pub fn update(&self, episode: &mut Episode, t: usize) -> Result<f64> {
        let (action, reward, next_value) = transition_at(episode, t)?;
        let values = values_at(episode, t, action)?;

        let q = values[action];
        let error = reward + self.gamma * next_value - q;
        values[action] = q + self.alpha * error;

        Ok(error)
    }
}

impl LearningStrategy for QLearning {
    fn nb_actions(&self) -> usize {
        self.nb_actions
    }

    fn actions(&mut self, episode: &mut Episode) -> Result<Scores> {
        let td_error = match episode.last_transition() {
            Some(t) => self.update(episode, t)?,
            None => 0.0,
        };

        Ok(Scores::new(episode.last_values()?.to_vec(), td_error))
    }
}

/// Q-learning with the Q-values updated at once, from the last transition
/// to the first, when the episode is finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchQLearning {
    rule: QLearning,
}

impl BatchQLearning {
    /// Create a new batch Q-learning strategy
    pub fn new(nb_actions: usize, alpha: f64, gamma: f64) -> Result<Self> {
        Ok(Self {
            rule: QLearning::new(nb_actions, alpha, gamma)?,
        })
    }
}

impl LearningStrategy for BatchQLearning {
    fn nb_actions(&self) -> usize {
        self.rule.nb_actions
    }

    fn actions(&mut self, episode: &mut Episode) -> Result<Scores> {
        // The TD error is only known in finish_episode
        Ok(Scores::new(episode.last_values()?.to_vec(), 0.0))
    }

    fn finish_episode(&mut self, episode: &mut Episode) -> Result<()> {
        for t in (0..episode.len().saturating_sub(1)).rev() {
            self.rule.update(episode, t)?;
        }
        Ok(())
    }
}
