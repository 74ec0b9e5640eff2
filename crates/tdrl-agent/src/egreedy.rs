//! Epsilon-greedy action selection

use tdrl_core::{argmax, Episode, LearningStrategy, Result, Scores};

use crate::utils::{check_exploration_actions, check_unit_interval};

/// Epsilon-greedy wrapper around a scoring strategy.
///
/// The best-scoring action is taken with probability `1 - epsilon`, every
/// other action with probability `epsilon / (n - 1)`.
#[derive(Debug, Clone)]
pub struct EGreedy<L> {
    learning: L,
    epsilon: f64,
}

impl<L: LearningStrategy> EGreedy<L> {
    /// Wrap `learning`, taking an exploratory step with probability `epsilon`
    pub fn new(learning: L, epsilon: f64) -> Result<Self> {
        check_exploration_actions(learning.nb_actions())?;
        check_unit_interval("epsilon", epsilon)?;
        Ok(Self { learning, epsilon })
    }

    /// Exploration rate
    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set the exploration rate
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    /// Wrapped strategy
    pub fn inner(&self) -> &L {
        &self.learning
    }
}

/// Epsilon-greedy distribution over `scores`, empty for empty scores
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn egreedy_distribution(scores: &[f64], epsilon: f64) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let best = argmax(scores);
    let others = epsilon / (scores.len() - 1) as f64;

    let mut probabilities = vec![others; scores.len()];
    probabilities[best] = 1.0 - epsilon;
    probabilities
}

impl<L: LearningStrategy> LearningStrategy for EGreedy<L> {
    fn nb_actions(&self) -> usize {
        self.learning.nb_actions()
    }

    fn actions(&mut self, episode: &mut Episode) -> Result<Scores> {
        let scores = self.learning.actions(episode)?;
        Ok(Scores::new(
            egreedy_distribution(&scores.values, self.epsilon),
            scores.td_error,
        ))
    }

    fn finish_episode(&mut self, episode: &mut Episode) -> Result<()> {
        self.learning.finish_episode(episode)
    }
}
