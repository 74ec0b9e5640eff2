//! Learning strategy contract
//!
//! A learning strategy looks at an episode whose last state has just been
//! valued by a [`Model`](crate::Model). Value-estimation strategies apply
//! their TD correction to the stored values and return raw scores;
//! exploration strategies wrap them and turn those scores into a
//! probability distribution over the actions.

use crate::{Episode, Result};

/// Output of a learning strategy
#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    /// One entry per action: raw scores, or probabilities for exploration
    /// strategies
    pub values: Vec<f64>,
    /// TD error of the correction applied during the call
    pub td_error: f64,
}

impl Scores {
    /// Create new scores
    #[must_use]
    pub fn new(values: Vec<f64>, td_error: f64) -> Self {
        Self { values, td_error }
    }
}

/// Strategy that updates values and decides which action to take
pub trait LearningStrategy: Send {
    /// Number of actions the strategy decides between
    fn nb_actions(&self) -> usize;

    /// Apply the TD correction of the previous step, if any, and score the
    /// actions of the last state. Callers guarantee that the episode holds
    /// at least one valued state.
    fn actions(&mut self, episode: &mut Episode) -> Result<Scores>;

    /// Hook called once the episode is over
    fn finish_episode(&mut self, _episode: &mut Episode) -> Result<()> {
        Ok(())
    }
}

impl<L> LearningStrategy for Box<L>
where
    L: LearningStrategy + ?Sized,
{
    fn nb_actions(&self) -> usize {
        (**self).nb_actions()
    }

    fn actions(&mut self, episode: &mut Episode) -> Result<Scores> {
        (**self).actions(episode)
    }

    fn finish_episode(&mut self, episode: &mut Episode) -> Result<()> {
        (**self).finish_episode(episode)
    }
}

/// Largest value of a non-empty slice
#[must_use]
pub fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Index of the largest value, the first one on ties
#[must_use]
pub fn argmax(values: &[f64]) -> usize {
    let mut best_index = 0;
    let mut best_value = f64::NEG_INFINITY;

    for (index, &value) in values.iter().enumerate() {
        if value > best_value {
            best_value = value;
            best_index = index;
        }
    }

    best_index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_first_tie() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[0.0, 0.0]), 0);
        assert_eq!(argmax(&[-5.0, -1.0]), 1);
    }

    #[test]
    fn test_max_value() {
        assert!((max_value(&[1.0, -2.0, 4.5]) - 4.5).abs() < f64::EPSILON);
    }
}
