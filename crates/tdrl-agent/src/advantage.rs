//! Advantage learning, online and batch

use serde::{Deserialize, Serialize};
use tdrl_core::{max_value, Episode, LearningStrategy, Result, Scores};

use crate::qlearning::{transition_at, values_at};
use crate::utils::{check_positive, check_unit_interval};

/// Advantage learning strategy.
///
/// Like Q-learning, but the values of above-average actions are pushed
/// away from the others. The smaller `kappa` is, the stronger the bias
/// towards better-than-expected actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvantageLearning {
    nb_actions: usize,
    alpha: f64,
    gamma: f64,
    kappa: f64,
}

impl AdvantageLearning {
    /// Create a new advantage learning strategy
    pub fn new(nb_actions: usize, alpha: f64, gamma: f64, kappa: f64) -> Result<Self> {
        check_positive("alpha", alpha)?;
        check_unit_interval("gamma", gamma)?;
        check_positive("kappa", kappa)?;
        Ok(Self {
            nb_actions,
            alpha,
            gamma,
            kappa,
        })
    }

    /// Apply the advantage update to the transition at time `t` and
    /// return its TD error
    pub fn update(&self, episode: &mut Episode, t: usize) -> Result<f64> {
        let (action, reward, next_value) = transition_at(episode, t)?;
        let values = values_at(episode, t, action)?;

        let advantage = values[action];
        let value = max_value(values);
        let error = value + (reward + self.gamma * next_value - value) / self.kappa - advantage;
        values[action] = advantage + self.alpha * error;

        Ok(error)
    }
}

impl LearningStrategy for AdvantageLearning {
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

/// Advantage learning with the values updated at once when the episode
/// is finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAdvantageLearning {
    rule: AdvantageLearning,
}

impl BatchAdvantageLearning {
    /// Create a new batch advantage learning strategy
    pub fn new(nb_actions: usize, alpha: f64, gamma: f64, kappa: f64) -> Result<Self> {
        Ok(Self {
            rule: AdvantageLearning::new(nb_actions, alpha, gamma, kappa)?,
        })
    }
}

impl LearningStrategy for BatchAdvantageLearning {
    fn nb_actions(&self) -> usize {
        self.rule.nb_actions
    }

    fn actions(&mut self, episode: &mut Episode) -> Result<Scores> {
        Ok(Scores::new(episode.last_values()?.to_vec(), 0.0))
    }

    fn finish_episode(&mut self, episode: &mut Episode) -> Result<()> {
        for t in (0..episode.len().saturating_sub(1)).rev() {
            self.rule.update(episode, t)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qlearning::tests::episode_from;
    use approx::assert_relative_eq;

    #[test]
    fn test_online_update() {
        let mut learning = AdvantageLearning::new(2, 0.5, 0.9, 0.5).unwrap();
        let mut episode = episode_from(&[vec![1.0, 3.0], vec![2.0, 4.0]], &[0], &[1.0]);

        let scores = learning.actions(&mut episode).unwrap();

        // V = 3, target = 1 + 0.9 * 4 = 4.6, error = 3 + (4.6 - 3) / 0.5 - 1
        assert_relative_eq!(scores.td_error, 5.2, epsilon = 1e-12);
        assert_relative_eq!(episode.values(0).unwrap()[0], 3.6, epsilon = 1e-12);
        assert_eq!(scores.values, vec![2.0, 4.0]);
    }

    #[test]
    fn test_kappa_one_on_best_action_is_q_learning() {
        let mut advantage = AdvantageLearning::new(2, 0.5, 0.9, 1.0).unwrap();
        let mut q = crate::QLearning::new(2, 0.5, 0.9).unwrap();
        let values = [vec![0.0, 2.0], vec![1.0, 0.5]];

        let mut a = episode_from(&values, &[1], &[-1.0]);
        let mut b = episode_from(&values, &[1], &[-1.0]);
        advantage.actions(&mut a).unwrap();
        q.actions(&mut b).unwrap();

        assert_relative_eq!(a.values(0).unwrap()[1], b.values(0).unwrap()[1], epsilon = 1e-12);
    }

    #[test]
    fn test_batch_matches_backward_online_updates() {
        let values = [vec![0.0, 0.0], vec![0.5, 0.0], vec![0.0, 1.0], vec![2.0, 1.0]];
        let actions = [0, 1, 0];
        let rewards = [-1.0, 0.0, 10.0];

        let mut batch = BatchAdvantageLearning::new(2, 0.2, 0.9, 0.3).unwrap();
        let mut batched = episode_from(&values, &actions, &rewards);
        batch.finish_episode(&mut batched).unwrap();

        let online = AdvantageLearning::new(2, 0.2, 0.9, 0.3).unwrap();
        let mut stepped = episode_from(&values, &actions, &rewards);
        for t in (0..3).rev() {
            online.update(&mut stepped, t).unwrap();
        }

        for t in 0..4 {
            assert_eq!(batched.values(t), stepped.values(t));
        }
    }

    #[test]
    fn test_kappa_must_be_positive() {
        assert!(AdvantageLearning::new(2, 0.5, 0.9, 0.0).is_err());
        assert!(BatchAdvantageLearning::new(2, 0.5, 0.9, -1.0).is_err());
    }
}
