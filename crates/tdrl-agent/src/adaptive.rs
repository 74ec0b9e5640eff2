//! Softmax with a temperature predicted from the TD error

use tdrl_core::{Episode, LearningStrategy, Result, Scores};
use tracing::debug;

use crate::linear::LinearModel;
use crate::softmax::softmax_distribution;
use crate::utils::{check_exploration_actions, check_positive, check_unit_interval};

/// Softmax whose temperature follows the expected magnitude of future TD
/// errors, `temperature(t) = |error(t)| + beta * temperature(t + 1)`.
///
/// The temperature of a state is predicted by a [`LinearModel`] of the
/// state. Training pairs `(state(t - 1), |error(t - 1)| + beta *
/// prediction(t))` are buffered and the predictor is refitted every
/// [`AdaptiveSoftmax::REFIT_THRESHOLD`] samples. The temperature actually
/// used never drops below `min_temperature`.
#[derive(Debug, Clone)]
pub struct AdaptiveSoftmax<L> {
    learning: L,
    beta: f64,
    min_temperature: f64,
    predictor: LinearModel,
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
}

impl<L: LearningStrategy> AdaptiveSoftmax<L> {
    /// Default discount of the temperature filter
    pub const DEFAULT_BETA: f64 = 0.9;
    /// Default temperature floor
    pub const DEFAULT_MIN_TEMPERATURE: f64 = 0.2;
    /// Number of buffered samples that triggers a refit of the predictor
    pub const REFIT_THRESHOLD: usize = 100;

    /// Wrap `learning` with the default filter discount and temperature floor
    pub fn new(learning: L) -> Result<Self> {
        Self::with_parameters(learning, Self::DEFAULT_BETA, Self::DEFAULT_MIN_TEMPERATURE)
    }

    /// Wrap `learning` with an explicit filter discount `beta` and
    /// temperature floor
    pub fn with_parameters(learning: L, beta: f64, min_temperature: f64) -> Result<Self> {
        check_exploration_actions(learning.nb_actions())?;
        check_unit_interval("beta", beta)?;
        check_positive("min_temperature", min_temperature)?;
        Ok(Self {
            learning,
            beta,
            min_temperature,
            predictor: LinearModel::with_defaults(1)?,
            inputs: Vec::new(),
            targets: Vec::new(),
        })
    }

    /// Temperature floor
    #[must_use]
    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    /// Number of samples waiting for the next refit
    #[must_use]
    pub fn pending_samples(&self) -> usize {
        self.inputs.len()
    }

    /// Predicted temperature of `state`, before the floor is applied
    pub fn predict_temperature(&self, state: &[f64]) -> Result<f64> {
        Ok(self.predictor.predict(state)?.first().copied().unwrap_or(0.0))
    }

    /// Mean of the buffered target temperatures, zero when nothing is buffered
    #[allow(clippy::cast_precision_loss)]
    fn average_target(&self) -> f64 {
        if self.targets.is_empty() {
            return 0.0;
        }
        let total: f64 = self.targets.iter().filter_map(|t| t.first()).sum();
        total / self.targets.len() as f64
    }

    fn refit(&mut self) -> Result<()> {
        debug!(
            samples = self.inputs.len(),
            average_temperature = self.average_target(),
            "refitting temperature predictor"
        );
        self.predictor.fit(&self.inputs, &self.targets)?;

        self.inputs.clear();
        self.targets.clear();
        Ok(())
    }
}

impl<L: LearningStrategy> LearningStrategy for AdaptiveSoftmax<L> {
    fn nb_actions(&self) -> usize {
        self.learning.nb_actions()
    }

    fn actions(&mut self, episode: &mut Episode) -> Result<Scores> {
        let scores = self.learning.actions(episode)?;
        let predicted = self.predict_temperature(episode.last_state()?)?;

        let previous = episode.len().checked_sub(2).and_then(|t| episode.state(t));
        if let Some(previous) = previous {
            let target = scores.td_error.abs() + self.beta * predicted;
            self.inputs.push(previous.to_vec());
            self.targets.push(vec![target]);

            if self.inputs.len() > Self::REFIT_THRESHOLD {
                self.refit()?;
            }
        }

        let temperature = predicted.max(self.min_temperature);
        Ok(Scores::new(
            softmax_distribution(&scores.values, temperature),
            scores.td_error,
        ))
    }

    fn finish_episode(&mut self, episode: &mut Episode) -> Result<()> {
        self.learning.finish_episode(episode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{qlearning::tests::episode_from, QLearning};
    use approx::assert_relative_eq;
    use tdrl_core::RLError;

    fn adaptive() -> AdaptiveSoftmax<QLearning> {
        AdaptiveSoftmax::new(QLearning::new(2, 0.5, 0.9).unwrap()).unwrap()
    }

    #[test]
    fn test_floor_applies_before_training() {
        let mut learning = adaptive();
        let mut episode = episode_from(&[vec![0.0, 1.0]], &[], &[]);

        let scores = learning.actions(&mut episode).unwrap();

        let floor = AdaptiveSoftmax::<QLearning>::DEFAULT_MIN_TEMPERATURE;
        let expected = softmax_distribution(&[0.0, 1.0], floor);
        assert_relative_eq!(scores.values[0], expected[0], epsilon = 1e-12);
        assert_relative_eq!(scores.values[1], expected[1], epsilon = 1e-12);
        assert_eq!(learning.pending_samples(), 0);
    }

    #[test]
    fn test_buffers_previous_state_with_error_target() {
        let mut learning = adaptive();
        let mut episode = episode_from(&[vec![0.0, 0.0], vec![1.0, 2.0]], &[0], &[5.0]);

        let scores = learning.actions(&mut episode).unwrap();

        assert_relative_eq!(scores.td_error, 6.8, epsilon = 1e-12);
        assert_eq!(learning.pending_samples(), 1);
        assert_relative_eq!(learning.targets[0][0], 6.8, epsilon = 1e-12);
        assert_eq!(learning.inputs[0], episode.state(0).unwrap().to_vec());
    }

    #[test]
    fn test_refit_raises_temperature_of_surprising_states() {
        let mut learning = adaptive();
        for _ in 0..=AdaptiveSoftmax::<QLearning>::REFIT_THRESHOLD {
            let mut episode = Episode::new();
            episode.add_state(vec![1.0]);
            episode.add_values(vec![0.0, 0.0]).unwrap();
            episode.add_action(0).unwrap();
            episode.add_reward(4.0).unwrap();
            episode.add_state(vec![1.0]);
            episode.add_values(vec![0.0, 0.0]).unwrap();
            learning.actions(&mut episode).unwrap();
        }

        assert_eq!(learning.pending_samples(), 0);
        assert!(learning.predict_temperature(&[1.0]).unwrap() > 1.0);
    }

    #[test]
    fn test_average_target_of_buffered_samples() {
        let mut learning = adaptive();
        assert_eq!(learning.average_target(), 0.0);

        for reward in [4.0, -2.0] {
            let mut episode = episode_from(&[vec![0.0, 0.0], vec![0.0, 0.0]], &[0], &[reward]);
            learning.actions(&mut episode).unwrap();
        }

        assert_eq!(learning.pending_samples(), 2);
        assert_relative_eq!(learning.average_target(), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_configuration_errors() {
        let single = QLearning::new(1, 0.5, 0.9).unwrap();
        assert!(matches!(AdaptiveSoftmax::new(single), Err(RLError::Configuration(_))));

        let q = QLearning::new(2, 0.5, 0.9).unwrap();
        assert!(AdaptiveSoftmax::with_parameters(q.clone(), 1.5, 0.2).is_err());
        assert!(AdaptiveSoftmax::with_parameters(q, 0.9, 0.0).is_err());
    }
}
