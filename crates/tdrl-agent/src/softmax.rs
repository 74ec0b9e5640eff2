//! Softmax (Boltzmann) action selection

use tdrl_core::{max_value, Episode, LearningStrategy, Result, Scores};

use crate::utils::{check_exploration_actions, check_positive};

/// Exponents below this value evaluate to [`EXP_FLOOR`]
pub const EXP_LOWER_CUTOFF: f64 = -699.0;
/// Exponents above this value evaluate to [`EXP_CEILING`]
pub const EXP_UPPER_CUTOFF: f64 = 699.0;
/// Result of the exponential for very negative exponents
pub const EXP_FLOOR: f64 = 1e-305;
/// Result of the exponential for very large exponents
pub const EXP_CEILING: f64 = 1e304;

/// Exponential saturating at [`EXP_FLOOR`] and [`EXP_CEILING`]
#[must_use]
pub fn bounded_exp(x: f64) -> f64 {
    if x < EXP_LOWER_CUTOFF {
        EXP_FLOOR
    } else if x > EXP_UPPER_CUTOFF {
        EXP_CEILING
    } else {
        x.exp()
    }
}

/// Boltzmann distribution `exp(v_i / T) / sum_j exp(v_j / T)`
#[must_use]
pub fn softmax_distribution(scores: &[f64], temperature: f64) -> Vec<f64> {
    let scaled: Vec<f64> = scores.iter().map(|v| v / temperature).collect();

    // Shifting by the maximum leaves the distribution unchanged
    let max = max_value(&scaled);
    let shift = if max.is_finite() { max } else { 0.0 };

    let exps: Vec<f64> = scaled.iter().map(|x| bounded_exp(x - shift)).collect();
    let sum: f64 = exps.iter().sum();

    exps.iter().map(|e| e / sum).collect()
}

/// Softmax wrapper around a scoring strategy
#[derive(Debug, Clone)]
pub struct Softmax<L> {
    learning: L,
    temperature: f64,
}

impl<L: LearningStrategy> Softmax<L> {
    /// Wrap `learning` with a fixed temperature. High temperatures favour
    /// exploration, low ones exploitation.
    pub fn new(learning: L, temperature: f64) -> Result<Self> {
        check_exploration_actions(learning.nb_actions())?;
        check_positive("temperature", temperature)?;
        Ok(Self {
            learning,
            temperature,
        })
    }

    /// Current temperature
    #[must_use]
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Change the temperature
    pub fn set_temperature(&mut self, temperature: f64) -> Result<()> {
        check_positive("temperature", temperature)?;
        self.temperature = temperature;
        Ok(())
    }
}

impl<L: LearningStrategy> LearningStrategy for Softmax<L> {
    fn nb_actions(&self) -> usize {
        self.learning.nb_actions()
    }

    fn actions(&mut self, episode: &mut Episode) -> Result<Scores> {
        let scores = self.learning.actions(episode)?;
        Ok(Scores::new(
            softmax_distribution(&scores.values, self.temperature),
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
    use proptest::prelude::*;
    use tdrl_core::RLError;

    fn assert_simplex(probabilities: &[f64]) {
        assert!(probabilities.iter().all(|p| p.is_finite() && *p >= 0.0));
        assert_relative_eq!(probabilities.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bounded_exp_saturates() {
        assert_relative_eq!(bounded_exp(-1000.0), EXP_FLOOR);
        assert_relative_eq!(bounded_exp(1000.0), EXP_CEILING);
        assert_relative_eq!(bounded_exp(1.0), std::f64::consts::E);
    }

    #[test]
    fn test_uniform_for_equal_scores() {
        let probabilities = softmax_distribution(&[3.0, 3.0, 3.0, 3.0], 0.5);
        for p in probabilities {
            assert_relative_eq!(p, 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_known_values() {
        let probabilities = softmax_distribution(&[0.0, 1.0], 1.0);
        let e = std::f64::consts::E;
        assert_relative_eq!(probabilities[1], e / (1.0 + e), epsilon = 1e-12);
    }

    #[test]
    fn test_extreme_scores_stay_well_defined() {
        assert_simplex(&softmax_distribution(&[1e300, -1e300, 0.0], 1e-3));
        assert_simplex(&softmax_distribution(&[f64::INFINITY, 1.0], 1.0));
        assert_simplex(&softmax_distribution(&[f64::NEG_INFINITY, -5.0], 1.0));
        assert_simplex(&softmax_distribution(&[-800.0, -900.0], 1.0));
    }

    #[test]
    fn test_wraps_td_update() {
        let q = QLearning::new(2, 0.5, 0.9).unwrap();
        let mut learning = Softmax::new(q, 1.0).unwrap();
        let mut episode = episode_from(&[vec![0.0, 0.0], vec![1.0, 2.0]], &[0], &[5.0]);

        let scores = learning.actions(&mut episode).unwrap();

        assert_relative_eq!(scores.td_error, 6.8, epsilon = 1e-12);
        assert!(scores.values[1] > scores.values[0]);
        assert_simplex(&scores.values);
    }

    #[test]
    fn test_configuration_errors() {
        let single = QLearning::new(1, 0.5, 0.9).unwrap();
        assert!(matches!(Softmax::new(single, 1.0), Err(RLError::Configuration(_))));

        let q = QLearning::new(2, 0.5, 0.9).unwrap();
        assert!(Softmax::new(q.clone(), 0.0).is_err());
        let mut softmax = Softmax::new(q, 1.0).unwrap();
        assert!(softmax.set_temperature(-1.0).is_err());
        assert_relative_eq!(softmax.temperature(), 1.0);
    }

    proptest! {
        #[test]
        fn prop_softmax_is_a_simplex(
            scores in prop::collection::vec(-1e3f64..1e3, 2..16),
            temperature in 1e-3f64..1e3,
        ) {
            let probabilities = softmax_distribution(&scores, temperature);
            prop_assert!(probabilities.iter().all(|p| p.is_finite() && *p >= 0.0));
            prop_assert!((probabilities.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_softmax_scale_invariance(
            scores in prop::collection::vec(-100f64..100.0, 2..8),
            temperature in 0.1f64..10.0,
            scale in 0.1f64..10.0,
        ) {
            let scaled: Vec<f64> = scores.iter().map(|v| v * scale).collect();
            let reference = softmax_distribution(&scores, temperature);
            let rescaled = softmax_distribution(&scaled, temperature * scale);

            for (a, b) in reference.iter().zip(&rescaled) {
                prop_assert!((a - b).abs() < 1e-9);
            }
        }
    }
}
