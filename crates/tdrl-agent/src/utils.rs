//! Helpers shared by the learning strategies and the training loop

use rand::Rng;
use rand_distr::{Distribution, WeightedIndex};
use tdrl_core::{RLError, Result};

/// Tolerance on the sum of an action distribution
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Sample an action index from a probability distribution over actions
pub fn sample_action<R: Rng + ?Sized>(probabilities: &[f64], rng: &mut R) -> Result<usize> {
    check_distribution(probabilities)?;

    let dist = WeightedIndex::new(probabilities)
        .map_err(|e| RLError::InvalidDistribution(e.to_string()))?;
    Ok(dist.sample(rng))
}

/// Check that `probabilities` is a probability simplex
pub fn check_distribution(probabilities: &[f64]) -> Result<()> {
    if probabilities.is_empty() {
        return Err(RLError::InvalidDistribution("no actions".to_string()));
    }
    if let Some(p) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(RLError::InvalidDistribution(format!(
            "probability {p} is not a non-negative number"
        )));
    }

    let sum: f64 = probabilities.iter().sum();
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(RLError::InvalidDistribution(format!(
            "probabilities sum to {sum}"
        )));
    }
    Ok(())
}

/// Exploration strategies spread probability mass over `nb_actions - 1`
/// actions and need at least two of them.
pub(crate) fn check_exploration_actions(nb_actions: usize) -> Result<()> {
    if nb_actions < 2 {
        return Err(RLError::config(format!(
            "exploration needs at least 2 actions, got {nb_actions}"
        )));
    }
    Ok(())
}

pub(crate) fn check_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RLError::config(format!("{name} must be positive, got {value}")))
    }
}

pub(crate) fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RLError::config(format!("{name} must be in [0, 1], got {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_sampling_follows_certain_distribution() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..20 {
            assert_eq!(sample_action(&[0.0, 1.0, 0.0], &mut rng).unwrap(), 1);
        }
    }

    #[test]
    fn test_sampling_covers_support() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut counts = [0usize; 2];
        for _ in 0..1000 {
            counts[sample_action(&[0.5, 0.5], &mut rng).unwrap()] += 1;
        }
        assert!(counts[0] > 400 && counts[1] > 400);
    }

    #[test]
    fn test_invalid_distributions() {
        let mut rng = StdRng::seed_from_u64(3);
        let cases: [&[f64]; 4] = [&[], &[0.5, 0.6], &[1.5, -0.5], &[f64::NAN, 1.0]];
        for probabilities in cases {
            assert!(matches!(
                sample_action(probabilities, &mut rng),
                Err(RLError::InvalidDistribution(_))
            ));
        }
    }

    #[test]
    fn test_parameter_checks() {
        assert!(check_exploration_actions(1).is_err());
        assert!(check_exploration_actions(2).is_ok());
        assert!(check_positive("kappa", 0.0).is_err());
        assert!(check_unit_interval("gamma", 1.0).is_ok());
        assert!(check_unit_interval("gamma", f64::NAN).is_err());
    }
}
