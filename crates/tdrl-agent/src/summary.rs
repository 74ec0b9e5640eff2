//! Summaries of training runs

use statrs::statistics::Statistics;
use tdrl_core::{Episode, RLError, Result};

/// Cumulative reward of every episode
#[must_use]
pub fn episode_rewards(episodes: &[Episode]) -> Vec<f64> {
    episodes.iter().map(Episode::cumulative_reward).collect()
}

/// Mean cumulative reward over consecutive windows of `window` episodes.
/// A trailing partial window is ignored.
pub fn windowed_means(episodes: &[Episode], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(RLError::config("window must hold at least one episode"));
    }
    Ok(episode_rewards(episodes)
        .chunks_exact(window)
        .map(|rewards| rewards.iter().mean())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn episode_with_reward(reward: f64) -> Episode {
        let mut episode = Episode::new();
        episode.add_state(vec![0.0]);
        episode.add_reward(reward).unwrap();
        episode
    }

    #[test]
    fn test_windowed_means() {
        let episodes: Vec<Episode> = [1.0, 3.0, -2.0, 4.0, 10.0]
            .into_iter()
            .map(episode_with_reward)
            .collect();

        assert_eq!(episode_rewards(&episodes), vec![1.0, 3.0, -2.0, 4.0, 10.0]);

        let means = windowed_means(&episodes, 2).unwrap();
        assert_eq!(means.len(), 2);
        assert_relative_eq!(means[0], 2.0);
        assert_relative_eq!(means[1], 1.0);

        assert!(windowed_means(&episodes, 0).is_err());
        assert!(windowed_means(&episodes, 6).unwrap().is_empty());
    }
}
