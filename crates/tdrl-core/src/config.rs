//! Training run configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{episode::DEFAULT_CAPACITY, RLError, Result};

/// Configuration of a training run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of episodes to simulate
    pub num_episodes: usize,
    /// Maximum number of steps per episode
    pub max_episode_length: usize,
    /// The model learns once every `batch_size` episodes
    pub batch_size: usize,
    /// Maximum number of time steps kept by each episode
    pub episode_capacity: usize,
    /// Seed of the action sampler, random when unset
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            num_episodes: 1000,
            max_episode_length: 100,
            batch_size: 1,
            episode_capacity: DEFAULT_CAPACITY,
            seed: None,
        }
    }
}

impl TrainingConfig {
    /// Create a configuration with default capacity and no seed
    #[must_use]
    pub fn new(num_episodes: usize, max_episode_length: usize, batch_size: usize) -> Self {
        Self {
            num_episodes,
            max_episode_length,
            batch_size,
            ..Self::default()
        }
    }

    /// Use a fixed seed for action sampling
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Bound the number of time steps kept by each episode
    #[must_use]
    pub fn with_episode_capacity(mut self, capacity: usize) -> Self {
        self.episode_capacity = capacity;
        self
    }

    /// Check the configuration
    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(RLError::config("batch_size must be at least 1"));
        }
        if self.episode_capacity < 2 {
            return Err(RLError::config(format!(
                "episode_capacity must be at least 2, got {}",
                self.episode_capacity
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path).await?;
        Self::from_json(&json)
    }

    /// Save the configuration as pretty JSON
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
