//! Value models: map the last state of an episode to per-action values

use std::collections::HashMap;

use async_trait::async_trait;

use crate::{world::check_action, Episode, RLError, Result};

/// Model used to associate action values with states
#[async_trait]
pub trait Model: Send {
    /// Number of values produced for every state
    fn nb_actions(&self) -> usize;

    /// Return the values associated with the last state of an episode.
    /// A model that has not learned anything yet returns zeros.
    async fn values(&mut self, episode: &Episode) -> Result<Vec<f64>>;

    /// Update the model using the values stored in the episodes. Calling
    /// this with an empty slice does nothing.
    async fn learn(&mut self, episodes: &[Episode]) -> Result<()>;
}

#[async_trait]
impl<M> Model for Box<M>
where
    M: Model + ?Sized,
{
    fn nb_actions(&self) -> usize {
        (**self).nb_actions()
    }

    async fn values(&mut self, episode: &Episode) -> Result<Vec<f64>> {
        (**self).values(episode).await
    }

    async fn learn(&mut self, episodes: &[Episode]) -> Result<()> {
        (**self).learn(episodes).await
    }
}

/// Check that a model produced exactly one value per action
pub fn check_values(values: &[f64], nb_actions: usize) -> Result<()> {
    if values.len() == nb_actions {
        Ok(())
    } else {
        Err(RLError::DimensionMismatch {
            expected: nb_actions,
            actual: values.len(),
        })
    }
}

/// Table of `(state, action) -> value`, without function approximation
#[derive(Debug, Clone)]
pub struct DiscreteModel {
    nb_actions: usize,
    table: HashMap<(Vec<u64>, usize), f64>,
}

impl DiscreteModel {
    /// Create an empty table for `nb_actions` actions
    pub fn new(nb_actions: usize) -> Result<Self> {
        if nb_actions == 0 {
            return Err(RLError::config("a model needs at least one action"));
        }
        Ok(Self {
            nb_actions,
            table: HashMap::new(),
        })
    }

    /// Number of `(state, action)` entries learned so far
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if nothing has been learned
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Value stored for a state and an action, zero when unknown
    #[must_use]
    pub fn value(&self, state: &[f64], action: usize) -> f64 {
        self.table.get(&key(state, action)).copied().unwrap_or(0.0)
    }
}

fn key(state: &[f64], action: usize) -> (Vec<u64>, usize) {
    // -0.0 and 0.0 share a key
    let bits = state.iter().map(|x| (x + 0.0).to_bits()).collect();
    (bits, action)
}

#[async_trait]
impl Model for DiscreteModel {
    fn nb_actions(&self) -> usize {
        self.nb_actions
    }

    async fn values(&mut self, episode: &Episode) -> Result<Vec<f64>> {
        let state = episode.last_state()?;
        Ok((0..self.nb_actions)
            .map(|action| self.value(state, action))
            .collect())
    }

    async fn learn(&mut self, episodes: &[Episode]) -> Result<()> {
        // Values already hold the corrected estimates, copy them over
        for episode in episodes {
            for step in episode.steps() {
                if let (Some(action), Some(values)) = (step.action, &step.values) {
                    check_action(action, self.nb_actions)?;
                    check_values(values, self.nb_actions)?;
                    self.table.insert(key(&step.state, action), values[action]);
                }
            }
        }
        Ok(())
    }
}
