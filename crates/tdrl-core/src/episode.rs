//! Bounded record of one trial
//!
//! An [`Episode`] stores, for every time step `t`, the observed state, the
//! per-action value estimates computed right after that observation and,
//! once the agent has acted, the action taken and the reward it produced.
//! All four sequences live in a single ring of [`TimeStep`]s so that
//! evicting the oldest entry keeps them aligned.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{RLError, Result};

/// Default maximum number of time steps kept by an episode
pub const DEFAULT_CAPACITY: usize = 100;

/// One time step of an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStep {
    /// Observed (encoded) state
    pub state: Vec<f64>,
    /// Per-action values computed after `state` was observed
    pub values: Option<Vec<f64>>,
    /// Action taken after observing `state`
    pub action: Option<usize>,
    /// Reward received for `action`
    pub reward: Option<f64>,
}

impl TimeStep {
    fn new(state: Vec<f64>) -> Self {
        Self {
            state,
            values: None,
            action: None,
            reward: None,
        }
    }
}

/// Sequence of states, values, actions and rewards of a learning episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Episode {
    /// Episode ID
    pub id: Uuid,
    /// Start time
    pub started_at: DateTime<Utc>,
    /// End time, set when the training loop closes the episode
    pub finished_at: Option<DateTime<Utc>>,
    steps: VecDeque<TimeStep>,
    capacity: usize,
    cumulative_reward: f64,
}

impl Episode {
    /// Create an empty episode holding at most [`DEFAULT_CAPACITY`] steps
    #[must_use]
    pub fn new() -> Self {
        Self::bounded(DEFAULT_CAPACITY)
    }

    /// Create an empty episode holding at most `capacity` steps.
    ///
    /// At least two steps are needed to compute a TD update.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity < 2 {
            return Err(RLError::config(format!(
                "episode capacity must be at least 2, got {capacity}"
            )));
        }
        Ok(Self::bounded(capacity))
    }

    fn bounded(capacity: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: None,
            steps: VecDeque::with_capacity(capacity),
            capacity,
            cumulative_reward: 0.0,
        }
    }

    /// Forget everything and start a new trial with the same capacity
    pub fn reset(&mut self) {
        *self = Self::bounded(self.capacity);
    }

    /// Append a state observation. The oldest time step is evicted when
    /// the episode is full.
    pub fn add_state(&mut self, state: Vec<f64>) {
        if self.steps.len() == self.capacity {
            self.steps.pop_front();
        }
        self.steps.push_back(TimeStep::new(state));
    }

    /// Record the action taken after the last observed state
    pub fn add_action(&mut self, action: usize) -> Result<()> {
        self.last_mut()?.action = Some(action);
        Ok(())
    }

    /// Record the reward received for the last action
    pub fn add_reward(&mut self, reward: f64) -> Result<()> {
        self.last_mut()?.reward = Some(reward);
        self.cumulative_reward += reward;
        Ok(())
    }

    /// Record the action values of the last observed state
    pub fn add_values(&mut self, values: Vec<f64>) -> Result<()> {
        self.last_mut()?.values = Some(values);
        Ok(())
    }

    /// Mark the episode as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    fn last_mut(&mut self) -> Result<&mut TimeStep> {
        self.steps.back_mut().ok_or(RLError::EmptyEpisode)
    }

    /// Number of states currently held
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if no state has been observed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Maximum number of time steps kept
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Sum of every reward received, including evicted steps
    #[must_use]
    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }

    /// Time step `t`
    #[must_use]
    pub fn step(&self, t: usize) -> Option<&TimeStep> {
        self.steps.get(t)
    }

    /// Iterate over the retained time steps, oldest first
    pub fn steps(&self) -> impl Iterator<Item = &TimeStep> {
        self.steps.iter()
    }

    /// State observed at time `t`
    #[must_use]
    pub fn state(&self, t: usize) -> Option<&[f64]> {
        self.steps.get(t).map(|s| s.state.as_slice())
    }

    /// Last observed state
    pub fn last_state(&self) -> Result<&[f64]> {
        self.steps
            .back()
            .map(|s| s.state.as_slice())
            .ok_or(RLError::EmptyEpisode)
    }

    /// Values stored for time `t`
    #[must_use]
    pub fn values(&self, t: usize) -> Option<&[f64]> {
        self.steps.get(t).and_then(|s| s.values.as_deref())
    }

    /// Mutable values stored for time `t`
    pub fn values_mut(&mut self, t: usize) -> Option<&mut Vec<f64>> {
        self.steps.get_mut(t).and_then(|s| s.values.as_mut())
    }

    /// Values of the last observed state
    pub fn last_values(&self) -> Result<&[f64]> {
        let t = self.len().checked_sub(1).ok_or(RLError::EmptyEpisode)?;
        self.values(t).ok_or_else(|| missing_values(t))
    }

    /// Action taken at time `t`
    #[must_use]
    pub fn action(&self, t: usize) -> Option<usize> {
        self.steps.get(t).and_then(|s| s.action)
    }

    /// Reward received at time `t`
    #[must_use]
    pub fn reward(&self, t: usize) -> Option<f64> {
        self.steps.get(t).and_then(|s| s.reward)
    }

    /// Iterate over the recorded states
    pub fn states(&self) -> impl Iterator<Item = &[f64]> {
        self.steps.iter().map(|s| s.state.as_slice())
    }

    /// Iterate over the recorded actions
    pub fn actions(&self) -> impl Iterator<Item = usize> + '_ {
        self.steps.iter().filter_map(|s| s.action)
    }

    /// Iterate over the recorded rewards
    pub fn rewards(&self) -> impl Iterator<Item = f64> + '_ {
        self.steps.iter().filter_map(|s| s.reward)
    }

    /// Number of recorded actions
    #[must_use]
    pub fn num_actions(&self) -> usize {
        self.actions().count()
    }

    /// Number of recorded rewards
    #[must_use]
    pub fn num_rewards(&self) -> usize {
        self.rewards().count()
    }

    /// Number of recorded value vectors
    #[must_use]
    pub fn num_values(&self) -> usize {
        self.steps.iter().filter(|s| s.values.is_some()).count()
    }

    /// Index of the most recent complete transition: the action was taken
    /// at `t` and values are known for both `t` and `t + 1`.
    #[must_use]
    pub fn last_transition(&self) -> Option<usize> {
        let t = self.len().checked_sub(2)?;
        self.transition(t).map(|_| t)
    }

    /// Transition at time `t` as `(action, reward)`, if both `t` and
    /// `t + 1` carry values.
    #[must_use]
    pub fn transition(&self, t: usize) -> Option<(usize, f64)> {
        let step = self.steps.get(t)?;
        let next = self.steps.get(t + 1)?;
        match (step.action, step.reward, &step.values, &next.values) {
            (Some(action), Some(reward), Some(_), Some(_)) => Some((action, reward)),
            _ => None,
        }
    }

    /// `len(states) == len(values) == len(actions) + 1 == len(rewards) + 1`,
    /// with the only missing action and reward on the last step.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let n = self.len();
        n > 0
            && self.num_values() == n
            && self.num_actions() + 1 == n
            && self.num_rewards() + 1 == n
            && self.steps.back().is_some_and(|s| s.action.is_none())
    }
}

impl Default for Episode {
    fn default() -> Self {
        Self::new()
    }
}

fn missing_values(t: usize) -> RLError {
    RLError::Model(format!("no values stored for time step {t}"))
}
