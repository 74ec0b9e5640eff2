//! Model-based planning
//!
//! A [`ModelWorld`] is a learned approximation of a real world. A
//! [`PlanningModel`] uses it to run short simulated rollouts every time it
//! is asked for values, so that its target model is trained on imagined
//! trajectories between real steps.

use async_trait::async_trait;
use tdrl_core::{
    check_action, check_values, Episode, LearningStrategy, Model, RLError, Result, Step,
    TrainingConfig, World,
};
use tracing::trace;

use crate::trainer::TrainingLoop;

/// Number of simulated rollouts per call to [`PlanningModel::values`]
pub const ROLLOUT_COUNT: usize = 3;
/// Upper bound on the length of a simulated rollout
pub const MAX_ROLLOUT_LENGTH: usize = 10;

/// World simulated by a regression model.
///
/// The inner model is given `state ++ one_hot(action)` and predicts
/// `state_dim + 1` outputs: the change of every state coordinate followed
/// by the reward. States are already encoded, so the world encodes with
/// the identity. Simulated episodes never terminate.
pub struct ModelWorld {
    state_dim: usize,
    nb_actions: usize,
    inner: Box<dyn Model>,
    query: Episode,
    start: Vec<f64>,
    state: Vec<f64>,
}

impl ModelWorld {
    /// Create a surrogate world over `state_dim`-dimensional states
    pub fn new(state_dim: usize, nb_actions: usize, inner: Box<dyn Model>) -> Result<Self> {
        if state_dim == 0 || nb_actions == 0 {
            return Err(RLError::config(
                "a model world needs at least one state dimension and one action",
            ));
        }
        if inner.nb_actions() != state_dim + 1 {
            return Err(RLError::config(format!(
                "the inner model must predict {} outputs, it predicts {}",
                state_dim + 1,
                inner.nb_actions()
            )));
        }
        Ok(Self {
            state_dim,
            nb_actions,
            inner,
            query: Episode::with_capacity(2)?,
            start: vec![0.0; state_dim],
            state: vec![0.0; state_dim],
        })
    }

    /// Dimension of the simulated states
    #[must_use]
    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    /// State returned by the next reset
    pub fn set_start(&mut self, state: Vec<f64>) -> Result<()> {
        self.check_state(&state)?;
        self.start = state;
        Ok(())
    }

    /// Input of the inner model for `action` taken in `state`
    #[must_use]
    pub fn make_input(&self, state: &[f64], action: usize) -> Vec<f64> {
        let mut input = Vec::with_capacity(state.len() + self.nb_actions);
        input.extend_from_slice(state);
        input.extend((0..self.nb_actions).map(|a| if a == action { 1.0 } else { 0.0 }));
        input
    }

    /// Train the inner model on every complete transition of `episodes`
    pub async fn learn(&mut self, episodes: &[Episode]) -> Result<()> {
        let mut samples = Vec::new();
        for episode in episodes {
            for t in 0..episode.len().saturating_sub(1) {
                let (Some(action), Some(reward), Some(state), Some(next)) = (
                    episode.action(t),
                    episode.reward(t),
                    episode.state(t),
                    episode.state(t + 1),
                ) else {
                    continue;
                };
                self.check_state(state)?;
                self.check_state(next)?;
                check_action(action, self.nb_actions)?;

                let mut target: Vec<f64> = next.iter().zip(state).map(|(n, s)| n - s).collect();
                target.push(reward);
                samples.push((self.make_input(state, action), target));
            }
        }
        if samples.is_empty() {
            return Ok(());
        }

        let mut supervised = Episode::with_capacity(samples.len().max(2))?;
        for (input, target) in samples {
            supervised.add_state(input);
            supervised.add_values(target)?;
        }
        self.inner.learn(std::slice::from_ref(&supervised)).await
    }

    fn check_state(&self, state: &[f64]) -> Result<()> {
        if state.len() == self.state_dim {
            Ok(())
        } else {
            Err(RLError::DimensionMismatch {
                expected: self.state_dim,
                actual: state.len(),
            })
        }
    }
}

#[async_trait]
impl World for ModelWorld {
    fn nb_actions(&self) -> usize {
        self.nb_actions
    }

    async fn reset(&mut self) -> Result<Vec<f64>> {
        self.state.clone_from(&self.start);
        Ok(self.start.clone())
    }

    async fn perform_action(&mut self, action: usize) -> Result<Step> {
        check_action(action, self.nb_actions)?;

        let input = self.make_input(&self.state, action);
        self.query.add_state(input);
        let prediction = self.inner.values(&self.query).await?;
        check_values(&prediction, self.state_dim + 1)?;

        for (x, delta) in self.state.iter_mut().zip(&prediction) {
            *x += delta;
        }
        let reward = prediction[self.state_dim];
        Ok(Step::new(self.state.clone(), reward, false))
    }
}

/// Model that plans with simulated rollouts before answering.
///
/// Every call to `values` runs [`ROLLOUT_COUNT`] rollouts in the
/// surrogate world, starting from the last state of the episode, with the
/// target model and learning strategy, then returns the target model's
/// values. `learn` trains the surrogate world on the real transitions.
pub struct PlanningModel {
    surrogate: ModelWorld,
    target: Box<dyn Model>,
    learning: Box<dyn LearningStrategy>,
    trainer: TrainingLoop,
}

impl PlanningModel {
    /// Plan with rollouts of [`MAX_ROLLOUT_LENGTH`] steps
    pub fn new(
        surrogate: ModelWorld,
        target: Box<dyn Model>,
        learning: Box<dyn LearningStrategy>,
    ) -> Result<Self> {
        let nb_actions = surrogate.nb_actions();
        if target.nb_actions() != nb_actions || learning.nb_actions() != nb_actions {
            return Err(RLError::config(format!(
                "action counts differ: surrogate {nb_actions}, target model {}, learning {}",
                target.nb_actions(),
                learning.nb_actions()
            )));
        }
        Ok(Self {
            surrogate,
            target,
            learning,
            trainer: rollout_trainer(MAX_ROLLOUT_LENGTH, None)?,
        })
    }

    /// Use shorter rollouts and, optionally, a fixed sampling seed
    pub fn with_rollouts(mut self, length: usize, seed: Option<u64>) -> Result<Self> {
        if length == 0 || length > MAX_ROLLOUT_LENGTH {
            return Err(RLError::config(format!(
                "rollout length must be in [1, {MAX_ROLLOUT_LENGTH}], got {length}"
            )));
        }
        self.trainer = rollout_trainer(length, seed)?;
        Ok(self)
    }

    /// Surrogate world
    #[must_use]
    pub fn surrogate(&self) -> &ModelWorld {
        &self.surrogate
    }
}

fn rollout_trainer(length: usize, seed: Option<u64>) -> Result<TrainingLoop> {
    let config = TrainingConfig {
        seed,
        ..TrainingConfig::new(ROLLOUT_COUNT, length, 1)
    };
    TrainingLoop::new(config)
}

#[async_trait]
impl Model for PlanningModel {
    fn nb_actions(&self) -> usize {
        self.target.nb_actions()
    }

    async fn values(&mut self, episode: &Episode) -> Result<Vec<f64>> {
        self.surrogate.set_start(episode.last_state()?.to_vec())?;
        let rollouts = self
            .trainer
            .run(&mut self.surrogate, &mut self.target, &mut self.learning)
            .await?;
        trace!(rollouts = rollouts.len(), "planning rollouts finished");

        self.target.values(episode).await
    }

    async fn learn(&mut self, episodes: &[Episode]) -> Result<()> {
        self.surrogate.learn(episodes).await
    }
}
