//! Training loop
//!
//! [`TrainingLoop::run`] plays episodes of a [`World`], valuing every
//! observed state with a [`Model`] and choosing actions with a
//! [`LearningStrategy`]. The strategy applies the TD correction of the
//! previous step while deciding the next one; the model learns from the
//! corrected episodes once every `batch_size` episodes.

use metrics::{counter, histogram};
use rand::{rngs::StdRng, SeedableRng};
use tdrl_core::{
    check_values, Episode, LearningStrategy, Model, RLError, Result, StopSignal, TrainingConfig,
    World,
};
use tracing::{debug, warn};

use crate::utils::sample_action;

/// Runs episodes and trains a model
#[derive(Debug)]
pub struct TrainingLoop {
    config: TrainingConfig,
    rng: StdRng,
    stop: StopSignal,
}

impl TrainingLoop {
    /// Create a training loop. Action sampling is seeded from
    /// `config.seed` when set.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            stop: StopSignal::new(),
        })
    }

    /// Use an existing stop signal, e.g. one shared with a Ctrl-C listener
    #[must_use]
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that interrupts the loop at the next episode boundary
    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Run configuration
    #[must_use]
    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Play `num_episodes` episodes and return them.
    ///
    /// A stop request ends the run at the next episode boundary; the
    /// episodes completed so far are returned.
    pub async fn run<W, M, L>(
        &mut self,
        world: &mut W,
        model: &mut M,
        learning: &mut L,
    ) -> Result<Vec<Episode>>
    where
        W: World + ?Sized,
        M: Model + ?Sized,
        L: LearningStrategy + ?Sized,
    {
        let nb_actions = world.nb_actions();
        if model.nb_actions() != nb_actions || learning.nb_actions() != nb_actions {
            return Err(RLError::config(format!(
                "action counts differ: world {nb_actions}, model {}, learning {}",
                model.nb_actions(),
                learning.nb_actions()
            )));
        }

        let mut episodes = Vec::with_capacity(self.config.num_episodes);
        let mut batch_start = 0;

        for index in 0..self.config.num_episodes {
            if self.stop.is_stopped() {
                warn!(completed = episodes.len(), "training interrupted");
                break;
            }

            let (episode, steps) = self.run_episode(world, model, learning).await?;
            debug!(
                episode = index,
                steps,
                reward = episode.cumulative_reward(),
                "episode finished"
            );
            counter!("tdrl_episodes_total", 1);
            counter!("tdrl_steps_total", steps as u64);
            histogram!("tdrl_episode_reward", episode.cumulative_reward());

            episodes.push(episode);
            if episodes.len() - batch_start >= self.config.batch_size {
                debug!(episodes = episodes.len() - batch_start, "training model");
                model.learn(&episodes[batch_start..]).await?;
                batch_start = episodes.len();
            }
        }

        Ok(episodes)
    }

    async fn run_episode<W, M, L>(
        &mut self,
        world: &mut W,
        model: &mut M,
        learning: &mut L,
    ) -> Result<(Episode, usize)>
    where
        W: World + ?Sized,
        M: Model + ?Sized,
        L: LearningStrategy + ?Sized,
    {
        let nb_actions = world.nb_actions();
        let mut episode = Episode::with_capacity(self.config.episode_capacity)?;

        let initial = world.reset().await?;
        episode.add_state(world.encode(&initial)?);
        add_model_values(&mut episode, model, nb_actions).await?;

        let mut steps = 0;
        let mut terminal = false;
        while steps < self.config.max_episode_length && !terminal {
            let scores = learning.actions(&mut episode)?;
            check_values(&scores.values, nb_actions)?;
            let action = sample_action(&scores.values, &mut self.rng)?;

            let step = world.perform_action(action).await?;
            episode.add_reward(step.reward)?;
            episode.add_action(action)?;
            episode.add_state(world.encode(&step.state)?);
            add_model_values(&mut episode, model, nb_actions).await?;

            terminal = step.terminal;
            steps += 1;
        }

        // Correct the values of the final transition
        learning.actions(&mut episode)?;
        learning.finish_episode(&mut episode)?;
        episode.finish();

        Ok((episode, steps))
    }
}

async fn add_model_values<M: Model + ?Sized>(
    episode: &mut Episode,
    model: &mut M,
    nb_actions: usize,
) -> Result<()> {
    let values = model.values(episode).await?;
    check_values(&values, nb_actions)?;
    episode.add_values(values)
}
