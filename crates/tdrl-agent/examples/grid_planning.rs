//! Example: model-based planning on a one-hot encoded grid world

use tdrl_agent::{
    windowed_means, AdaptiveSoftmax, EGreedy, LinearModel, ModelWorld, PlanningModel, QLearning,
    TrainingLoop,
};
use tdrl_core::{DiscreteModel, Encoding, TrainingConfig, World};
use tdrl_env::{Encoded, GridWorld};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let encoding = Encoding::one_hot(vec![5, 5]);
    let state_dim = encoding.output_dim().unwrap_or(2);
    let grid = GridWorld::new(5, 5, (0, 0), (4, 4))?.with_obstacle((2, 2))?;
    let mut world = Encoded::new(grid, encoding);
    let nb_actions = world.nb_actions();

    // The surrogate predicts state deltas and the reward
    let surrogate = ModelWorld::new(
        state_dim,
        nb_actions,
        Box::new(LinearModel::new(state_dim + 1, 0.5, 20)?),
    )?;
    let rollout_learning = EGreedy::new(QLearning::new(nb_actions, 0.3, 0.95)?, 0.2)?;
    let mut model = PlanningModel::new(
        surrogate,
        Box::new(DiscreteModel::new(nb_actions)?),
        Box::new(rollout_learning),
    )?
    .with_rollouts(5, Some(7))?;

    let mut learning = AdaptiveSoftmax::new(QLearning::new(nb_actions, 0.3, 0.95)?)?;
    let mut trainer = TrainingLoop::new(TrainingConfig::new(100, 80, 1).with_seed(7))?;
    let _listener = trainer.stop_signal().listen_for_ctrl_c();

    let episodes = trainer.run(&mut world, &mut model, &mut learning).await?;

    for (window, mean) in windowed_means(&episodes, 10)?.iter().enumerate() {
        println!("Episodes {:>3}-{:>3}: Mean Reward = {mean:.2}", window * 10, window * 10 + 9);
    }
    Ok(())
}
