//! Example: train against a corridor simulated on its own thread, the way
//! a robot or remote simulator would be driven

use std::thread;

use tdrl_agent::{episode_rewards, EGreedy, QLearning, TrainingLoop};
use tdrl_core::{DiscreteModel, Step, TrainingConfig, World};
use tdrl_env::bridge::{self, BridgeCommand};

const LENGTH: i32 = 6;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let (mut peer, connector) = bridge::channel();
    let simulator = thread::spawn(move || -> tdrl_core::Result<()> {
        peer.announce(2, vec![0.0])?;
        let mut position = 0;
        while let Some(command) = peer.blocking_next_command() {
            let step = match command {
                BridgeCommand::Reset => {
                    position = 0;
                    Step::new(vec![0.0], 0.0, false)
                }
                BridgeCommand::Action(action) => {
                    position = if action == 1 { position + 1 } else { (position - 1).max(0) };
                    let done = position == LENGTH - 1;
                    Step::new(vec![f64::from(position)], if done { 10.0 } else { -1.0 }, done)
                }
            };
            peer.publish(step)?;
        }
        Ok(())
    });

    let mut world = connector.connect().await?;
    let mut model = DiscreteModel::new(world.nb_actions())?;
    let mut learning = EGreedy::new(QLearning::new(world.nb_actions(), 0.5, 0.9)?, 0.1)?;
    let mut trainer = TrainingLoop::new(TrainingConfig::new(50, 60, 1))?;

    let episodes = trainer.run(&mut world, &mut model, &mut learning).await?;
    world.close().await?;
    drop(world);

    match simulator.join() {
        Ok(result) => result?,
        Err(error) => anyhow::bail!("simulator thread panicked: {error:?}"),
    }

    for (episode, reward) in episode_rewards(&episodes).iter().enumerate() {
        println!("Episode {}: Total Reward = {reward:.2}", episode + 1);
    }
    Ok(())
}
