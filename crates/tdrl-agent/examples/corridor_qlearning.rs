//! Train epsilon-greedy Q-learning on a corridor and print the learning
//! curve. Press Ctrl-C to stop early.
//!
//! ```text
//! RUST_LOG=tdrl_agent=debug cargo run -p tdrl-agent --example corridor_qlearning
//! ```

use tdrl_agent::{windowed_means, StrategyConfig, TrainingLoop};
use tdrl_core::{DiscreteModel, TrainingConfig, World};
use tdrl_env::Corridor;
use tracing::info;
use tracing_subscriber::EnvFilter;

const STRATEGY: &str = r#"{
    "kind": "egreedy",
    "epsilon": 0.1,
    "inner": {"kind": "qlearning", "alpha": 0.5, "gamma": 0.9}
}"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let mut world = Corridor::new(5)?;
    let mut model = DiscreteModel::new(world.nb_actions())?;
    let mut learning = StrategyConfig::from_json(STRATEGY)?.build(world.nb_actions())?;

    let config = TrainingConfig::new(200, 50, 1).with_seed(42);
    let mut trainer = TrainingLoop::new(config)?;
    let _listener = trainer.stop_signal().listen_for_ctrl_c();

    let episodes = trainer.run(&mut world, &mut model, &mut learning).await?;
    info!(episodes = episodes.len(), "training finished");

    for (window, mean) in windowed_means(&episodes, 20)?.iter().enumerate() {
        println!("episodes {:>3}-{:>3}: {mean:>7.2}", window * 20, window * 20 + 19);
    }
    Ok(())
}
