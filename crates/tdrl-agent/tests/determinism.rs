use async_trait::async_trait;
use tdrl_agent::{EGreedy, QLearning, TrainingLoop};
use tdrl_core::{DiscreteModel, Episode, Model, Result, TrainingConfig};
use tdrl_env::{Encoded, GridWorld};

fn grid() -> Encoded<GridWorld> {
    let world = GridWorld::new(4, 4, (0, 0), (3, 3))
        .unwrap()
        .with_obstacle((1, 1))
        .unwrap();
    Encoded::one_hot(world, vec![4, 4])
}

async fn play(seed: u64) -> Vec<Episode> {
    let mut world = grid();
    let mut model = DiscreteModel::new(4).unwrap();
    let mut learning = EGreedy::new(QLearning::new(4, 0.3, 0.95).unwrap(), 0.2).unwrap();
    let mut trainer = TrainingLoop::new(TrainingConfig::new(20, 40, 2).with_seed(seed)).unwrap();
    trainer.run(&mut world, &mut model, &mut learning).await.unwrap()
}

fn trace(episodes: &[Episode]) -> Vec<(Vec<usize>, Vec<f64>)> {
    episodes
        .iter()
        .map(|e| (e.actions().collect(), e.rewards().collect()))
        .collect()
}

#[tokio::test]
async fn test_same_seed_same_run() {
    let first = play(17).await;
    let second = play(17).await;
    assert_eq!(trace(&first), trace(&second));

    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.steps().collect::<Vec<_>>(), b.steps().collect::<Vec<_>>());
        assert_ne!(a.id, b.id);
    }
}

/// Checks the alignment of the episode every time it is asked for values
struct AlignmentChecker {
    inner: DiscreteModel,
    checks: usize,
}

#[async_trait]
impl Model for AlignmentChecker {
    fn nb_actions(&self) -> usize {
        self.inner.nb_actions()
    }

    async fn values(&mut self, episode: &Episode) -> Result<Vec<f64>> {
        let n = episode.len();
        assert!(n >= 1);
        assert_eq!(episode.num_values() + 1, n);
        assert_eq!(episode.num_actions() + 1, n);
        assert_eq!(episode.num_rewards() + 1, n);
        self.checks += 1;
        self.inner.values(episode).await
    }

    async fn learn(&mut self, episodes: &[Episode]) -> Result<()> {
        assert!(episodes.iter().all(Episode::is_well_formed));
        self.inner.learn(episodes).await
    }
}

#[tokio::test]
async fn test_alignment_at_every_observation() {
    let mut world = grid();
    let mut model = AlignmentChecker {
        inner: DiscreteModel::new(4).unwrap(),
        checks: 0,
    };
    let mut learning = EGreedy::new(QLearning::new(4, 0.3, 0.95).unwrap(), 0.2).unwrap();
    let config = TrainingConfig::new(10, 60, 1)
        .with_seed(5)
        .with_episode_capacity(10);
    let mut trainer = TrainingLoop::new(config).unwrap();

    let episodes = trainer.run(&mut world, &mut model, &mut learning).await.unwrap();

    // The goal is at least 6 moves away
    assert!(model.checks >= 10 * 7);
    for episode in &episodes {
        assert!(episode.is_well_formed());
        assert!(episode.len() <= 10);
    }
}
