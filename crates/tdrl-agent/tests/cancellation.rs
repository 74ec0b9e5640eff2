use async_trait::async_trait;
use tdrl_agent::{EGreedy, QLearning, TrainingLoop};
use tdrl_core::{DiscreteModel, Episode, Model, Result, StopSignal, TrainingConfig};
use tdrl_env::Corridor;

/// Requests a stop once it has learned from `limit` batches
struct StopAfter {
    inner: DiscreteModel,
    stop: StopSignal,
    learned: usize,
    limit: usize,
}

#[async_trait]
impl Model for StopAfter {
    fn nb_actions(&self) -> usize {
        self.inner.nb_actions()
    }

    async fn values(&mut self, episode: &Episode) -> Result<Vec<f64>> {
        self.inner.values(episode).await
    }

    async fn learn(&mut self, episodes: &[Episode]) -> Result<()> {
        self.inner.learn(episodes).await?;
        self.learned += 1;
        if self.learned == self.limit {
            self.stop.stop();
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_interrupt_after_third_episode() {
    let stop = StopSignal::new();
    let mut world = Corridor::new(5).unwrap();
    let mut model = StopAfter {
        inner: DiscreteModel::new(2).unwrap(),
        stop: stop.clone(),
        learned: 0,
        limit: 3,
    };
    let mut learning = EGreedy::new(QLearning::new(2, 0.5, 0.9).unwrap(), 0.1).unwrap();
    let mut trainer = TrainingLoop::new(TrainingConfig::new(100, 50, 1).with_seed(3))
        .unwrap()
        .with_stop_signal(stop.clone());

    let episodes = trainer.run(&mut world, &mut model, &mut learning).await.unwrap();

    assert!(stop.is_stopped());
    assert_eq!(episodes.len(), 3);
    for episode in &episodes {
        assert!(episode.is_well_formed());
        assert!(episode.finished_at.is_some());
    }
}

#[tokio::test]
async fn test_stop_from_another_task() {
    let mut trainer = TrainingLoop::new(TrainingConfig::new(100, 50, 1)).unwrap();
    let stop = trainer.stop_signal();

    let waiter = tokio::spawn({
        let stop = stop.clone();
        async move { stop.stopped().await }
    });
    stop.stop();
    waiter.await.unwrap();

    let mut world = Corridor::new(5).unwrap();
    let mut model = DiscreteModel::new(2).unwrap();
    let mut learning = EGreedy::new(QLearning::new(2, 0.5, 0.9).unwrap(), 0.1).unwrap();
    let episodes = trainer.run(&mut world, &mut model, &mut learning).await.unwrap();

    assert!(episodes.is_empty());
}
