use tdrl_agent::{EGreedy, LinearModel, ModelWorld, PlanningModel, QLearning, TrainingLoop};
use tdrl_core::{DiscreteModel, Model, TrainingConfig};
use tdrl_env::Corridor;

#[tokio::test]
async fn test_planner_drives_a_real_run() {
    let surrogate = ModelWorld::new(1, 2, Box::new(LinearModel::new(2, 0.5, 20).unwrap())).unwrap();
    let target = DiscreteModel::new(2).unwrap();
    let rollout_learning = EGreedy::new(QLearning::new(2, 0.5, 0.9).unwrap(), 0.2).unwrap();
    let mut planner = PlanningModel::new(surrogate, Box::new(target), Box::new(rollout_learning))
        .unwrap()
        .with_rollouts(5, Some(1))
        .unwrap();

    let mut world = Corridor::new(4).unwrap();
    let mut learning = EGreedy::new(QLearning::new(2, 0.5, 0.9).unwrap(), 0.1).unwrap();
    let mut trainer = TrainingLoop::new(TrainingConfig::new(6, 25, 1).with_seed(12)).unwrap();

    let episodes = trainer
        .run(&mut world, &mut planner, &mut learning)
        .await
        .unwrap();

    assert_eq!(episodes.len(), 6);
    assert!(episodes.iter().all(|e| e.is_well_formed()));
    assert_eq!(planner.nb_actions(), 2);
    assert_eq!(planner.surrogate().state_dim(), 1);

    // The surrogate has seen real transitions and now predicts moves
    let mut probe = tdrl_core::Episode::new();
    probe.add_state(vec![0.0]);
    let values = planner.values(&probe).await.unwrap();
    assert_eq!(values.len(), 2);
    assert!(values.iter().all(|v| v.is_finite()));
}
