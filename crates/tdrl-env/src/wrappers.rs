//! World wrappers

use async_trait::async_trait;
use tdrl_core::{Encoding, Result, Step, World};

/// World whose states are encoded before they reach the episode, e.g. as
/// one-hot vectors of their coordinates
#[derive(Debug, Clone)]
pub struct Encoded<W> {
    /// Inner world
    pub world: W,
    /// Encoding applied after the inner world's own encoding
    pub encoding: Encoding,
}

impl<W: World> Encoded<W> {
    /// Wrap `world`
    pub fn new(world: W, encoding: Encoding) -> Self {
        Self { world, encoding }
    }

    /// One-hot encode every coordinate of `world`'s states, coordinate `i`
    /// taking values in `[0, ranges[i])`
    pub fn one_hot(world: W, ranges: Vec<usize>) -> Self {
        Self::new(world, Encoding::one_hot(ranges))
    }
}

#[async_trait]
impl<W: World> World for Encoded<W> {
    fn nb_actions(&self) -> usize {
        self.world.nb_actions()
    }

    async fn reset(&mut self) -> Result<Vec<f64>> {
        self.world.reset().await
    }

    async fn perform_action(&mut self, action: usize) -> Result<Step> {
        self.world.perform_action(action).await
    }

    fn encode(&self, state: &[f64]) -> Result<Vec<f64>> {
        self.encoding.apply(&self.world.encode(state)?)
    }

    async fn close(&mut self) -> Result<()> {
        self.world.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GridWorld;

    #[tokio::test]
    async fn test_one_hot_grid() {
        let grid = GridWorld::new(3, 2, (0, 0), (2, 1)).unwrap();
        let mut world = Encoded::one_hot(grid, vec![3, 2]);

        let initial = world.reset().await.unwrap();
        assert_eq!(
            world.encode(&initial).unwrap(),
            vec![1.0, 0.0, 0.0, 1.0, 0.0]
        );

        let step = world.perform_action(GridWorld::RIGHT).await.unwrap();
        assert_eq!(step.state, vec![1.0, 0.0]);
        assert_eq!(
            world.encode(&step.state).unwrap(),
            vec![0.0, 1.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(world.nb_actions(), 4);
    }

    #[test]
    fn test_out_of_range_state_is_rejected() {
        let grid = GridWorld::new(3, 2, (0, 0), (2, 1)).unwrap();
        let world = Encoded::one_hot(grid, vec![3, 2]);
        assert!(world.encode(&[3.0, 0.0]).is_err());
    }
}
