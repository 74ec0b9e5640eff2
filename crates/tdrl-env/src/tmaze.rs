//! T-maze: a partially observable corridor

use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tdrl_core::{check_action, RLError, Result, Step, World};

/// Corridor of `length` cells ending in a T junction.
///
/// One arm of the junction pays 10, the other 0, and both end the
/// episode. The state is `(position, hint)` where the hint is 1 when the
/// upper arm pays, 2 when the lower arm pays, and 0 once more than
/// `info_time` actions have been taken. Moving against a wall costs 2,
/// any other move 1.
#[derive(Debug, Clone)]
pub struct TMaze {
    length: usize,
    info_time: usize,
    position: usize,
    timestep: usize,
    target: usize,
    rng: StdRng,
}

impl TMaze {
    /// Enter the upper arm
    pub const UP: usize = 0;
    /// Enter the lower arm
    pub const DOWN: usize = 1;
    /// Move back along the corridor
    pub const LEFT: usize = 2;
    /// Move towards the junction
    pub const RIGHT: usize = 3;

    /// Create a T-maze whose rewarding arm is drawn at random
    pub fn new(length: usize, info_time: usize) -> Result<Self> {
        Self::build(length, info_time, StdRng::from_entropy())
    }

    /// Create a T-maze whose arms are drawn from `seed`
    pub fn with_seed(length: usize, info_time: usize, seed: u64) -> Result<Self> {
        Self::build(length, info_time, StdRng::seed_from_u64(seed))
    }

    fn build(length: usize, info_time: usize, rng: StdRng) -> Result<Self> {
        if length < 2 {
            return Err(RLError::config(format!(
                "a T-maze needs at least 2 cells, got {length}"
            )));
        }
        Ok(Self {
            length,
            info_time,
            position: 0,
            timestep: 0,
            target: Self::UP,
            rng,
        })
    }

    /// Arm that pays in the current episode, [`TMaze::UP`] or [`TMaze::DOWN`]
    #[must_use]
    pub fn target(&self) -> usize {
        self.target
    }

    #[allow(clippy::cast_precision_loss)]
    fn state(&self) -> Vec<f64> {
        let hint = if self.timestep <= self.info_time {
            self.target + 1
        } else {
            0
        };
        vec![self.position as f64, hint as f64]
    }

    fn arm_reward(&self, arm: usize) -> f64 {
        if arm == self.target {
            10.0
        } else {
            0.0
        }
    }
}

#[async_trait]
impl World for TMaze {
    fn nb_actions(&self) -> usize {
        4
    }

    async fn reset(&mut self) -> Result<Vec<f64>> {
        self.position = 0;
        self.timestep = 0;
        self.target = if self.rng.gen_bool(0.5) {
            Self::UP
        } else {
            Self::DOWN
        };
        Ok(self.state())
    }

    async fn perform_action(&mut self, action: usize) -> Result<Step> {
        check_action(action, 4)?;
        self.timestep += 1;

        let at_junction = self.position == self.length - 1;
        let (reward, terminal) = match action {
            Self::UP | Self::DOWN if at_junction => (self.arm_reward(action), true),
            Self::LEFT if self.position > 0 => {
                self.position -= 1;
                (-1.0, false)
            }
            Self::RIGHT if !at_junction => {
                self.position += 1;
                (-1.0, false)
            }
            _ => (-2.0, false),
        };

        Ok(Step::new(self.state(), reward, terminal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[tokio::test]
    async fn test_hint_disappears_after_info_time() {
        let mut maze = TMaze::with_seed(4, 1, 9).unwrap();
        let state = maze.reset().await.unwrap();
        let hint = (maze.target() + 1) as f64;
        assert_eq!(state, vec![0.0, hint]);

        let step = maze.perform_action(TMaze::RIGHT).await.unwrap();
        assert_eq!(step, Step::new(vec![1.0, hint], -1.0, false));

        let step = maze.perform_action(TMaze::RIGHT).await.unwrap();
        assert_eq!(step, Step::new(vec![2.0, 0.0], -1.0, false));
    }

    #[tokio::test]
    async fn test_walls_cost_two() {
        let mut maze = TMaze::with_seed(3, 5, 1).unwrap();
        maze.reset().await.unwrap();

        for action in [TMaze::UP, TMaze::DOWN, TMaze::LEFT] {
            let step = maze.perform_action(action).await.unwrap();
            assert_abs_diff_eq!(step.reward, -2.0);
            assert!(!step.terminal);
            assert_abs_diff_eq!(step.state[0], 0.0);
        }
    }

    #[tokio::test]
    async fn test_arms_pay_according_to_target() {
        let mut maze = TMaze::with_seed(2, 0, 3).unwrap();
        for _ in 0..10 {
            maze.reset().await.unwrap();
            let target = maze.target();
            maze.perform_action(TMaze::RIGHT).await.unwrap();

            let blocked = maze.perform_action(TMaze::RIGHT).await.unwrap();
            assert_abs_diff_eq!(blocked.reward, -2.0);

            let wrong = if target == TMaze::UP { TMaze::DOWN } else { TMaze::UP };
            let mut other = maze.clone();
            let step = other.perform_action(wrong).await.unwrap();
            assert!(step.terminal);
            assert_abs_diff_eq!(step.reward, 0.0);

            let step = maze.perform_action(target).await.unwrap();
            assert!(step.terminal);
            assert_abs_diff_eq!(step.reward, 10.0);
        }
    }

    #[test]
    fn test_too_short() {
        assert!(TMaze::new(1, 2).is_err());
    }
}
