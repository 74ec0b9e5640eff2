//! Grid world with a goal and an obstacle

use async_trait::async_trait;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tdrl_core::{check_action, RLError, Result, Step, World};

/// Cell coordinates `(x, y)`, `y` growing downwards
pub type Cell = (usize, usize);

/// Grid of `width` × `height` cells.
///
/// Reaching the goal ends the episode with a reward of 10. Bumping into a
/// wall or the obstacle costs 2 and leaves the agent in place; any other
/// move costs 1. With a random start, every reset draws the start cell of
/// the following episode.
#[derive(Debug, Clone)]
pub struct GridWorld {
    width: usize,
    height: usize,
    initial: Cell,
    goal: Cell,
    obstacle: Option<Cell>,
    position: Cell,
    rng: Option<StdRng>,
}

impl GridWorld {
    /// Move up
    pub const UP: usize = 0;
    /// Move right
    pub const RIGHT: usize = 1;
    /// Move down
    pub const DOWN: usize = 2;
    /// Move left
    pub const LEFT: usize = 3;

    /// Create a deterministic grid without obstacle
    pub fn new(width: usize, height: usize, initial: Cell, goal: Cell) -> Result<Self> {
        let world = Self {
            width,
            height,
            initial,
            goal,
            obstacle: None,
            position: initial,
            rng: None,
        };
        world.check_cell("initial", initial)?;
        world.check_cell("goal", goal)?;
        if initial == goal {
            return Err(RLError::config("the initial cell cannot be the goal"));
        }
        Ok(world)
    }

    /// Block a cell
    pub fn with_obstacle(mut self, obstacle: Cell) -> Result<Self> {
        self.check_cell("obstacle", obstacle)?;
        if obstacle == self.goal || obstacle == self.initial {
            return Err(RLError::config(
                "the obstacle cannot be on the initial cell or the goal",
            ));
        }
        self.obstacle = Some(obstacle);
        Ok(self)
    }

    /// Draw a new start cell at every reset, from `seed` when given
    #[must_use]
    pub fn with_random_start(mut self, seed: Option<u64>) -> Self {
        self.rng = Some(match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        });
        self
    }

    /// Current cell
    #[must_use]
    pub fn position(&self) -> Cell {
        self.position
    }

    /// Start cell of the next episode
    #[must_use]
    pub fn initial(&self) -> Cell {
        self.initial
    }

    fn check_cell(&self, name: &str, (x, y): Cell) -> Result<()> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(RLError::config(format!(
                "{name} cell ({x}, {y}) is outside of the {}x{} grid",
                self.width, self.height
            )))
        }
    }

    fn is_free(&self, cell: Cell) -> bool {
        cell != self.goal && Some(cell) != self.obstacle
    }

    #[allow(clippy::cast_precision_loss)]
    fn state(&self) -> Vec<f64> {
        vec![self.position.0 as f64, self.position.1 as f64]
    }

    fn neighbour(&self, action: usize) -> Option<Cell> {
        let (x, y) = self.position;
        let cell = match action {
            Self::UP => (x, y.checked_sub(1)?),
            Self::RIGHT => (x + 1, y),
            Self::DOWN => (x, y + 1),
            _ => (x.checked_sub(1)?, y),
        };
        (cell.0 < self.width && cell.1 < self.height).then_some(cell)
    }
}

#[async_trait]
impl World for GridWorld {
    fn nb_actions(&self) -> usize {
        4
    }

    async fn reset(&mut self) -> Result<Vec<f64>> {
        self.position = self.initial;

        if self.rng.is_some() {
            let free: Vec<Cell> = (0..self.height)
                .flat_map(|y| (0..self.width).map(move |x| (x, y)))
                .filter(|cell| self.is_free(*cell))
                .collect();
            if let Some(cell) = self.rng.as_mut().and_then(|rng| free.choose(rng)) {
                self.initial = *cell;
            }
        }

        Ok(self.state())
    }

    async fn perform_action(&mut self, action: usize) -> Result<Step> {
        check_action(action, 4)?;

        match self.neighbour(action) {
            Some(cell) if cell == self.goal => {
                self.position = cell;
                Ok(Step::new(self.state(), 10.0, true))
            }
            Some(cell) if self.is_free(cell) => {
                self.position = cell;
                Ok(Step::new(self.state(), -1.0, false))
            }
            _ => Ok(Step::new(self.state(), -2.0, false)),
        }
    }
}
