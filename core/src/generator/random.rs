use ndarray::Array2;
use rand::prelude::*;

use super::*;

/// How many times an all-mine draw is redrawn before a mine is removed by force.
pub const MAX_REGENERATE_ATTEMPTS: u32 = 32;

/// Generation strategy where every cell independently becomes a mine with the configured
/// probability, so the mine count itself is random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinefieldGenerator {
    seed: u64,
}

impl RandomMinefieldGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl MinefieldGenerator for RandomMinefieldGenerator {
    fn generate(self, config: &GameConfig) -> Result<Board> {
        config.validate()?;

        let shape = nd_shape(config.size);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let draw = |rng: &mut SmallRng| {
            Array2::from_shape_simple_fn(shape, || {
                rng.random::<f64>() < config.mine_probability
            })
        };

        let mut mines = draw(&mut rng);
        let mut attempts = 1;
        while mines.iter().all(|&is_mine| is_mine) && attempts < MAX_REGENERATE_ATTEMPTS {
            log::debug!("Drew a minefield with no safe cell, redrawing (attempt {attempts})");
            mines = draw(&mut rng);
            attempts += 1;
        }

        if mines.iter().all(|&is_mine| is_mine) {
            log::warn!(
                "Minefield still full after {} draws, clearing one cell",
                MAX_REGENERATE_ATTEMPTS
            );
            let cleared = rng.random_range(0..mines.len());
            let cols = shape.1;
            mines[(cleared / cols, cleared % cols)] = false;
        }

        Board::from_mine_mask(mines)
    }
}
