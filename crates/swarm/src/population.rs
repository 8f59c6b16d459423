//! # Seeded Population
//!
//! Fills storage with random entities. The same seed always yields the same
//! rows, in the same order, on every platform.
//!
//! | Field      | Distribution          |
//! |------------|-----------------------|
//! | `px`, `py` | uniform `[0, 1)`      |
//! | `vx`, `vy` | uniform `[0, 0.01)`   |
//! | `health`   | uniform `0..100`      |

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swarm_core::{
    Archetype, EntityIdAllocator, Health, Position, RowLocation, SwarmResult, Velocity, World,
};

/// Upper bound (exclusive) of generated velocity components.
const MAX_SPEED: f32 = 0.01;

/// Upper bound (exclusive) of generated health.
const MAX_HEALTH: Health = 100;

/// Deterministic source of initial entity state.
#[derive(Clone, Debug)]
pub struct Populator {
    rng: ChaCha8Rng,
}

impl Populator {
    /// Seed used when none is given.
    pub const DEFAULT_SEED: u64 = 42;

    /// Creates a populator from `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Draws the next entity's components.
    pub fn next_entity(&mut self) -> (Position, Velocity, Health) {
        let position = Position::new(self.rng.gen::<f32>(), self.rng.gen::<f32>());
        let velocity = Velocity::new(
            self.rng.gen::<f32>() * MAX_SPEED,
            self.rng.gen::<f32>() * MAX_SPEED,
        );
        let health = self.rng.gen_range(0..MAX_HEALTH);
        (position, velocity, health)
    }

    /// Spawns `count` entities into `world`.
    ///
    /// # Errors
    ///
    /// Returns the first allocation error; entities spawned before it stay.
    pub fn populate_world(&mut self, world: &mut World, count: usize) -> SwarmResult<()> {
        for _ in 0..count {
            let (position, velocity, health) = self.next_entity();
            world.spawn(position, velocity, health)?;
        }
        Ok(())
    }

    /// Appends `count` entities to `archetype`, issuing ids from `ids`.
    ///
    /// # Returns
    ///
    /// The location of every inserted row, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns the first allocation error; rows inserted before it stay.
    pub fn populate_archetype(
        &mut self,
        archetype: &mut Archetype,
        ids: &mut EntityIdAllocator,
        count: usize,
    ) -> SwarmResult<Vec<RowLocation>> {
        let mut locations = Vec::with_capacity(count);
        for _ in 0..count {
            let (position, velocity, health) = self.next_entity();
            locations.push(archetype.add_entity(ids.create(), position, velocity, health)?);
        }
        Ok(locations)
    }
}

impl Default for Populator {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SEED)
    }
}
