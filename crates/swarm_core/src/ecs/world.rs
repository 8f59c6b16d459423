//! # World
//!
//! The owner of entity lifetime: one id allocator, one archetype and the
//! executor that runs systems over it. Independent worlds share nothing.

use super::archetype::{Archetype, RowLocation};
use super::component::{Health, Position, Velocity};
use super::entity::{EntityId, EntityIdAllocator};
use crate::config::SwarmConfig;
use crate::error::SwarmResult;
use crate::systems::Executor;

/// A self-contained simulation: ids, storage and systems.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::new(&SwarmConfig::default())?;
/// world.spawn(Position::new(0.0, 0.0), Velocity::new(1.0, 1.0), 100)?;
/// world.tick(1.0);
/// ```
#[derive(Debug)]
pub struct World {
    /// Issues and recycles entity ids.
    ids: EntityIdAllocator,
    /// Entity rows.
    archetype: Archetype,
    /// Runs the systems.
    executor: Executor,
}

impl World {
    /// Creates an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`](crate::SwarmError::InvalidConfig)
    /// for out-of-range settings and any executor construction error.
    pub fn new(config: &SwarmConfig) -> SwarmResult<Self> {
        Ok(Self {
            ids: EntityIdAllocator::new(),
            archetype: Archetype::from_config(&config.storage)?,
            executor: Executor::new(&config.executor)?,
        })
    }

    /// Creates an empty world around an existing executor.
    ///
    /// # Errors
    ///
    /// Returns [`SwarmError::InvalidConfig`](crate::SwarmError::InvalidConfig)
    /// for out-of-range storage settings.
    pub fn with_executor(config: &SwarmConfig, executor: Executor) -> SwarmResult<Self> {
        Ok(Self {
            ids: EntityIdAllocator::new(),
            archetype: Archetype::from_config(&config.storage)?,
            executor,
        })
    }

    /// Issues an id and appends the entity's row.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if a new chunk cannot be allocated. The
    /// id is returned to the allocator in that case.
    pub fn spawn(
        &mut self,
        position: Position,
        velocity: Velocity,
        health: Health,
    ) -> SwarmResult<EntityId> {
        self.spawn_located(position, velocity, health)
            .map(|(id, _)| id)
    }

    /// As [`spawn`](Self::spawn), also returning where the row was written.
    ///
    /// # Errors
    ///
    /// As [`spawn`](Self::spawn).
    pub fn spawn_located(
        &mut self,
        position: Position,
        velocity: Velocity,
        health: Health,
    ) -> SwarmResult<(EntityId, RowLocation)> {
        let id = self.ids.create();
        match self.archetype.add_entity(id, position, velocity, health) {
            Ok(location) => Ok((id, location)),
            Err(e) => {
                self.ids.destroy(id);
                Err(e)
            }
        }
    }

    /// Runs the move system.
    pub fn run_move(&mut self, dt: f32) {
        self.executor.run_move(&mut self.archetype, dt);
    }

    /// Runs the damage system.
    pub fn run_damage(&mut self) {
        self.executor.run_damage(&mut self.archetype);
    }

    /// One simulation tick: move, then damage.
    pub fn tick(&mut self, dt: f32) {
        self.executor.tick(&mut self.archetype, dt);
    }

    /// Returns the number of stored entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archetype.len()
    }

    /// Checks if no entity is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archetype.is_empty()
    }

    /// Returns the entity storage.
    #[must_use]
    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    /// Returns the id allocator.
    #[must_use]
    pub fn allocator(&self) -> &EntityIdAllocator {
        &self.ids
    }

    /// Returns the executor.
    #[must_use]
    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExecutorConfig, StorageConfig};

    fn small_config() -> SwarmConfig {
        SwarmConfig {
            storage: StorageConfig {
                chunk_capacity: 4,
                initial_chunk_slots: 1,
            },
            executor: ExecutorConfig {
                worker_count: Some(2),
                ..ExecutorConfig::default()
            },
        }
    }

    #[test]
    fn test_world_spawn_and_tick() {
        let mut world = World::new(&small_config()).unwrap();
        assert!(world.is_empty());

        let (id, loc) = world
            .spawn_located(Position::new(0.0, 0.0), Velocity::new(2.0, 3.0), 3)
            .unwrap();
        assert_eq!(id.raw(), 1);
        assert_eq!(loc, RowLocation { chunk: 0, row: 0 });

        world.tick(1.0);

        let row = world.archetype().row(loc).unwrap();
        assert_eq!(row.position, Position::new(2.0, 3.0));
        assert_eq!(row.health, 2);
    }

    #[test]
    fn test_world_layout() {
        let mut world = World::new(&small_config()).unwrap();
        for _ in 0..10 {
            world
                .spawn(Position::default(), Velocity::default(), 1)
                .unwrap();
        }

        assert_eq!(world.len(), 10);
        assert_eq!(world.archetype().num_chunks(), 3);
        assert_eq!(world.allocator().live_count(), 10);
        assert_eq!(world.executor().worker_count(), 2);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = small_config();
        config.storage.chunk_capacity = 0;
        assert!(World::new(&config).is_err());
    }
}
