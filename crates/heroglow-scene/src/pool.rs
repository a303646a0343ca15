//! Entity lifecycle and the pool that owns live entities.

use std::fmt;

use heroglow_core::{MAX_ENTITIES, SceneError};
use serde::Serialize;

/// Identifier assigned by a pool at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spawn/decay bookkeeping shared by every entity archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lifecycle {
    pub id: EntityId,
    /// Motion parameter, grows by `speed * dt`.
    pub progress: f32,
    pub speed: f32,
    /// Starts at 1.0 and falls by `decay_rate * dt`.
    pub opacity: f32,
    /// Opacity lost per second.
    pub decay_rate: f32,
    /// Scene clock at spawn, in milliseconds.
    pub birth_ms: f64,
}

impl Lifecycle {
    pub fn new(id: EntityId, speed: f32, decay_rate: f32, birth_ms: f64) -> Self {
        Self {
            id,
            progress: 0.0,
            speed,
            opacity: 1.0,
            decay_rate,
            birth_ms,
        }
    }

    /// Advance by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.progress += self.speed * dt;
        self.opacity -= self.decay_rate * dt;
    }

    pub fn is_active(&self) -> bool {
        self.opacity > 0.0
    }

    /// Opacity clamped to the drawable range.
    pub fn visible_opacity(&self) -> f32 {
        self.opacity.clamp(0.0, 1.0)
    }

    pub fn age_ms(&self, now_ms: f64) -> f64 {
        (now_ms - self.birth_ms).max(0.0)
    }
}

/// A transient visual object living in a [`Pool`].
pub trait Entity {
    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Per-tick update. Archetypes with their own motion override this and
    /// must still advance the lifecycle.
    fn advance(&mut self, dt: f32) {
        self.lifecycle_mut().advance(dt);
    }

    fn id(&self) -> EntityId {
        self.lifecycle().id
    }

    fn is_active(&self) -> bool {
        self.lifecycle().is_active()
    }
}

/// Ordered collection of the live entities of one scene.
///
/// Operations consume the previous snapshot and return the next one, so a
/// reader always observes a fully updated pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pool<E> {
    entities: Vec<E>,
    capacity: usize,
    next_id: u64,
}

impl<E: Entity> Pool<E> {
    /// Create an empty pool holding at most `max_entities`.
    pub fn with_capacity(max_entities: usize) -> Result<Self, SceneError> {
        if max_entities == 0 {
            return Err(SceneError::InvalidConfiguration(
                "max_entities must be greater than zero".to_string(),
            ));
        }
        if max_entities > MAX_ENTITIES as usize {
            return Err(SceneError::InvalidConfiguration(format!(
                "max_entities must be at most {MAX_ENTITIES}, got {max_entities}"
            )));
        }
        Ok(Self {
            entities: Vec::new(),
            capacity: max_entities,
            next_id: 0,
        })
    }

    /// Append an entity built by `factory`, unless the pool is full.
    pub fn spawn<F>(mut self, factory: F) -> (Self, Option<EntityId>)
    where
        F: FnOnce(EntityId) -> E,
    {
        if self.is_full() {
            return (self, None);
        }
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(factory(id));
        (self, Some(id))
    }

    /// Advance every entity by `dt` seconds and drop the ones that faded out.
    pub fn tick(mut self, dt: f32) -> Self {
        for entity in &mut self.entities {
            entity.advance(dt);
        }
        self.entities.retain(|e| e.is_active());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.entities.iter()
    }

    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id()).collect()
    }

    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entity. Ids keep increasing afterwards.
    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal archetype for exercising the pool.
    #[derive(Debug, Clone, PartialEq)]
    struct Mote(Lifecycle);

    impl Entity for Mote {
        fn lifecycle(&self) -> &Lifecycle {
            &self.0
        }

        fn lifecycle_mut(&mut self) -> &mut Lifecycle {
            &mut self.0
        }
    }

    fn mote(id: EntityId) -> Mote {
        Mote(Lifecycle::new(id, 1.0, 0.4, 0.0))
    }

    #[test]
    fn test_zero_capacity_is_invalid() {
        assert!(matches!(
            Pool::<Mote>::with_capacity(0),
            Err(SceneError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_oversized_capacity_is_invalid() {
        assert!(Pool::<Mote>::with_capacity(MAX_ENTITIES as usize).is_ok());
        assert!(matches!(
            Pool::<Mote>::with_capacity(MAX_ENTITIES as usize + 1),
            Err(SceneError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            Pool::<Mote>::with_capacity(usize::MAX),
            Err(SceneError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_decay_to_empty() {
        let (pool, id) = Pool::with_capacity(5).unwrap().spawn(mote);
        let id = id.unwrap();

        let pool = pool.tick(1.0);
        assert!((pool.get(id).unwrap().0.opacity - 0.6).abs() < 1e-5);

        let pool = pool.tick(1.0);
        assert!((pool.get(id).unwrap().0.opacity - 0.2).abs() < 1e-5);

        let pool = pool.tick(1.0);
        assert!(pool.get(id).is_none());
        assert!(pool.is_empty());
    }

    #[test]
    fn test_spawn_gated_at_capacity() {
        let mut pool = Pool::with_capacity(3).unwrap();
        for _ in 0..3 {
            let (next, id) = pool.spawn(mote);
            assert!(id.is_some());
            pool = next;
        }
        assert!(pool.is_full());

        let (pool, id) = pool.spawn(mote);
        assert_eq!(id, None);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn test_ids_are_monotonic_and_not_reused() {
        let mut pool = Pool::with_capacity(2).unwrap();
        let mut seen = Vec::new();
        for _ in 0..6 {
            let (next, id) = pool.spawn(mote);
            pool = next;
            if let Some(id) = id {
                seen.push(id);
            }
            // Each mote lives 2.5s; three ticks of 1s clear the pool.
            pool = pool.tick(1.0).tick(1.0).tick(1.0);
        }
        let mut sorted = seen.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, seen);
        assert_eq!(seen.first(), Some(&EntityId(0)));
        assert_eq!(seen.last(), Some(&EntityId(5)));
    }

    #[test]
    fn test_tick_is_monotonic_per_entity() {
        let (pool, _) = Pool::with_capacity(4).unwrap().spawn(mote);
        let (pool, _) = pool.spawn(mote);
        let before: Vec<Lifecycle> = pool.iter().map(|m| m.0.clone()).collect();

        let after = pool.tick(0.1);
        for (b, a) in before.iter().zip(after.iter()) {
            assert_eq!(b.id, a.0.id);
            assert!(a.0.opacity < b.opacity);
            assert!(a.0.progress > b.progress);
        }
    }

    #[test]
    fn test_zero_dt_leaves_entities_untouched() {
        let (pool, _) = Pool::with_capacity(1).unwrap().spawn(mote);
        let before = pool.clone();
        assert_eq!(pool.tick(0.0), before);
    }
}
