//! Scene simulation state and the per-frame tick.

use heroglow_core::{SceneError, SceneKind};
use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::animations::dataflow::Laser;
use crate::animations::geometric::GridPulse;
use crate::animations::particles::Particle;
use crate::pool::{Entity, EntityId, Lifecycle, Pool};
use crate::scheduler::{SpawnScheduler, SpawnWindow};

/// An entity kind a scene is built from.
pub trait Archetype: Entity + Sized {
    /// Opacity lost per second.
    const DECAY_RATE: f32;
    /// Inter-spawn interval distribution.
    const SPAWN_WINDOW: SpawnWindow;

    /// Build a fresh entity born at `now_ms`.
    fn create<R: Rng + ?Sized>(id: EntityId, now_ms: f64, rng: &mut R) -> Self;
}

/// The live pool of a scene, tagged by archetype.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "pool", rename_all = "lowercase")]
pub enum ScenePool {
    Particles(Pool<Particle>),
    Geometric(Pool<GridPulse>),
    Dataflow(Pool<Laser>),
}

impl ScenePool {
    pub fn kind(&self) -> SceneKind {
        match self {
            ScenePool::Particles(_) => SceneKind::Particles,
            ScenePool::Geometric(_) => SceneKind::Geometric,
            ScenePool::Dataflow(_) => SceneKind::Dataflow,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ScenePool::Particles(pool) => pool.len(),
            ScenePool::Geometric(pool) => pool.len(),
            ScenePool::Dataflow(pool) => pool.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match self {
            ScenePool::Particles(pool) => pool.capacity(),
            ScenePool::Geometric(pool) => pool.capacity(),
            ScenePool::Dataflow(pool) => pool.capacity(),
        }
    }

    /// Lifecycle of every live entity, in pool order.
    pub fn lifecycles(&self) -> Vec<&Lifecycle> {
        match self {
            ScenePool::Particles(pool) => pool.iter().map(Entity::lifecycle).collect(),
            ScenePool::Geometric(pool) => pool.iter().map(Entity::lifecycle).collect(),
            ScenePool::Dataflow(pool) => pool.iter().map(Entity::lifecycle).collect(),
        }
    }
}

/// Everything one scene instance needs between frames.
///
/// The host owns this value; [`SceneState::tick`] consumes it and returns the
/// next frame's state, so the simulation has no hidden mutable state and no
/// clock of its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneState {
    pool: ScenePool,
    scheduler: SpawnScheduler,
    /// Sum of every tick's delta, in milliseconds.
    clock_ms: f64,
}

impl SceneState {
    /// Create a scene seeded with `min(seed_count, max_entities)` entities at time zero.
    pub fn new<R: Rng + ?Sized>(
        kind: SceneKind,
        max_entities: usize,
        seed_count: usize,
        rng: &mut R,
    ) -> Result<Self, SceneError> {
        let (pool, scheduler) = match kind {
            SceneKind::Particles => {
                let (pool, scheduler) = seeded::<Particle, R>(max_entities, seed_count, rng)?;
                (ScenePool::Particles(pool), scheduler)
            }
            SceneKind::Geometric => {
                let (pool, scheduler) = seeded::<GridPulse, R>(max_entities, seed_count, rng)?;
                (ScenePool::Geometric(pool), scheduler)
            }
            SceneKind::Dataflow => {
                let (pool, scheduler) = seeded::<Laser, R>(max_entities, seed_count, rng)?;
                (ScenePool::Dataflow(pool), scheduler)
            }
        };
        debug!(
            "{kind} scene created with {} of {max_entities} entities",
            pool.len()
        );
        Ok(Self {
            pool,
            scheduler,
            clock_ms: 0.0,
        })
    }

    /// Advance by `dt` seconds: update existing entities, then evaluate spawn.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn tick<R: Rng + ?Sized>(self, dt: f32, rng: &mut R) -> Self {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        let clock_ms = self.clock_ms + dt as f64 * 1000.0;
        let mut scheduler = self.scheduler;

        let pool = match self.pool {
            ScenePool::Particles(pool) => {
                ScenePool::Particles(step(pool, &mut scheduler, clock_ms, dt, rng))
            }
            ScenePool::Geometric(pool) => {
                ScenePool::Geometric(step(pool, &mut scheduler, clock_ms, dt, rng))
            }
            ScenePool::Dataflow(pool) => {
                ScenePool::Dataflow(step(pool, &mut scheduler, clock_ms, dt, rng))
            }
        };

        Self {
            pool,
            scheduler,
            clock_ms,
        }
    }

    pub fn kind(&self) -> SceneKind {
        self.pool.kind()
    }

    pub fn pool(&self) -> &ScenePool {
        &self.pool
    }

    pub fn scheduler(&self) -> &SpawnScheduler {
        &self.scheduler
    }

    pub fn active_count(&self) -> usize {
        self.pool.len()
    }

    pub fn max_entities(&self) -> usize {
        self.pool.capacity()
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }
}

fn seeded<E: Archetype, R: Rng + ?Sized>(
    max_entities: usize,
    seed_count: usize,
    rng: &mut R,
) -> Result<(Pool<E>, SpawnScheduler), SceneError> {
    let mut pool = Pool::with_capacity(max_entities)?;
    for _ in 0..seed_count.min(max_entities) {
        pool = pool.spawn(|id| E::create(id, 0.0, rng)).0;
    }
    let scheduler = SpawnScheduler::new(E::SPAWN_WINDOW, rng);
    Ok((pool, scheduler))
}

fn step<E: Archetype, R: Rng + ?Sized>(
    pool: Pool<E>,
    scheduler: &mut SpawnScheduler,
    now_ms: f64,
    dt: f32,
    rng: &mut R,
) -> Pool<E> {
    let pool = pool.tick(dt);
    if !scheduler.should_spawn(now_ms, pool.len(), pool.capacity()) {
        return pool;
    }
    let (pool, spawned) = pool.spawn(|id| E::create(id, now_ms, rng));
    if let Some(id) = spawned {
        scheduler.record_spawn(now_ms, rng);
        debug!("spawned {id} at {now_ms:.0}ms ({} live)", pool.len());
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scene(kind: SceneKind, max: usize, seed: u64) -> (SceneState, StdRng) {
        let mut rng = StdRng::seed_from_u64(seed);
        let state = SceneState::new(kind, max, 2, &mut rng).unwrap();
        (state, rng)
    }

    #[test]
    fn test_empty_start_seeds_two() {
        for kind in SceneKind::ALL {
            let (state, _) = scene(kind, 5, 1);
            assert_eq!(state.active_count(), 2);
            assert_eq!(state.kind(), kind);
        }
        let (state, _) = scene(SceneKind::Dataflow, 1, 1);
        assert_eq!(state.active_count(), 1);
    }

    #[test]
    fn test_invalid_max_entities() {
        let mut rng = StdRng::seed_from_u64(0);
        let err = SceneState::new(SceneKind::Particles, 0, 2, &mut rng).unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfiguration(_)));

        let err = SceneState::new(SceneKind::Particles, u32::MAX as usize, 2, &mut rng).unwrap_err();
        assert!(matches!(err, SceneError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_serialized_pool_is_tagged_by_kind() {
        let (state, mut rng) = scene(SceneKind::Geometric, 4, 6);
        let state = state.tick(0.1, &mut rng);
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["pool"]["kind"], "geometric");
        let entities = json["pool"]["pool"]["entities"].as_array().unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0]["life"]["id"], 0);
        assert_eq!(json["pool"]["pool"]["capacity"], 4);
        assert!((json["clock_ms"].as_f64().unwrap() - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_pool_never_exceeds_cap() {
        for kind in SceneKind::ALL {
            let (mut state, mut rng) = scene(kind, 4, 7);
            for i in 0..2_000 {
                // Mix short and long frames.
                let dt = if i % 50 == 0 { 0.9 } else { 1.0 / 60.0 };
                state = state.tick(dt, &mut rng);
                assert!(state.active_count() <= 4);
            }
        }
    }

    #[test]
    fn test_opacity_monotonic_and_removal() {
        let (mut state, mut rng) = scene(SceneKind::Dataflow, 8, 3);
        for _ in 0..600 {
            let before: Vec<(EntityId, f32, f32)> = state
                .pool()
                .lifecycles()
                .iter()
                .map(|l| (l.id, l.opacity, l.progress))
                .collect();
            state = state.tick(1.0 / 30.0, &mut rng);
            let after = state.pool().lifecycles();

            for life in &after {
                assert!(life.opacity > 0.0, "inactive entity {} kept", life.id);
                if let Some((_, opacity, progress)) = before.iter().find(|b| b.0 == life.id) {
                    assert!(life.opacity < *opacity);
                    assert!(life.progress > *progress);
                }
            }
        }
    }

    #[test]
    fn test_ids_unique_among_live() {
        let (mut state, mut rng) = scene(SceneKind::Particles, 30, 5);
        for _ in 0..900 {
            state = state.tick(1.0 / 30.0, &mut rng);
            let mut ids: Vec<EntityId> = state.pool().lifecycles().iter().map(|l| l.id).collect();
            let n = ids.len();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), n);
        }
    }

    #[test]
    fn test_deterministic_replay() {
        let run = || {
            let (mut state, mut rng) = scene(SceneKind::Dataflow, 6, 1234);
            for i in 0..400 {
                let dt = [0.016, 0.033, 0.05][i % 3];
                state = state.tick(dt, &mut rng);
            }
            state
        };
        let a = run();
        let b = run();
        assert_eq!(a, b);
        assert!(a.clock_ms() > 0.0);
    }

    #[test]
    fn test_spawn_waits_for_interval() {
        let (state, mut rng) = scene(SceneKind::Dataflow, 5, 2);
        let interval = state.scheduler().next_interval_ms();

        // Just before the interval: nothing new; the two seeds decay a little.
        let dt = ((interval - 10.0) / 1000.0) as f32;
        let state = state.tick(dt, &mut rng);
        assert_eq!(state.active_count(), 2);

        // Crossing it spawns exactly one entity.
        let state = state.tick(0.02, &mut rng);
        assert_eq!(state.active_count(), 3);
        assert_eq!(state.pool().lifecycles().last().unwrap().id, EntityId(2));
    }

    #[test]
    fn test_spawn_gated_when_full() {
        let (mut state, mut rng) = scene(SceneKind::Geometric, 2, 9);
        assert_eq!(state.active_count(), 2);
        // Plenty of time for a spawn to be due, but the seeds are still alive.
        state = state.tick(1.5, &mut rng);
        assert_eq!(state.active_count(), 2);
        assert!(state.scheduler().is_due(state.clock_ms()));
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let (state, mut rng) = scene(SceneKind::Dataflow, 5, 4);
        let before = state.clone();
        let state = state.tick(f32::NAN, &mut rng).tick(-1.0, &mut rng);
        assert_eq!(state.pool(), before.pool());
        assert_eq!(state.clock_ms(), 0.0);
    }
}
