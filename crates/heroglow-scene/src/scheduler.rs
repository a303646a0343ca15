//! Randomized spawn timing.

use rand::Rng;
use serde::Serialize;

/// Uniform inter-spawn interval `[base_ms, base_ms + jitter_ms]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpawnWindow {
    pub base_ms: f64,
    pub jitter_ms: f64,
}

impl SpawnWindow {
    pub const fn new(base_ms: f64, jitter_ms: f64) -> Self {
        Self { base_ms, jitter_ms }
    }

    /// Draw the next interval from `rng`.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.jitter_ms <= 0.0 {
            return self.base_ms;
        }
        rng.gen_range(self.base_ms..=self.base_ms + self.jitter_ms)
    }
}

/// Decides once per tick whether a scene may add an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpawnScheduler {
    window: SpawnWindow,
    last_spawn_ms: f64,
    next_interval_ms: f64,
}

impl SpawnScheduler {
    /// Start a scheduler whose clock origin is zero.
    pub fn new<R: Rng + ?Sized>(window: SpawnWindow, rng: &mut R) -> Self {
        Self {
            window,
            last_spawn_ms: 0.0,
            next_interval_ms: window.draw(rng),
        }
    }

    /// True once more than the current interval has elapsed since the last spawn.
    pub fn is_due(&self, now_ms: f64) -> bool {
        now_ms - self.last_spawn_ms > self.next_interval_ms
    }

    /// Spawn is due and the pool has room.
    pub fn should_spawn(&self, now_ms: f64, active: usize, max_entities: usize) -> bool {
        self.is_due(now_ms) && active < max_entities
    }

    /// Restart the interval after a successful spawn.
    pub fn record_spawn<R: Rng + ?Sized>(&mut self, now_ms: f64, rng: &mut R) {
        self.last_spawn_ms = now_ms;
        self.next_interval_ms = self.window.draw(rng);
    }

    pub fn window(&self) -> SpawnWindow {
        self.window
    }

    pub fn last_spawn_ms(&self) -> f64 {
        self.last_spawn_ms
    }

    pub fn next_interval_ms(&self) -> f64 {
        self.next_interval_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const WINDOW: SpawnWindow = SpawnWindow::new(800.0, 1500.0);

    #[test]
    fn test_intervals_stay_in_window() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..1000 {
            let interval = WINDOW.draw(&mut rng);
            assert!((800.0..=2300.0).contains(&interval));
        }
    }

    #[test]
    fn test_zero_jitter_is_fixed() {
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(SpawnWindow::new(250.0, 0.0).draw(&mut rng), 250.0);
    }

    #[test]
    fn test_due_only_after_interval() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut scheduler = SpawnScheduler::new(WINDOW, &mut rng);
        let interval = scheduler.next_interval_ms();

        assert!(!scheduler.is_due(interval));
        assert!(scheduler.is_due(interval + 1.0));

        scheduler.record_spawn(interval + 1.0, &mut rng);
        assert_eq!(scheduler.last_spawn_ms(), interval + 1.0);
        assert!(!scheduler.is_due(interval + 1.0));
    }

    #[test]
    fn test_full_pool_blocks_spawn() {
        let mut rng = StdRng::seed_from_u64(5);
        let scheduler = SpawnScheduler::new(WINDOW, &mut rng);
        assert!(scheduler.should_spawn(10_000.0, 2, 3));
        assert!(!scheduler.should_spawn(10_000.0, 3, 3));
    }
}
