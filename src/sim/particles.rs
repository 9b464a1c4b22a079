//! Ephemeral particle effects
//!
//! Purely visual: nothing in the simulation reads particles back.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Rgb;

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left; the particle is dropped when this reaches zero
    pub life: u32,
    pub size: f32,
    pub color: Rgb,
}

/// Spawn velocity range per axis (pixels/tick)
const SPAWN_SPEED: f32 = 3.0;
const MIN_LIFE: u32 = 20;
const MAX_LIFE: u32 = 40;
const MIN_SIZE: u32 = 2;
const MAX_SIZE: u32 = 5;

/// Owns every live particle plus its own RNG, so effects never disturb level generation
#[derive(Debug, Clone)]
pub struct ParticlePool {
    particles: Vec<Particle>,
    cap: usize,
    rng: Pcg32,
}

impl ParticlePool {
    pub fn new(cap: usize, seed: u64) -> Self {
        Self {
            particles: Vec::with_capacity(cap.min(256)),
            cap,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Emit `count` particles at `pos`; anything past the cap is dropped
    pub fn spawn(&mut self, pos: Vec2, color: Rgb, count: usize) {
        let room = self.cap.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let vel = Vec2::new(
                self.rng.random_range(-SPAWN_SPEED..SPAWN_SPEED),
                self.rng.random_range(-SPAWN_SPEED..SPAWN_SPEED),
            );
            let life = self.rng.random_range(MIN_LIFE..=MAX_LIFE);
            let size = self.rng.random_range(MIN_SIZE..=MAX_SIZE) as f32;
            self.particles.push(Particle {
                pos,
                vel,
                life,
                size,
                color,
            });
        }
    }

    /// Insert a particle as-is (still subject to the cap)
    pub fn push(&mut self, particle: Particle) {
        if self.particles.len() < self.cap {
            self.particles.push(particle);
        }
    }

    /// Age, move and compact
    pub fn tick(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.life = particle.life.saturating_sub(1);
            particle.pos += particle.vel;
        }
        self.particles.retain(|p| p.life > 0);
    }

    /// Lowering the cap below the live count trims the newest particles
    pub fn set_cap(&mut self, cap: usize) {
        self.cap = cap;
        self.particles.truncate(cap);
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    #[test]
    fn test_spawn_ranges() {
        let mut pool = ParticlePool::new(1000, 7);
        pool.spawn(Vec2::new(10.0, 20.0), palette::RED, 200);
        assert_eq!(pool.len(), 200);
        for p in pool.particles() {
            assert_eq!(p.pos, Vec2::new(10.0, 20.0));
            assert!(p.vel.x >= -3.0 && p.vel.x < 3.0);
            assert!(p.vel.y >= -3.0 && p.vel.y < 3.0);
            assert!((20..=40).contains(&p.life));
            assert!((2.0..=5.0).contains(&p.size));
            assert_eq!(p.color, palette::RED);
        }
    }

    #[test]
    fn test_lifetime_is_exact() {
        let mut pool = ParticlePool::new(10, 1);
        pool.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            life: 25,
            size: 3.0,
            color: palette::WHITE,
        });

        for _ in 0..24 {
            pool.tick();
            assert_eq!(pool.len(), 1);
        }
        assert_eq!(pool.particles()[0].pos.x, 24.0);
        pool.tick();
        assert!(pool.is_empty());
    }

    #[test]
    fn test_size_never_grows_between_spawns() {
        let mut pool = ParticlePool::new(500, 3);
        pool.spawn(Vec2::ZERO, palette::BLUE, 50);
        let mut last = pool.len();
        for _ in 0..60 {
            pool.tick();
            assert!(pool.len() <= last);
            last = pool.len();
        }
        assert!(pool.is_empty());
    }

    #[test]
    fn test_cap_is_enforced() {
        let mut pool = ParticlePool::new(12, 5);
        pool.spawn(Vec2::ZERO, palette::GREEN, 10);
        pool.spawn(Vec2::ZERO, palette::GREEN, 10);
        assert_eq!(pool.len(), 12);

        pool.set_cap(4);
        assert_eq!(pool.len(), 4);

        pool.set_cap(0);
        pool.spawn(Vec2::ZERO, palette::GREEN, 10);
        assert!(pool.is_empty());
    }
}
