//! Cosmetic death-burst particles
//!
//! Particles advance per tick, not per millisecond, so a burst looks the same
//! on every replay of a seed.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default upper bound on live particles
pub const MAX_PARTICLES: usize = 512;
/// Size multiplier applied every tick
pub const PARTICLE_DECAY: f32 = 0.95;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
    /// Ticks left
    pub lifetime: u32,
    pub max_lifetime: u32,
}

impl Particle {
    /// Advance one tick; returns false once expired
    pub fn update(&mut self, scroll: Vec2) -> bool {
        self.pos += self.vel + scroll;
        self.lifetime = self.lifetime.saturating_sub(1);
        self.size = (self.size * PARTICLE_DECAY).max(1.0);
        self.lifetime > 0
    }

    /// Fade in [0, 1] for drawing
    pub fn alpha(&self) -> f32 {
        if self.max_lifetime == 0 {
            return 0.0;
        }
        self.lifetime as f32 / self.max_lifetime as f32
    }
}

/// Live particles, oldest first, capped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleField {
    pub particles: Vec<Particle>,
    pub cap: usize,
}

impl Default for ParticleField {
    fn default() -> Self {
        Self::with_cap(MAX_PARTICLES)
    }
}

impl ParticleField {
    pub fn with_cap(cap: usize) -> Self {
        Self {
            particles: Vec::new(),
            cap,
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spray `count` particles from `at` with random headings
    ///
    /// Speed is drawn from `[0.5, 2.5) * speed`, size 6-12, lifetime 20-40 ticks.
    pub fn burst<R: Rng>(&mut self, rng: &mut R, at: Vec2, color: u32, count: u32, speed: f32) {
        for _ in 0..count {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let v = rng.random::<f32>() * speed * 2.0 + speed * 0.5;
            let lifetime = rng.random_range(20..=40u32);
            self.particles.push(Particle {
                pos: at,
                vel: Vec2::new(angle.cos() * v, angle.sin() * v),
                color,
                size: rng.random_range(6..=12) as f32,
                lifetime,
                max_lifetime: lifetime,
            });
        }
        if self.particles.len() > self.cap {
            let excess = self.particles.len() - self.cap;
            self.particles.drain(..excess);
        }
    }

    pub fn update(&mut self, scroll: Vec2) {
        self.particles.retain_mut(|p| p.update(scroll));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn particle(lifetime: u32, size: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 2.0),
            color: 0xffffff,
            size,
            lifetime,
            max_lifetime: lifetime,
        }
    }

    #[test]
    fn test_decay_law() {
        let mut p = particle(3, 10.0);
        assert!(p.update(Vec2::new(0.5, 0.0)));
        assert_eq!(p.pos, Vec2::new(1.5, 2.0));
        assert_eq!(p.lifetime, 2);
        assert!((p.size - 9.5).abs() < 1e-6);
        assert!(p.update(Vec2::ZERO));
        assert!(!p.update(Vec2::ZERO));
    }

    #[test]
    fn test_size_floor() {
        let mut p = particle(100, 1.02);
        p.update(Vec2::ZERO);
        assert_eq!(p.size, 1.0);
        p.update(Vec2::ZERO);
        assert_eq!(p.size, 1.0);
    }

    #[test]
    fn test_burst_ranges() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut field = ParticleField::default();
        field.burst(&mut rng, Vec2::new(10.0, 10.0), 0xc83232, 12, 5.0);
        assert_eq!(field.len(), 12);
        for p in &field.particles {
            assert!((20..=40).contains(&p.lifetime));
            assert!((6.0..=12.0).contains(&p.size));
            let speed = p.vel.length();
            assert!((2.49..12.51).contains(&speed));
            assert_eq!(p.pos, Vec2::new(10.0, 10.0));
        }
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut field = ParticleField::with_cap(25);
        field.burst(&mut rng, Vec2::ZERO, 0x111111, 20, 1.0);
        field.burst(&mut rng, Vec2::ZERO, 0x222222, 20, 1.0);
        assert_eq!(field.len(), 25);
        assert_eq!(field.particles.iter().filter(|p| p.color == 0x111111).count(), 5);
    }

    #[test]
    fn test_field_expires_particles() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut field = ParticleField::default();
        field.burst(&mut rng, Vec2::ZERO, 0xff6432, 30, 8.0);
        for _ in 0..40 {
            field.update(Vec2::ZERO);
        }
        assert!(field.is_empty());
    }
}
