//! Short-lived spark particles for apple and crash bursts.
//!
//! Particles live in grid units (one unit per cell) so they stay put when the
//! drawing surface is resized; the scene converts them to pixels per frame.

use rand::Rng;

use super::grid::Point;
use super::state::Position;

/// Maximum spread of a burst's initial velocity, in cells per second
pub const BURST_SPREAD: f64 = 7.0;
/// Downward acceleration in cells per second squared
pub const GRAVITY: f64 = 10.0;
/// Shortest particle lifetime in seconds
pub const MIN_LIFETIME: f64 = 0.7;
/// Random extra lifetime on top of `MIN_LIFETIME`
pub const LIFETIME_JITTER: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    pub velocity: Point,
    /// Remaining lifetime in seconds
    pub life: f64,
}

impl Particle {
    /// Advance physics. Returns false when expired.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.life -= dt;
        if self.life <= 0.0 {
            return false;
        }

        self.position.x += self.velocity.x * dt;
        self.position.y += self.velocity.y * dt;
        self.velocity.y += GRAVITY * dt;

        true
    }
}

/// The single collection that owns every live particle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParticlePool {
    particles: Vec<Particle>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn `count` particles at the center of `cell` flying outward at random
    pub fn spawn_burst<R: Rng + ?Sized>(&mut self, rng: &mut R, cell: Position, count: usize) {
        let origin = Point::new(cell.x as f64 + 0.5, cell.y as f64 + 0.5);

        self.particles.extend((0..count).map(|_| Particle {
            position: origin,
            velocity: Point::new(
                rng.gen_range(-0.5_f64..0.5) * BURST_SPREAD,
                rng.gen_range(-0.5_f64..0.5) * BURST_SPREAD,
            ),
            life: MIN_LIFETIME + rng.gen_range(0.0_f64..LIFETIME_JITTER),
        }));
    }

    /// Integrate every particle and drop the ones whose lifetime ran out
    pub fn tick(&mut self, dt: f64) {
        self.particles.retain_mut(|p| p.tick(dt));
    }

    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn particle(life: f64) -> Particle {
        Particle {
            position: Point::new(1.0, 1.0),
            velocity: Point::new(2.0, 0.0),
            life,
        }
    }

    #[test]
    fn test_burst_starts_at_cell_center() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut pool = ParticlePool::new();
        pool.spawn_burst(&mut rng, Position::new(3, 4), 8);

        assert_eq!(pool.len(), 8);
        for p in pool.iter() {
            assert_eq!(p.position, Point::new(3.5, 4.5));
            assert!(p.velocity.x.abs() <= BURST_SPREAD / 2.0);
            assert!(p.velocity.y.abs() <= BURST_SPREAD / 2.0);
            assert!(p.life >= MIN_LIFETIME && p.life < MIN_LIFETIME + LIFETIME_JITTER);
        }
    }

    #[test]
    fn test_tick_integrates_with_gravity() {
        let mut p = particle(1.0);
        assert!(p.tick(0.1));
        assert!((p.position.x - 1.2).abs() < 1e-9);
        assert_eq!(p.position.y, 1.0);
        assert!((p.velocity.y - GRAVITY * 0.1).abs() < 1e-9);
        assert!((p.life - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_lifetime_strictly_decreases() {
        let mut pool = ParticlePool::new();
        pool.push(particle(1.0));

        let mut last = 1.0;
        for _ in 0..10 {
            pool.tick(0.016);
            let life = pool.iter().next().unwrap().life;
            assert!(life < last);
            last = life;
        }
    }

    #[test]
    fn test_removed_exactly_when_expired() {
        let mut pool = ParticlePool::new();
        pool.push(particle(0.05));
        pool.push(particle(0.5));

        pool.tick(0.03);
        assert_eq!(pool.len(), 2);

        // 0.05 - 0.03 - 0.03 < 0: gone on this tick, not the next one
        pool.tick(0.03);
        assert_eq!(pool.len(), 1);
        assert!(pool.iter().all(|p| p.life > 0.0));
    }

    #[test]
    fn test_zero_lifetime_is_removed() {
        let mut pool = ParticlePool::new();
        pool.push(particle(0.25));
        pool.tick(0.25);
        assert!(pool.is_empty());
    }
}
