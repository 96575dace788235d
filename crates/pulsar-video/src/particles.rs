//! Transient effects: the particle pool and the bass-hit shape pool.

use crate::boss::{draw_shape, ShapeKind};
use crate::color::Hsv;
use crate::font::draw_glyph;
use crate::frame::FrameBuffer;
use crate::luts::TrigLut;
use pulsar_audio::rng::{MAGIC_PARTICLES, MAGIC_SHAPES};
use pulsar_audio::Lcg32;

/// Particle pool capacity.
pub const PARTICLE_POOL: usize = 256;
/// Bass-hit pool capacity.
pub const BASS_HIT_POOL: usize = 96;

/// Gravity applied to particles per frame.
const GRAVITY: f64 = 0.02;

const PARTICLE_GLYPH: u8 = b'*';

#[derive(Debug, Clone, Copy, Default)]
struct Particle {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    life: i32,
    hue: f64,
    alive: bool,
}

/// Fixed 256-slot particle pool. Excess spawns are dropped, never errors.
#[derive(Debug, Clone)]
pub struct ParticlePool {
    slots: [Particle; PARTICLE_POOL],
    rng: Lcg32,
}

impl ParticlePool {
    pub fn new(seed: u32) -> Self {
        Self {
            slots: [Particle::default(); PARTICLE_POOL],
            rng: Lcg32::stream(seed, MAGIC_PARTICLES),
        }
    }

    fn spawn(&mut self, p: Particle) {
        if let Some(slot) = self.slots.iter_mut().find(|s| !s.alive) {
            *slot = p;
        }
    }

    /// Spawns an explosion of `5 + floor(level * 15)` particles.
    pub fn explode(&mut self, x: f64, y: f64, level: f64, hue: f64) {
        let count = 5 + (level * 15.0) as usize;
        for _ in 0..count {
            let angle = self.rng.next_f64() * std::f64::consts::TAU;
            let speed = 1.0 + self.rng.next_f64() * 3.0;
            let life = 30 + self.rng.next_range(40) as i32;
            let hue = (hue + self.rng.next_f64() * 0.15).fract();
            self.spawn(Particle {
                x,
                y,
                vx: speed * angle.cos(),
                vy: speed * angle.sin(),
                life,
                hue,
                alive: true,
            });
        }
    }

    /// Chaos mode extra: an eight-spoke spiral burst around a point.
    pub fn spiral_burst(&mut self, x: f64, y: f64, frame: u64, hue: f64) {
        for spoke in 0..8 {
            let angle =
                std::f64::consts::TAU * f64::from(spoke) / 8.0 + frame as f64 * 0.05;
            self.spawn(Particle {
                x,
                y,
                vx: 2.2 * angle.cos(),
                vy: 2.2 * angle.sin(),
                life: 25,
                hue: (hue + f64::from(spoke) / 8.0).fract(),
                alive: true,
            });
        }
    }

    /// Moves particles, applies gravity, retires the dead.
    pub fn update(&mut self) {
        for p in self.slots.iter_mut().filter(|p| p.alive) {
            p.x += p.vx;
            p.y += p.vy;
            p.vy += GRAVITY;
            p.life -= 1;
            if p.life <= 0 {
                p.alive = false;
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|p| p.alive).count()
    }

    pub fn draw(&self, fb: &mut FrameBuffer) {
        for p in self.slots.iter().filter(|p| p.alive) {
            let argb = Hsv::new(p.hue, 0.9, 1.0).pack();
            draw_glyph(fb, p.x as i32 - 4, p.y as i32 - 4, PARTICLE_GLYPH, argb);
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct BassHit {
    x: f64,
    y: f64,
    amplitude: f64,
    life: i32,
    shape_index: usize,
    hue: f64,
    active: bool,
}

/// Fixed 96-slot pool of expanding bass-hit shapes, spawned on saw steps.
#[derive(Debug, Clone)]
pub struct BassHitPool {
    slots: [BassHit; BASS_HIT_POOL],
    rng: Lcg32,
}

impl BassHitPool {
    pub fn new(seed: u32) -> Self {
        Self {
            slots: [BassHit::default(); BASS_HIT_POOL],
            // Shape picks share the shape stream family but not the boss's
            // instance.
            rng: Lcg32::stream(seed, MAGIC_SHAPES ^ 0xFF),
        }
    }

    /// Spawns one hit; `life = floor(amplitude * 2000)` frames. A full pool
    /// drops the spawn silently.
    pub fn spawn(&mut self, x: f64, y: f64, amplitude: f64) {
        let shape_index = self.rng.next_range(5) as usize;
        let hue = self.rng.next_f64();
        if let Some(slot) = self.slots.iter_mut().find(|s| !s.active) {
            *slot = BassHit {
                x,
                y,
                amplitude,
                life: (amplitude * 2000.0) as i32,
                shape_index,
                hue,
                active: true,
            };
        }
    }

    pub fn update(&mut self) {
        for hit in self.slots.iter_mut().filter(|h| h.active) {
            hit.life -= 1;
            if hit.life <= 0 {
                hit.active = false;
            }
        }
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|h| h.active).count()
    }

    pub fn draw(&self, fb: &mut FrameBuffer, lut: &TrigLut, frame: u64) {
        const SHAPES: [ShapeKind; 5] = [
            ShapeKind::Triangle,
            ShapeKind::Diamond,
            ShapeKind::Hexagon,
            ShapeKind::Star,
            ShapeKind::Square,
        ];
        for hit in self.slots.iter().filter(|h| h.active) {
            let age = (hit.amplitude * 2000.0 - f64::from(hit.life)).max(0.0);
            let size = 10.0 + age * 0.8;
            let fade = (f64::from(hit.life) / (hit.amplitude * 2000.0).max(1.0)).clamp(0.2, 1.0);
            let argb = Hsv::new(hit.hue, 0.8, fade).pack();
            draw_shape(
                fb,
                lut,
                hit.x,
                hit.y,
                SHAPES[hit.shape_index],
                size.min(220.0),
                frame as f64 * 0.03,
                argb,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explosion_count_scales_with_level() {
        let mut quiet = ParticlePool::new(1);
        quiet.explode(400.0, 300.0, 0.0, 0.5);
        assert_eq!(quiet.live_count(), 5);

        let mut loud = ParticlePool::new(1);
        loud.explode(400.0, 300.0, 1.0, 0.5);
        assert_eq!(loud.live_count(), 20);
    }

    #[test]
    fn particle_pool_saturates_silently() {
        let mut pool = ParticlePool::new(2);
        for _ in 0..100 {
            pool.explode(400.0, 300.0, 1.0, 0.1);
        }
        assert_eq!(pool.live_count(), PARTICLE_POOL);
        // More spawns while saturated are dropped without panic.
        pool.explode(10.0, 10.0, 1.0, 0.9);
        assert_eq!(pool.live_count(), PARTICLE_POOL);
    }

    #[test]
    fn particles_die_and_slots_recycle() {
        let mut pool = ParticlePool::new(3);
        pool.explode(100.0, 100.0, 0.0, 0.3);
        let initial = pool.live_count();
        for _ in 0..80 {
            pool.update();
        }
        assert_eq!(pool.live_count(), 0);
        pool.explode(100.0, 100.0, 0.0, 0.3);
        assert_eq!(pool.live_count(), initial);
    }

    #[test]
    fn gravity_pulls_particles_down() {
        let mut pool = ParticlePool::new(4);
        pool.explode(400.0, 100.0, 0.0, 0.0);
        // Average vertical velocity increases by GRAVITY each update.
        for _ in 0..200 {
            pool.update();
        }
        // After death nothing remains to assert on velocity; instead check
        // an isolated particle's trajectory.
        let mut single = ParticlePool::new(5);
        single.spawn(Particle {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            life: 100,
            hue: 0.0,
            alive: true,
        });
        for _ in 0..50 {
            single.update();
        }
        let fallen = single.slots.iter().find(|p| p.alive).unwrap();
        // 50 steps of accumulating gravity: sum(k * 0.02, k = 0..49).
        assert!((fallen.y - (0..50).map(|k| f64::from(k) * GRAVITY).sum::<f64>()).abs() < 1e-9);
    }

    #[test]
    fn bass_hit_life_follows_amplitude() {
        let mut pool = BassHitPool::new(1);
        pool.spawn(400.0, 300.0, 0.05);
        assert_eq!(pool.live_count(), 1);
        // life = floor(0.05 * 2000) = 100 frames.
        for _ in 0..99 {
            pool.update();
        }
        assert_eq!(pool.live_count(), 1);
        pool.update();
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn bass_pool_saturates_silently() {
        let mut pool = BassHitPool::new(2);
        for _ in 0..(BASS_HIT_POOL + 50) {
            pool.spawn(400.0, 300.0, 1.0);
        }
        assert_eq!(pool.live_count(), BASS_HIT_POOL);
    }

    #[test]
    fn spiral_burst_spawns_eight() {
        let mut pool = ParticlePool::new(6);
        pool.spiral_burst(400.0, 300.0, 12, 0.2);
        assert_eq!(pool.live_count(), 8);
    }

    #[test]
    fn draw_paths_are_deterministic() {
        let lut = TrigLut::new();
        let render = || {
            let mut particles = ParticlePool::new(7);
            let mut hits = BassHitPool::new(7);
            particles.explode(300.0, 200.0, 0.7, 0.4);
            hits.spawn(500.0, 350.0, 0.3);
            let mut fb = FrameBuffer::new();
            particles.draw(&mut fb);
            hits.draw(&mut fb, &lut, 5);
            fb.pixels().to_vec()
        };
        assert_eq!(render(), render());
    }
}
