//! Projectiles: the ship fires at the boss centroid, rate-limited by the
//! audio level.

use crate::color::Hsv;
use crate::font::draw_glyph;
use crate::frame::{FrameBuffer, HEIGHT, WIDTH};
use pulsar_audio::rng::MAGIC_PROJECTILE;
use pulsar_audio::Lcg32;

/// Fixed pool capacity.
pub const PROJECTILE_POOL: usize = 64;

/// The nine projectile glyphs.
const PROJECTILE_GLYPHS: [u8; 9] = [b'o', b'x', b'-', b'0', b'*', b'+', b'>', b'=', b'~'];

const SPEED: f64 = 6.0;
const LIFE_FRAMES: i32 = 240;

#[derive(Debug, Clone, Copy, Default)]
struct Projectile {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    life: i32,
    glyph: u8,
    hue: f64,
    alive: bool,
}

/// Fixed-capacity projectile pool. Slots recycle via the liveness flag;
/// nothing allocates after construction.
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    slots: [Projectile; PROJECTILE_POOL],
    rng: Lcg32,
    cooldown: u32,
}

impl ProjectilePool {
    pub fn new(seed: u32) -> Self {
        Self {
            slots: [Projectile::default(); PROJECTILE_POOL],
            rng: Lcg32::stream(seed, MAGIC_PROJECTILE),
            cooldown: 0,
        }
    }

    /// Frames between shots at the given level: loud music fires faster.
    fn fire_interval(level: f64) -> u32 {
        (20.0 - (level * 17.0).floor()).clamp(3.0, 20.0) as u32
    }

    /// Advances physics, fires when the cooldown lapses, and retires
    /// projectiles that hit the boss disc or leave the frame.
    pub fn update(
        &mut self,
        ship: (i32, i32),
        boss_center: (f64, f64),
        boss_radius: f64,
        level: f64,
    ) {
        for p in self.slots.iter_mut().filter(|p| p.alive) {
            p.x += p.vx;
            p.y += p.vy;
            p.life -= 1;
            let ddx = p.x - boss_center.0;
            let ddy = p.y - boss_center.1;
            let hit = ddx * ddx + ddy * ddy <= boss_radius * boss_radius;
            let gone = p.life <= 0
                || p.x < -8.0
                || p.y < -8.0
                || p.x > f64::from(WIDTH) + 8.0
                || p.y > f64::from(HEIGHT) + 8.0;
            if hit || gone {
                p.alive = false;
            }
        }

        if self.cooldown > 0 {
            self.cooldown -= 1;
            return;
        }
        self.cooldown = Self::fire_interval(level);

        let (sx, sy) = (f64::from(ship.0), f64::from(ship.1));
        let dx = boss_center.0 - sx;
        let dy = boss_center.1 - sy;
        let dist = (dx * dx + dy * dy).sqrt().max(1.0);
        let glyph = PROJECTILE_GLYPHS[self.rng.next_range(9) as usize];
        let hue = self.rng.next_f64();

        if let Some(slot) = self.slots.iter_mut().find(|p| !p.alive) {
            *slot = Projectile {
                x: sx,
                y: sy,
                vx: dx / dist * SPEED,
                vy: dy / dist * SPEED,
                life: LIFE_FRAMES,
                glyph,
                hue,
                alive: true,
            };
        }
        // Pool full: the shot is dropped silently.
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|p| p.alive).count()
    }

    pub fn draw(&self, fb: &mut FrameBuffer) {
        for p in self.slots.iter().filter(|p| p.alive) {
            let argb = Hsv::new(p.hue, 0.7, 1.0).pack();
            draw_glyph(fb, p.x as i32 - 4, p.y as i32 - 4, p.glyph, argb);
        }
    }
}
