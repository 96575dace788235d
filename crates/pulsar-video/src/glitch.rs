//! Glitch overlay: character substitution, matrix cascades, digital noise.
//!
//! All three sub-effects key their randomness on a position+frame hash fed
//! through one LCG step, so the overlay is deterministic regardless of draw
//! order and safe to slice across workers.

use crate::color::Hsv;
use crate::font::{draw_glyph, GLYPH};
use crate::frame::{FrameBuffer, HEIGHT, WIDTH};
use pulsar_audio::rng::MAGIC_GLITCH;
use pulsar_audio::Lcg32;

/// Frames a beat keeps the overlay boosted.
const BEAT_BOOST_FRAMES: u32 = 3;

/// Stateless mix of coordinates, frame and seed; one LCG step whitens it.
#[inline]
fn hash3(seed: u32, a: u32, b: u32, c: u32) -> u32 {
    let mixed = seed
        ^ a.wrapping_mul(0x9E37_79B1)
        ^ b.wrapping_mul(0x85EB_CA6B)
        ^ c.wrapping_mul(0xC2B2_AE35);
    Lcg32::new(mixed ^ MAGIC_GLITCH).next_u32()
}

/// Per-video glitch state (only the beat timer persists between frames).
#[derive(Debug, Clone)]
pub struct Glitch {
    seed: u32,
    beat_timer: u32,
}

impl Glitch {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            beat_timer: 0,
        }
    }

    /// Advances the beat boost window.
    pub fn update(&mut self, beat_now: bool) {
        if beat_now {
            self.beat_timer = BEAT_BOOST_FRAMES;
        } else {
            self.beat_timer = self.beat_timer.saturating_sub(1);
        }
    }

    /// Overlay intensity in `[0, 3]` for this frame.
    pub fn intensity(&self, frame: u64, level: f64) -> f64 {
        let boost = if self.beat_timer > 0 { 1.0 } else { 0.0 };
        let slow = 0.5 * (frame as f64 * 0.013).sin();
        (0.1 + level + boost + slow).clamp(0.0, 3.0)
    }

    /// Applies the three sub-effects on top of the finished frame.
    pub fn apply(&self, fb: &mut FrameBuffer, frame: u64, level: f64) {
        let intensity = self.intensity(frame, level);
        let f = frame as u32;

        // Character substitution: random cells get a random glyph.
        let subs = (intensity * 14.0) as u32;
        for i in 0..subs {
            let h = hash3(self.seed, i, f, 0x5B);
            let cx = (h % (WIDTH / GLYPH as u32)) as i32 * GLYPH;
            let cy = ((h >> 10) % (HEIGHT / GLYPH as u32)) as i32 * GLYPH;
            let code = (h >> 20) as u8;
            let hue = f64::from(h >> 24) / 256.0;
            draw_glyph(fb, cx, cy, code, Hsv::new(hue, 0.6, 1.0).pack());
        }

        // Matrix cascade: vertical glyph runs in terminal green.
        let columns = (intensity * 4.0) as u32;
        for i in 0..columns {
            let h = hash3(self.seed, i, f / 4, 0xC0);
            let cx = (h % (WIDTH / GLYPH as u32)) as i32 * GLYPH;
            let top = ((h >> 12) % HEIGHT) as i32;
            let run = 4 + (h >> 24 & 7) as i32;
            for k in 0..run {
                let code = (hash3(self.seed, i, f, k as u32) >> 16) as u8;
                let fade = 1.0 - f64::from(k) / f64::from(run);
                draw_glyph(
                    fb,
                    cx,
                    top + k * GLYPH,
                    code,
                    Hsv::new(0.33, 0.9, 0.4 + 0.6 * fade).pack(),
                );
            }
        }

        // Digital noise: raw pixel sparkle.
        let pixels = (intensity * 400.0) as u32;
        for i in 0..pixels {
            let h = hash3(self.seed, i, f, 0x11);
            let x = (h % WIDTH) as i32;
            let y = ((h >> 11) % HEIGHT) as i32;
            let v = 0.5 + f64::from(h >> 24) / 512.0;
            fb.set(x, y, Hsv::new(0.0, 0.0, v).pack());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::BLACK;

    #[test]
    fn intensity_is_clamped() {
        let mut g = Glitch::new(1);
        g.update(true);
        for frame in 0..500 {
            let i = g.intensity(frame, 1.0);
            assert!((0.0..=3.0).contains(&i));
        }
    }

    #[test]
    fn beat_boost_lasts_three_frames() {
        let mut g = Glitch::new(1);
        g.update(true);
        let boosted = g.intensity(10, 0.0);
        g.update(false);
        g.update(false);
        assert!(g.intensity(12, 0.0) > 0.9);
        g.update(false);
        let cooled = g.intensity(13, 0.0);
        assert!(boosted - cooled > 0.9);
    }

    #[test]
    fn overlay_is_position_keyed_deterministic() {
        let run = || {
            let g = Glitch::new(0xCAFE);
            let mut fb = FrameBuffer::new();
            g.apply(&mut fb, 42, 0.8);
            fb.pixels().to_vec()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn overlay_varies_by_frame_and_seed() {
        let render = |seed, frame| {
            let g = Glitch::new(seed);
            let mut fb = FrameBuffer::new();
            g.apply(&mut fb, frame, 0.8);
            fb.pixels().to_vec()
        };
        assert_ne!(render(1, 10), render(1, 11));
        assert_ne!(render(1, 10), render(2, 10));
    }

    #[test]
    fn zero_intensity_draws_nothing() {
        // level 0, no beat, and a frame where the slow sine is negative
        // enough to cancel the base term.
        let g = Glitch::new(3);
        // sin(f * 0.013) close to -1 near f = 3*pi/2/0.013 ~ 362.
        let mut fb = FrameBuffer::new();
        g.apply(&mut fb, 362, 0.0);
        assert!(fb.pixels().iter().all(|&p| p == BLACK));
    }
}
