//! The player ship: seed-assembled ASCII parts with audio-reactive motion.

use crate::color::Hsv;
use crate::font::{draw_glyph, GLYPH};
use crate::frame::FrameBuffer;
use crate::luts::TrigLut;
use pulsar_audio::rng::MAGIC_SHIP;
use pulsar_audio::Lcg32;

/// Canonical resting position (a quarter in from the left, vertical center).
const BASE_X: i32 = 200;
const BASE_Y: i32 = 300;

const SWAY_AMPL: f64 = 40.0;
const SWAY_RATE: f64 = 0.05;
const BOB_AMPL: f64 = 30.0;
const BOB_RATE: f64 = 0.07;
const DODGE_AMPL: f64 = 35.0;

/// Fixed component tables. These strings are normative: they are the ship's
/// visible pixels.
const NOSES: [&str; 4] = [">", "}>", "=>", ")>"];
const BODIES: [&str; 4] = ["[##]", "[==]", "{@@}", "(%%)"];
const WINGS: [&str; 4] = ["/^\\", "<->", "/*\\", "<=>"];
const TRAILS: [&str; 4] = ["~~", "--", "==", "**"];

/// A seed-frozen ship build.
#[derive(Debug, Clone, Copy)]
pub struct Ship {
    nose: usize,
    body: usize,
    wings: usize,
    trail: usize,
    /// Concentric draw layers, 1..=3.
    pub size: u32,
    hue: f64,
    hue2: f64,
}

impl Ship {
    /// Rolls the component indices, size and hues from the ship stream.
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = Lcg32::stream(seed, MAGIC_SHIP);
        let nose = rng.next_range(4) as usize;
        let body = rng.next_range(4) as usize;
        let wings = rng.next_range(4) as usize;
        let trail = rng.next_range(4) as usize;
        let size = 1 + rng.next_range(3);
        let hue = rng.next_f64();
        Self {
            nose,
            body,
            wings,
            trail,
            size,
            hue,
            hue2: hue + 0.3,
        }
    }

    /// Ship position for a frame: sway, bob, and an audio dodge that pulls
    /// the ship up as the mix gets loud.
    pub fn position(&self, lut: &TrigLut, frame: u64, level: f64) -> (i32, i32) {
        let sway = SWAY_AMPL * lut.sin(frame as f64 * SWAY_RATE);
        let bob = BOB_AMPL * lut.sin(frame as f64 * BOB_RATE);
        let dodge = DODGE_AMPL * level;
        (BASE_X + sway as i32, BASE_Y + (bob - dodge) as i32)
    }

    fn draw_line(fb: &mut FrameBuffer, x: i32, y: i32, text: &str, argb: u32) {
        for (i, byte) in text.bytes().enumerate() {
            draw_glyph(fb, x + i as i32 * GLYPH, y, byte, argb);
        }
    }

    /// Draws the assembled ship. Size-`s` ships draw `s` opaque layers, the
    /// outer ones staggered by one glyph cell in the secondary hue.
    pub fn draw(&self, fb: &mut FrameBuffer, lut: &TrigLut, frame: u64, level: f64) {
        let (cx, cy) = self.position(lut, frame, level);
        for layer in (0..self.size as i32).rev() {
            let off = layer * GLYPH / 2;
            let hue = if layer == 0 { self.hue } else { self.hue2 };
            let val = 1.0 - f64::from(layer) * 0.25;
            let argb = Hsv::new(hue, 0.85, val).pack();
            self.draw_layer(fb, cx - off, cy - off, argb);
        }
    }

    fn draw_layer(&self, fb: &mut FrameBuffer, cx: i32, cy: i32, argb: u32) {
        let trail = TRAILS[self.trail];
        let body = BODIES[self.body];
        let nose = NOSES[self.nose];
        let wings = WINGS[self.wings];

        let trail_w = trail.len() as i32 * GLYPH;
        let body_x = cx;
        // Wings sit above and below the hull midline.
        Self::draw_line(fb, body_x, cy - GLYPH, wings, argb);
        Self::draw_line(fb, body_x - trail_w, cy, trail, argb);
        Self::draw_line(fb, body_x, cy, body, argb);
        Self::draw_line(
            fb,
            body_x + body.len() as i32 * GLYPH,
            cy,
            nose,
            argb,
        );
        Self::draw_line(fb, body_x, cy + GLYPH, wings, argb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_is_seed_stable() {
        let a = Ship::from_seed(123);
        let b = Ship::from_seed(123);
        assert_eq!(a.nose, b.nose);
        assert_eq!(a.size, b.size);
        assert!((a.hue - b.hue).abs() < 1e-12);
    }

    #[test]
    fn size_in_range() {
        for seed in 0..64 {
            let ship = Ship::from_seed(seed);
            assert!((1..=3).contains(&ship.size));
        }
    }

    #[test]
    fn frame_zero_ink_at_canonical_position() {
        // At frame 0 sway and bob are zero; with zero level the hull sits
        // exactly on the base position, so ink lands in the canonical box.
        let ship = Ship::from_seed(0xCAFEBABE);
        let lut = TrigLut::new();
        let mut fb = FrameBuffer::new();
        ship.draw(&mut fb, &lut, 0, 0.0);
        assert!(fb.ink_in_rect(175, 290, 255, 310) > 0);
    }

    #[test]
    fn dodge_lifts_the_ship() {
        let ship = Ship::from_seed(1);
        let lut = TrigLut::new();
        let (_, quiet_y) = ship.position(&lut, 0, 0.0);
        let (_, loud_y) = ship.position(&lut, 0, 1.0);
        assert!(loud_y < quiet_y);
        assert_eq!(quiet_y - loud_y, DODGE_AMPL as i32);
    }

    #[test]
    fn draw_is_deterministic() {
        let ship = Ship::from_seed(77);
        let lut = TrigLut::new();
        let mut a = FrameBuffer::new();
        let mut b = FrameBuffer::new();
        ship.draw(&mut a, &lut, 12, 0.6);
        ship.draw(&mut b, &lut, 12, 0.6);
        assert_eq!(a.pixels(), b.pixels());
    }
}
