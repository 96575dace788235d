//! Boss formations: seed-rolled component clusters of rotated glyph
//! polygons.

use crate::color::Hsv;
use crate::font::draw_glyph;
use crate::frame::FrameBuffer;
use crate::luts::TrigLut;
use pulsar_audio::rng::{MAGIC_BOSS, MAGIC_SHAPES};
use pulsar_audio::Lcg32;

/// Boss anchor point on screen.
pub const BOSS_X: f64 = 600.0;
pub const BOSS_Y: f64 = 250.0;

/// Collision radius of the whole formation.
pub const BOSS_RADIUS: f64 = 120.0;

/// Hard cap on formation components.
const MAX_COMPONENTS: usize = 12;

/// Component shape vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Triangle,
    Diamond,
    Hexagon,
    Star,
    Square,
}

impl ShapeKind {
    const ALL: [ShapeKind; 5] = [
        ShapeKind::Triangle,
        ShapeKind::Diamond,
        ShapeKind::Hexagon,
        ShapeKind::Star,
        ShapeKind::Square,
    ];

    /// Polygon vertices on the unit circle, via the trig tables. Stars
    /// alternate two radii.
    fn vertices(self, lut: &TrigLut) -> Vec<(f64, f64)> {
        let ring = |n: usize, phase: f64| -> Vec<(f64, f64)> {
            (0..n)
                .map(|i| {
                    let a = std::f64::consts::TAU * i as f64 / n as f64 + phase;
                    (lut.cos(a), lut.sin(a))
                })
                .collect()
        };
        match self {
            ShapeKind::Triangle => ring(3, -std::f64::consts::FRAC_PI_2),
            ShapeKind::Diamond => ring(4, -std::f64::consts::FRAC_PI_2),
            ShapeKind::Square => ring(4, -std::f64::consts::FRAC_PI_4),
            ShapeKind::Hexagon => ring(6, 0.0),
            ShapeKind::Star => (0..10)
                .map(|i| {
                    let a = std::f64::consts::TAU * i as f64 / 10.0 - std::f64::consts::FRAC_PI_2;
                    let r = if i % 2 == 0 { 1.0 } else { 0.45 };
                    (r * lut.cos(a), r * lut.sin(a))
                })
                .collect(),
        }
    }
}

/// The eight formation layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formation {
    StarBurst,
    Cluster,
    Wing,
    Spiral,
    Grid,
    RandomChaos,
    Layered,
    Pulsing,
}

impl Formation {
    const ALL: [Formation; 8] = [
        Formation::StarBurst,
        Formation::Cluster,
        Formation::Wing,
        Formation::Spiral,
        Formation::Grid,
        Formation::RandomChaos,
        Formation::Layered,
        Formation::Pulsing,
    ];
}

/// One formation component: a fixed offset (per layout), shape, size, color
/// and spin.
#[derive(Debug, Clone, Copy)]
struct Component {
    // Layout inputs rolled at build time; interpretation depends on the
    // formation.
    roll_x: f64,
    roll_y: f64,
    shape: ShapeKind,
    size: f64,
    hue: f64,
    sat: f64,
    val: f64,
    rot: f64,
}

/// A seed-frozen boss.
#[derive(Debug, Clone)]
pub struct Boss {
    pub formation: Formation,
    components: Vec<Component>,
}

impl Boss {
    /// Rolls the formation and its components from the boss and shape
    /// streams.
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = Lcg32::stream(seed, MAGIC_BOSS);
        let mut shapes = Lcg32::stream(seed, MAGIC_SHAPES);

        let formation = Formation::ALL[rng.next_range(8) as usize];
        let count = ((3 + rng.next_range(10)) as usize).min(MAX_COMPONENTS);
        let components = (0..count)
            .map(|_| Component {
                roll_x: rng.next_signed_f64(),
                roll_y: rng.next_signed_f64(),
                shape: ShapeKind::ALL[shapes.next_range(5) as usize],
                size: 15.0 + f64::from(shapes.next_range(26)),
                hue: shapes.next_f64(),
                sat: 0.6 + shapes.next_f64() * 0.4,
                val: 0.7 + shapes.next_f64() * 0.3,
                rot: shapes.next_f64() * std::f64::consts::TAU,
            })
            .collect();
        Self {
            formation,
            components,
        }
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Formation centroid; projectiles aim here.
    pub fn centroid(&self) -> (f64, f64) {
        (BOSS_X, BOSS_Y)
    }

    /// Screen offset of component `i` for this frame.
    fn layout(
        &self,
        lut: &TrigLut,
        i: usize,
        c: &Component,
        frame: u64,
        level: f64,
    ) -> (f64, f64, f64) {
        let n = self.components.len() as f64;
        let fi = i as f64;
        let t = frame as f64;
        match self.formation {
            Formation::StarBurst => {
                let a = std::f64::consts::TAU * fi / n;
                let r = 20.0 + fi * 12.0;
                (r * lut.cos(a), r * lut.sin(a), c.size)
            }
            Formation::Cluster => (c.roll_x * 120.0, c.roll_y * 120.0, c.size),
            Formation::Wing => {
                let arm = (fi / 2.0).ceil() * 28.0;
                let side = if i % 2 == 0 { 1.0 } else { -1.0 };
                (side * arm, arm * 0.35, c.size)
            }
            Formation::Spiral => {
                let a = fi * (std::f64::consts::TAU / 8.0) + t * 0.02;
                let r = 15.0 + fi * 11.0;
                (r * lut.cos(a), r * lut.sin(a), c.size)
            }
            Formation::Grid => {
                let cols = (n.sqrt().ceil()).max(1.0);
                let col = fi % cols;
                let row = (fi / cols).floor();
                ((col - (cols - 1.0) / 2.0) * 42.0, (row - 1.0) * 42.0, c.size)
            }
            Formation::RandomChaos => (c.roll_x * 150.0, c.roll_y * 100.0, c.size),
            Formation::Layered => {
                let ring = (fi / 4.0).floor();
                let a = std::f64::consts::TAU * (fi % 4.0) / 4.0 + ring * 0.5;
                let r = 25.0 + ring * 30.0;
                (r * lut.cos(a), r * lut.sin(a), c.size)
            }
            Formation::Pulsing => {
                let a = std::f64::consts::TAU * fi / n;
                (55.0 * lut.cos(a), 55.0 * lut.sin(a), c.size * (1.0 + 0.3 * level))
            }
        }
    }

    /// Draws the formation around the anchor.
    pub fn draw(&self, fb: &mut FrameBuffer, lut: &TrigLut, frame: u64, level: f64) {
        for (i, c) in self.components.iter().enumerate() {
            let (dx, dy, size) = self.layout(lut, i, c, frame, level);
            let spin = c.rot + frame as f64 * 0.01;
            let argb = Hsv::new(c.hue, c.sat, c.val).pack();
            draw_shape(
                fb,
                lut,
                BOSS_X + dx,
                BOSS_Y + dy,
                c.shape,
                size,
                spin,
                argb,
            );
        }
    }
}

/// Draws a shape as a closed polygon: vertex glyphs joined by interpolated
/// edge glyphs, rotated through the trig tables.
pub fn draw_shape(
    fb: &mut FrameBuffer,
    lut: &TrigLut,
    cx: f64,
    cy: f64,
    shape: ShapeKind,
    size: f64,
    rot: f64,
    argb: u32,
) {
    const VERTEX_GLYPH: u8 = b'@';
    const EDGE_GLYPH: u8 = b'+';

    let verts = shape.vertices(lut);
    let n = verts.len();
    let rotated: Vec<(f64, f64)> = verts
        .iter()
        .map(|&(x, y)| {
            let (rx, ry) = lut.rotate(x * size, y * size, rot);
            (cx + rx, cy + ry)
        })
        .collect();

    for a in 0..n {
        // Each edge gets its own counter; the edge index and the step index
        // never share storage.
        let b = (a + 1) % n;
        let (x0, y0) = rotated[a];
        let (x1, y1) = rotated[b];
        let len = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = (len / 6.0).ceil().max(1.0) as i32;
        for s in 1..steps {
            let t = f64::from(s) / f64::from(steps);
            let ex = x0 + (x1 - x0) * t;
            let ey = y0 + (y1 - y0) * t;
            draw_glyph(fb, ex as i32 - 4, ey as i32 - 4, EDGE_GLYPH, argb);
        }
    }
    for &(vx, vy) in &rotated {
        draw_glyph(fb, vx as i32 - 4, vy as i32 - 4, VERTEX_GLYPH, argb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_count_within_pool() {
        for seed in 0..256u32 {
            let boss = Boss::from_seed(seed.wrapping_mul(0x0101_0101));
            let n = boss.component_count();
            assert!((3..=MAX_COMPONENTS).contains(&n));
        }
    }

    #[test]
    fn formation_choice_is_seeded() {
        let a = Boss::from_seed(5);
        let b = Boss::from_seed(5);
        assert_eq!(a.formation, b.formation);
        // All eight formations are reachable over a seed sweep.
        let mut seen = std::collections::HashSet::new();
        for seed in 0..512u32 {
            seen.insert(format!("{:?}", Boss::from_seed(seed * 7919).formation));
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn shapes_draw_ink_around_center() {
        let lut = TrigLut::new();
        for shape in ShapeKind::ALL {
            let mut fb = FrameBuffer::new();
            draw_shape(&mut fb, &lut, 400.0, 300.0, shape, 30.0, 0.7, 0xFFFF_FFFF);
            assert!(
                fb.ink_in_rect(360, 260, 440, 340) > 20,
                "{shape:?} drew no outline"
            );
        }
    }

    #[test]
    fn boss_draw_is_deterministic_per_frame() {
        let boss = Boss::from_seed(0xCAFEBABE);
        let lut = TrigLut::new();
        let mut a = FrameBuffer::new();
        let mut b = FrameBuffer::new();
        boss.draw(&mut a, &lut, 30, 0.4);
        boss.draw(&mut b, &lut, 30, 0.4);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn spiral_rotates_over_time() {
        // Find a spiral-formation seed, then confirm frames differ.
        let seed = (0..2000u32)
            .find(|&s| Boss::from_seed(s).formation == Formation::Spiral)
            .expect("no spiral seed in range");
        let boss = Boss::from_seed(seed);
        let lut = TrigLut::new();
        let mut a = FrameBuffer::new();
        let mut b = FrameBuffer::new();
        boss.draw(&mut a, &lut, 0, 0.0);
        boss.draw(&mut b, &lut, 40, 0.0);
        assert_ne!(a.pixels(), b.pixels());
    }
}
