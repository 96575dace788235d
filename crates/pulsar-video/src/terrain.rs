//! Two-layer audio-reactive procedural terrain.
//!
//! The bottom layer is a 64-tile scrolling world rendered as colored glyph
//! cells; each tile type owns a palette and the character choice follows a
//! position hash whose thresholds breathe with the audio level. The top
//! layer is a thin sine-wave band scrolling at twice the speed.

use crate::color::Hsv;
use crate::font::{draw_glyph, GLYPH};
use crate::frame::{FrameBuffer, HEIGHT, WIDTH};
use crate::luts::TrigLut;
use pulsar_audio::rng::MAGIC_TERRAIN;
use pulsar_audio::Lcg32;

/// World size in tiles; a power of two so wrapping is a mask.
const TILE_COUNT: usize = 64;
/// Tile width in pixels; a power of two so scroll offsets are masks.
const TILE_W: u64 = 32;
/// Top edge of the bottom terrain band.
const BOTTOM_BAND_Y: i32 = 456;
/// Baseline of the top sine band.
const TOP_BAND_Y: i32 = 420;

/// Tile types of the bottom layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileKind {
    Flat,
    Wall,
    SlopeUp,
    SlopeDown,
    Gap,
}

impl TileKind {
    /// Base palette hue, in turns.
    fn base_hue(self) -> f64 {
        match self {
            TileKind::Flat => 0.58,     // blue, drifting through the rainbow
            TileKind::Wall => 0.23,     // green/yellow
            TileKind::SlopeUp => 0.85,  // magenta
            TileKind::SlopeDown => 0.5, // cyan
            TileKind::Gap => 0.08,      // orange
        }
    }
}

/// Character sets by density band.
const DENSE: [u8; 4] = [b'#', b'@', b'%', b'*'];
const MEDIUM: [u8; 4] = [b'=', b'+', b'~', b':'];
const SPARSE: [u8; 4] = [b'-', b'.', b',', b'_'];

/// Top band characters by intensity.
const TOP_CHARS: [u8; 5] = [b'^', b'=', b'~', b'-', b'_'];

/// Seeded terrain state: the tile pattern is fixed for the whole video.
#[derive(Debug, Clone)]
pub struct Terrain {
    tiles: [TileKind; TILE_COUNT],
}

impl Terrain {
    /// Generates the 64-tile pattern with weighted variable-length runs.
    pub fn from_seed(seed: u32) -> Self {
        let mut rng = Lcg32::stream(seed, MAGIC_TERRAIN);
        let mut tiles = [TileKind::Flat; TILE_COUNT];
        let mut filled = 0;
        while filled < TILE_COUNT {
            let kind = match rng.next_range(100) {
                0..=34 => TileKind::Flat,
                35..=54 => TileKind::Wall,
                55..=69 => TileKind::SlopeUp,
                70..=84 => TileKind::SlopeDown,
                _ => TileKind::Gap,
            };
            let run_len = (2 + rng.next_range(5)) as usize;
            for _ in 0..run_len {
                if filled >= TILE_COUNT {
                    break;
                }
                tiles[filled] = kind;
                filled += 1;
            }
        }
        Self { tiles }
    }

    pub fn tiles(&self) -> &[TileKind; TILE_COUNT] {
        &self.tiles
    }

    /// Scroll offset in pixels for this frame.
    fn scroll_px(frame: u64, level: f64) -> u64 {
        (frame as f64 * 2.0 * (1.0 + 3.0 * level)) as u64
    }

    /// Position hash for character selection.
    #[inline]
    fn char_hash(x: i64, y: i64) -> u32 {
        (((x * 13 + y * 7) ^ (x >> 3)) & 0xFF) as u32
    }

    /// Draws the bottom tile band.
    pub fn draw_bottom(&self, fb: &mut FrameBuffer, frame: u64, level: f64) {
        let scroll = Self::scroll_px(frame, level);
        let rows = (HEIGHT as i32 - BOTTOM_BAND_Y) / GLYPH;
        let cols = WIDTH as i32 / GLYPH + 1;
        // Density thresholds breathe with level and slowly with time.
        let frame_drift = ((frame / 8) & 127) as f64;
        let dense_limit = 40.0 + level * 100.0 + frame_drift;
        let medium_limit = 120.0 + level * 80.0 + frame_drift;

        for row in 0..rows {
            let y = BOTTOM_BAND_Y + row * GLYPH;
            let depth = f64::from(row) / f64::from(rows);
            for col in 0..cols {
                let x_world = col as u64 * GLYPH as u64 + scroll;
                let tile = self.tiles[((x_world / TILE_W) as usize) & (TILE_COUNT - 1)];

                let cell_x = (x_world / GLYPH as u64) as i64;
                let h = Self::char_hash(cell_x, i64::from(row));
                let hf = f64::from(h);
                let code = if hf < dense_limit {
                    DENSE[(h & 3) as usize]
                } else if hf < medium_limit {
                    MEDIUM[(h & 3) as usize]
                } else {
                    SPARSE[(h & 3) as usize]
                };

                let mut hue = tile.base_hue() + frame as f64 * 0.001;
                if tile == TileKind::Flat {
                    // The flat floor cycles hue along the world axis.
                    hue += (x_world & 255) as f64 / 255.0 * 0.4;
                }
                if tile == TileKind::Wall {
                    hue += level * 0.1;
                }
                let sat = 0.9 + level * 0.1;
                let val = (0.8 + level * 0.2) * (1.0 - depth * 0.35);

                let x = col * GLYPH - (x_world % GLYPH as u64) as i32;
                draw_glyph(fb, x, y, code, Hsv::new(hue, sat, val).pack());
            }
        }
    }

    /// Draws the top sine band at double scroll speed. Brightness follows
    /// the treble band rather than the full mix.
    pub fn draw_top(&self, fb: &mut FrameBuffer, lut: &TrigLut, frame: u64, level: f64, treble: f64) {
        let scroll = Self::scroll_px(frame, level) * 2;
        let cols = WIDTH as i32 / GLYPH;
        for col in 0..cols {
            let x_world = col as u64 * GLYPH as u64 + scroll;
            let phase = frame as f64 * 0.02 + x_world as f64 * 0.015;
            let wave = lut.sin(phase);
            let lift = (wave * 2.5).round() as i32;
            let intensity = ((wave + 1.0) / 2.0 * (TOP_CHARS.len() - 1) as f64) as usize;
            let code = TOP_CHARS[intensity.min(TOP_CHARS.len() - 1)];
            let hue = TileKind::Flat.base_hue() + 0.3 + frame as f64 * 0.001;
            let val = 0.6 + treble * 0.4;
            draw_glyph(
                fb,
                col * GLYPH,
                TOP_BAND_Y - lift * GLYPH / 2,
                code,
                Hsv::new(hue, 0.8, val).pack(),
            );
        }
    }
}
