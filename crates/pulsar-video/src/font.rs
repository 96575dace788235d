//! Bit-packed 8x8 glyph font covering all 256 code points.
//!
//! Each glyph is two 32-bit words: word 0 holds rows 0-3 (one byte per row,
//! row 0 in the low byte), word 1 holds rows 4-7. Within a row the least
//! significant bit is the leftmost pixel. Codes 0x20-0x7E carry hardcoded
//! ASCII shapes; 0x7F is a solid block; control codes are blank; the high
//! half renders fixed dither patterns so every byte value draws something.

use crate::color::Rgba;
use crate::frame::FrameBuffer;

/// Glyph cell size in pixels.
pub const GLYPH: i32 = 8;

/// Row patterns for the printable ASCII range 0x20..=0x7E.
#[rustfmt::skip]
const ASCII_ROWS: [[u8; 8]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // space
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x00, 0x18, 0x00], // !
    [0x36, 0x36, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00], // "
    [0x24, 0x7E, 0x24, 0x24, 0x24, 0x7E, 0x24, 0x00], // #
    [0x18, 0x7C, 0x1A, 0x3C, 0x58, 0x3E, 0x18, 0x00], // $
    [0x46, 0x26, 0x10, 0x08, 0x04, 0x62, 0x61, 0x00], // %
    [0x1C, 0x36, 0x1C, 0x6E, 0x3B, 0x33, 0x6E, 0x00], // &
    [0x18, 0x18, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00], // '
    [0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x18, 0x30, 0x00], // (
    [0x0C, 0x18, 0x30, 0x30, 0x30, 0x18, 0x0C, 0x00], // )
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // *
    [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00], // +
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x08], // ,
    [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00], // -
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00], // .
    [0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01, 0x00], // /
    [0x3C, 0x66, 0x76, 0x6E, 0x66, 0x66, 0x3C, 0x00], // 0
    [0x18, 0x1C, 0x18, 0x18, 0x18, 0x18, 0x7E, 0x00], // 1
    [0x3C, 0x66, 0x60, 0x30, 0x18, 0x0C, 0x7E, 0x00], // 2
    [0x3C, 0x66, 0x60, 0x38, 0x60, 0x66, 0x3C, 0x00], // 3
    [0x30, 0x38, 0x3C, 0x36, 0x7E, 0x30, 0x30, 0x00], // 4
    [0x7E, 0x06, 0x3E, 0x60, 0x60, 0x66, 0x3C, 0x00], // 5
    [0x38, 0x0C, 0x06, 0x3E, 0x66, 0x66, 0x3C, 0x00], // 6
    [0x7E, 0x60, 0x30, 0x18, 0x0C, 0x0C, 0x0C, 0x00], // 7
    [0x3C, 0x66, 0x66, 0x3C, 0x66, 0x66, 0x3C, 0x00], // 8
    [0x3C, 0x66, 0x66, 0x7C, 0x60, 0x30, 0x1C, 0x00], // 9
    [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00], // :
    [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x08], // ;
    [0x60, 0x30, 0x18, 0x0C, 0x18, 0x30, 0x60, 0x00], // <
    [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00], // =
    [0x06, 0x0C, 0x18, 0x30, 0x18, 0x0C, 0x06, 0x00], // >
    [0x3C, 0x66, 0x60, 0x30, 0x18, 0x00, 0x18, 0x00], // ?
    [0x3C, 0x66, 0x76, 0x56, 0x76, 0x06, 0x3C, 0x00], // @
    [0x18, 0x3C, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x00], // A
    [0x3E, 0x66, 0x66, 0x3E, 0x66, 0x66, 0x3E, 0x00], // B
    [0x3C, 0x66, 0x06, 0x06, 0x06, 0x66, 0x3C, 0x00], // C
    [0x1E, 0x36, 0x66, 0x66, 0x66, 0x36, 0x1E, 0x00], // D
    [0x7E, 0x06, 0x06, 0x3E, 0x06, 0x06, 0x7E, 0x00], // E
    [0x7E, 0x06, 0x06, 0x3E, 0x06, 0x06, 0x06, 0x00], // F
    [0x3C, 0x66, 0x06, 0x76, 0x66, 0x66, 0x7C, 0x00], // G
    [0x66, 0x66, 0x66, 0x7E, 0x66, 0x66, 0x66, 0x00], // H
    [0x3C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00], // I
    [0x78, 0x30, 0x30, 0x30, 0x30, 0x36, 0x1C, 0x00], // J
    [0x66, 0x36, 0x1E, 0x0E, 0x1E, 0x36, 0x66, 0x00], // K
    [0x06, 0x06, 0x06, 0x06, 0x06, 0x06, 0x7E, 0x00], // L
    [0x63, 0x77, 0x7F, 0x6B, 0x63, 0x63, 0x63, 0x00], // M
    [0x66, 0x6E, 0x7E, 0x76, 0x66, 0x66, 0x66, 0x00], // N
    [0x3C, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // O
    [0x3E, 0x66, 0x66, 0x3E, 0x06, 0x06, 0x06, 0x00], // P
    [0x3C, 0x66, 0x66, 0x66, 0x66, 0x36, 0x6C, 0x60], // Q
    [0x3E, 0x66, 0x66, 0x3E, 0x1E, 0x36, 0x66, 0x00], // R
    [0x3C, 0x66, 0x06, 0x3C, 0x60, 0x66, 0x3C, 0x00], // S
    [0x7E, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x00], // T
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x00], // U
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00], // V
    [0x63, 0x63, 0x63, 0x6B, 0x7F, 0x77, 0x63, 0x00], // W
    [0x66, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x66, 0x00], // X
    [0x66, 0x66, 0x66, 0x3C, 0x18, 0x18, 0x18, 0x00], // Y
    [0x7E, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x7E, 0x00], // Z
    [0x3C, 0x0C, 0x0C, 0x0C, 0x0C, 0x0C, 0x3C, 0x00], // [
    [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x00], // backslash
    [0x3C, 0x30, 0x30, 0x30, 0x30, 0x30, 0x3C, 0x00], // ]
    [0x08, 0x1C, 0x36, 0x63, 0x00, 0x00, 0x00, 0x00], // ^
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // _
    [0x0C, 0x18, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00], // `
    [0x00, 0x00, 0x3C, 0x60, 0x7C, 0x66, 0x7C, 0x00], // a
    [0x06, 0x06, 0x3E, 0x66, 0x66, 0x66, 0x3E, 0x00], // b
    [0x00, 0x00, 0x3C, 0x66, 0x06, 0x66, 0x3C, 0x00], // c
    [0x60, 0x60, 0x7C, 0x66, 0x66, 0x66, 0x7C, 0x00], // d
    [0x00, 0x00, 0x3C, 0x66, 0x7E, 0x06, 0x3C, 0x00], // e
    [0x38, 0x0C, 0x3E, 0x0C, 0x0C, 0x0C, 0x0C, 0x00], // f
    [0x00, 0x00, 0x7C, 0x66, 0x66, 0x7C, 0x60, 0x3C], // g
    [0x06, 0x06, 0x3E, 0x66, 0x66, 0x66, 0x66, 0x00], // h
    [0x18, 0x00, 0x1C, 0x18, 0x18, 0x18, 0x3C, 0x00], // i
    [0x30, 0x00, 0x38, 0x30, 0x30, 0x30, 0x36, 0x1C], // j
    [0x06, 0x06, 0x36, 0x1E, 0x0E, 0x1E, 0x36, 0x00], // k
    [0x1C, 0x18, 0x18, 0x18, 0x18, 0x18, 0x3C, 0x00], // l
    [0x00, 0x00, 0x37, 0x7F, 0x6B, 0x6B, 0x63, 0x00], // m
    [0x00, 0x00, 0x3E, 0x66, 0x66, 0x66, 0x66, 0x00], // n
    [0x00, 0x00, 0x3C, 0x66, 0x66, 0x66, 0x3C, 0x00], // o
    [0x00, 0x00, 0x3E, 0x66, 0x66, 0x3E, 0x06, 0x06], // p
    [0x00, 0x00, 0x7C, 0x66, 0x66, 0x7C, 0x60, 0x60], // q
    [0x00, 0x00, 0x36, 0x6E, 0x06, 0x06, 0x06, 0x00], // r
    [0x00, 0x00, 0x7C, 0x06, 0x3C, 0x60, 0x3E, 0x00], // s
    [0x0C, 0x0C, 0x3E, 0x0C, 0x0C, 0x0C, 0x38, 0x00], // t
    [0x00, 0x00, 0x66, 0x66, 0x66, 0x66, 0x7C, 0x00], // u
    [0x00, 0x00, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x00], // v
    [0x00, 0x00, 0x63, 0x6B, 0x6B, 0x7F, 0x36, 0x00], // w
    [0x00, 0x00, 0x66, 0x3C, 0x18, 0x3C, 0x66, 0x00], // x
    [0x00, 0x00, 0x66, 0x66, 0x66, 0x7C, 0x60, 0x3C], // y
    [0x00, 0x00, 0x7E, 0x30, 0x18, 0x0C, 0x7E, 0x00], // z
    [0x38, 0x0C, 0x0C, 0x06, 0x0C, 0x0C, 0x38, 0x00], // {
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18], // |
    [0x1C, 0x30, 0x30, 0x60, 0x30, 0x30, 0x1C, 0x00], // }
    [0x6E, 0x3B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // ~
];

/// Dither fills for the high half, one per 16-code band.
const SHADE_ROWS: [[u8; 2]; 8] = [
    [0x11, 0x44],
    [0x55, 0xAA],
    [0x33, 0xCC],
    [0x77, 0xDD],
    [0x0F, 0xF0],
    [0x99, 0x66],
    [0x3C, 0xC3],
    [0xFF, 0x00],
];

const fn pack_rows(rows: [u8; 8]) -> [u32; 2] {
    [
        rows[0] as u32
            | (rows[1] as u32) << 8
            | (rows[2] as u32) << 16
            | (rows[3] as u32) << 24,
        rows[4] as u32
            | (rows[5] as u32) << 8
            | (rows[6] as u32) << 16
            | (rows[7] as u32) << 24,
    ]
}

const fn build_table() -> [[u32; 2]; 256] {
    let mut table = [[0u32; 2]; 256];
    let mut code = 0x20;
    while code <= 0x7E {
        table[code] = pack_rows(ASCII_ROWS[code - 0x20]);
        code += 1;
    }
    table[0x7F] = pack_rows([0xFF; 8]);
    let mut code = 0x80;
    while code < 0x100 {
        let shade = SHADE_ROWS[(code - 0x80) >> 4];
        let mut rows = [0u8; 8];
        let mut r = 0;
        while r < 8 {
            rows[r] = shade[r & 1];
            r += 1;
        }
        table[code] = pack_rows(rows);
        code += 1;
    }
    table
}

/// The complete font: two packed words per code point.
pub static GLYPHS: [[u32; 2]; 256] = build_table();

/// Extracts row `row` (0-7) of a glyph as an 8-bit mask, LSB leftmost.
#[inline]
fn glyph_row(code: u8, row: usize) -> u8 {
    (GLYPHS[code as usize][row >> 2] >> ((row & 3) * 8)) as u8
}

/// Draws a glyph with opaque pixels (the fast path; alpha in `argb` is
/// ignored and written as-is). Off-frame pixels are dropped by the
/// framebuffer bounds check.
pub fn draw_glyph(fb: &mut FrameBuffer, x: i32, y: i32, code: u8, argb: u32) {
    for row in 0..8 {
        let bits = glyph_row(code, row);
        if bits == 0 {
            continue;
        }
        for col in 0..8 {
            if bits >> col & 1 == 1 {
                fb.set(x + col, y + row as i32, argb);
            }
        }
    }
}

/// Draws a glyph blending each pixel over the frame using the alpha byte of
/// `argb`. This path must be requested explicitly; the default is opaque.
pub fn draw_glyph_blend(fb: &mut FrameBuffer, x: i32, y: i32, code: u8, argb: u32) {
    let src = Rgba::unpack(argb);
    for row in 0..8 {
        let bits = glyph_row(code, row);
        if bits == 0 {
            continue;
        }
        for col in 0..8 {
            if bits >> col & 1 == 1 {
                let px = x + col;
                let py = y + row as i32;
                let dst = Rgba::unpack(fb.get(px, py));
                fb.set(px, py, src.over(dst).pack());
            }
        }
    }
}

/// Draws a string of glyphs left to right on one baseline.
pub fn draw_text(fb: &mut FrameBuffer, x: i32, y: i32, text: &str, argb: u32) {
    for (i, byte) in text.bytes().enumerate() {
        draw_glyph(fb, x + i as i32 * GLYPH, y, byte, argb);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::BLACK;

    #[test]
    fn every_code_point_has_an_entry() {
        // Printables and the high half all carry ink; control codes are
        // blank but present.
        for code in 0x21..=0xFFu8 {
            let words = GLYPHS[code as usize];
            assert!(
                words[0] != 0 || words[1] != 0,
                "code {code:#x} renders nothing"
            );
        }
        assert_eq!(GLYPHS[0x20], [0, 0]);
    }

    #[test]
    fn packing_layout_lsb_is_leftmost() {
        // '_' is a solid bottom row: row 7 = 0xFF lives in the top byte of
        // word 1.
        let underscore = GLYPHS[b'_' as usize];
        assert_eq!(underscore[0], 0);
        assert_eq!(underscore[1] >> 24, 0xFF);
    }

    #[test]
    fn opaque_draw_writes_exact_color() {
        let mut fb = FrameBuffer::new();
        draw_glyph(&mut fb, 10, 10, b'#', 0xFF12_3456);
        assert!(fb.ink_in_rect(10, 10, 18, 18) > 0);
        // '#' row 1 is 0x7E: bits 1..=6 set.
        assert_eq!(fb.get(11, 11), 0xFF12_3456);
        assert_eq!(fb.get(10, 11), BLACK);
    }

    #[test]
    fn draw_never_panics_at_edges() {
        let mut fb = FrameBuffer::new();
        draw_glyph(&mut fb, -4, -4, b'@', 0xFFFF_FFFF);
        draw_glyph(&mut fb, 797, 597, b'@', 0xFFFF_FFFF);
        draw_glyph_blend(&mut fb, -4, 597, b'@', 0x80FF_FFFF);
    }

    #[test]
    fn blend_at_half_alpha_mixes() {
        let mut fb = FrameBuffer::new();
        // '|' has a solid center column.
        draw_glyph_blend(&mut fb, 0, 0, b'|', 0x80FF_FFFF);
        let px = Rgba::unpack(fb.get(3, 0));
        assert!(px.r > 100 && px.r < 150);
    }

    #[test]
    fn zero_alpha_blend_leaves_frame_black() {
        let mut fb = FrameBuffer::new();
        draw_glyph_blend(&mut fb, 0, 0, b'#', 0x00FF_FFFF);
        assert_eq!(fb.ink_in_rect(0, 0, 8, 8), 0);
    }

    #[test]
    fn draw_text_advances_by_cell() {
        let mut fb = FrameBuffer::new();
        draw_text(&mut fb, 0, 0, "##", 0xFFFF_FFFF);
        assert!(fb.ink_in_rect(0, 0, 8, 8) > 0);
        assert!(fb.ink_in_rect(8, 0, 16, 8) > 0);
    }
}
