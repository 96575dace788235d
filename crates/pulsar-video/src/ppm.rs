//! Deterministic P6 PPM output.
//!
//! One frame is a `P6` header plus raw RGB bytes; concatenating frames into
//! one stream is legal and is how pipe mode feeds an encoder.

use std::io::Write;

use crate::frame::{FrameBuffer, HEIGHT, WIDTH};

/// Writes one frame as binary P6.
pub fn write_ppm<W: Write>(fb: &FrameBuffer, writer: &mut W) -> std::io::Result<()> {
    let mut bytes = Vec::with_capacity((WIDTH * HEIGHT * 3) as usize + 16);
    bytes.extend_from_slice(format!("P6\n{WIDTH} {HEIGHT}\n255\n").as_bytes());
    fb.write_rgb_bytes(&mut bytes);
    writer.write_all(&bytes)
}

/// File name for frame `index`: `frame_000042.ppm`.
pub fn frame_filename(index: u64) -> String {
    format!("frame_{index:06}.ppm")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_payload_size() {
        let fb = FrameBuffer::new();
        let mut out = Vec::new();
        write_ppm(&fb, &mut out).unwrap();
        assert!(out.starts_with(b"P6\n800 600\n255\n"));
        assert_eq!(out.len(), b"P6\n800 600\n255\n".len() + 800 * 600 * 3);
    }

    #[test]
    fn concatenated_frames_are_self_delimiting() {
        let fb = FrameBuffer::new();
        let mut out = Vec::new();
        write_ppm(&fb, &mut out).unwrap();
        write_ppm(&fb, &mut out).unwrap();
        let frame_len = b"P6\n800 600\n255\n".len() + 800 * 600 * 3;
        assert_eq!(out.len(), frame_len * 2);
        assert_eq!(&out[frame_len..frame_len + 2], b"P6");
    }

    #[test]
    fn filenames_are_zero_padded() {
        assert_eq!(frame_filename(0), "frame_000000.ppm");
        assert_eq!(frame_filename(42), "frame_000042.ppm");
        assert_eq!(frame_filename(123_456), "frame_123456.ppm");
    }
}
