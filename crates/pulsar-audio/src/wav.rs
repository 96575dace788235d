//! Deterministic RIFF/WAVE writing and reading.
//!
//! The public artifact is 16-bit PCM stereo at 44.1 kHz; a 32-bit float
//! variant (format code 3) exists for internal use. The reader accepts both,
//! because the frame renderer's fallback analyzer consumes the engine's own
//! output.

use std::io::{self, Write};

use crate::error::{AudioError, AudioResult};

/// WAV format parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavFormat {
    /// Format code: 1 = integer PCM, 3 = IEEE float.
    pub format_code: u16,
    /// Channel count.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bits per sample (16 for PCM, 32 for float).
    pub bits_per_sample: u16,
}

impl WavFormat {
    /// Stereo 16-bit PCM at the given rate.
    pub fn pcm16_stereo(sample_rate: u32) -> Self {
        Self {
            format_code: 1,
            channels: 2,
            sample_rate,
            bits_per_sample: 16,
        }
    }

    /// Stereo 32-bit float at the given rate.
    pub fn float32_stereo(sample_rate: u32) -> Self {
        Self {
            format_code: 3,
            channels: 2,
            sample_rate,
            bits_per_sample: 32,
        }
    }

    fn block_align(&self) -> u16 {
        self.channels * self.bits_per_sample / 8
    }

    fn byte_rate(&self) -> u32 {
        self.sample_rate * u32::from(self.block_align())
    }
}

/// Writes a complete WAV file (header plus `pcm_data`) to `writer`.
pub fn write_wav<W: Write>(writer: &mut W, format: &WavFormat, pcm_data: &[u8]) -> io::Result<()> {
    let data_size = pcm_data.len() as u32;
    let file_size = 36 + data_size;

    writer.write_all(b"RIFF")?;
    writer.write_all(&file_size.to_le_bytes())?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_all(&16u32.to_le_bytes())?;
    writer.write_all(&format.format_code.to_le_bytes())?;
    writer.write_all(&format.channels.to_le_bytes())?;
    writer.write_all(&format.sample_rate.to_le_bytes())?;
    writer.write_all(&format.byte_rate().to_le_bytes())?;
    writer.write_all(&format.block_align().to_le_bytes())?;
    writer.write_all(&format.bits_per_sample.to_le_bytes())?;

    writer.write_all(b"data")?;
    writer.write_all(&data_size.to_le_bytes())?;
    writer.write_all(pcm_data)?;

    Ok(())
}

/// Converts stereo f64 samples to interleaved little-endian 16-bit PCM.
/// Values outside `[-1, 1]` are clipped.
pub fn stereo_to_pcm16(left: &[f64], right: &[f64]) -> Vec<u8> {
    let len = left.len().min(right.len());
    let mut pcm = Vec::with_capacity(len * 4);
    for i in 0..len {
        for &s in &[left[i], right[i]] {
            let v = (s.clamp(-1.0, 1.0) * 32767.0).round() as i16;
            pcm.extend_from_slice(&v.to_le_bytes());
        }
    }
    pcm
}

/// Converts stereo f64 samples to interleaved little-endian 32-bit floats.
pub fn stereo_to_float32(left: &[f64], right: &[f64]) -> Vec<u8> {
    let len = left.len().min(right.len());
    let mut pcm = Vec::with_capacity(len * 8);
    for i in 0..len {
        pcm.extend_from_slice(&(left[i] as f32).to_le_bytes());
        pcm.extend_from_slice(&(right[i] as f32).to_le_bytes());
    }
    pcm
}

/// A decoded WAV: format plus per-channel samples in `[-1, 1]`.
#[derive(Debug, Clone)]
pub struct WavData {
    pub format: WavFormat,
    /// One Vec per channel, equal lengths.
    pub channels: Vec<Vec<f64>>,
}

impl WavData {
    /// Frames per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Averages all channels into one mono signal.
    pub fn to_mono(&self) -> Vec<f64> {
        let n = self.len();
        let ch = self.channels.len().max(1) as f64;
        (0..n)
            .map(|i| self.channels.iter().map(|c| c[i]).sum::<f64>() / ch)
            .collect()
    }
}

/// Parses a WAV byte stream. Supports 16-bit PCM and 32-bit float, any
/// channel count; unknown chunks are skipped.
pub fn read_wav(bytes: &[u8]) -> AudioResult<WavData> {
    if bytes.len() < 12 || &bytes[0..4] != b"RIFF" || &bytes[8..12] != b"WAVE" {
        return Err(AudioError::malformed_wav("missing RIFF/WAVE header"));
    }

    let mut format: Option<WavFormat> = None;
    let mut data: Option<&[u8]> = None;
    let mut pos = 12;
    while pos + 8 <= bytes.len() {
        let id = &bytes[pos..pos + 4];
        let size = u32::from_le_bytes(bytes[pos + 4..pos + 8].try_into().unwrap()) as usize;
        let body_end = (pos + 8 + size).min(bytes.len());
        let body = &bytes[pos + 8..body_end];
        match id {
            b"fmt " => {
                if body.len() < 16 {
                    return Err(AudioError::malformed_wav("fmt chunk too short"));
                }
                format = Some(WavFormat {
                    format_code: u16::from_le_bytes(body[0..2].try_into().unwrap()),
                    channels: u16::from_le_bytes(body[2..4].try_into().unwrap()),
                    sample_rate: u32::from_le_bytes(body[4..8].try_into().unwrap()),
                    bits_per_sample: u16::from_le_bytes(body[14..16].try_into().unwrap()),
                });
            }
            b"data" => data = Some(body),
            _ => {}
        }
        // Chunks are word-aligned.
        pos = body_end + (size & 1);
    }

    let format = format.ok_or_else(|| AudioError::malformed_wav("no fmt chunk"))?;
    let data = data.ok_or_else(|| AudioError::malformed_wav("no data chunk"))?;
    if format.channels == 0 {
        return Err(AudioError::malformed_wav("zero channels"));
    }
    if format.sample_rate == 0 {
        return Err(AudioError::InvalidSampleRate { rate: 0 });
    }

    let channels = usize::from(format.channels);
    let decoded: Vec<f64> = match (format.format_code, format.bits_per_sample) {
        (1, 16) => data
            .chunks_exact(2)
            .map(|b| f64::from(i16::from_le_bytes([b[0], b[1]])) / 32767.0)
            .collect(),
        (3, 32) => data
            .chunks_exact(4)
            .map(|b| f64::from(f32::from_le_bytes([b[0], b[1], b[2], b[3]])))
            .collect(),
        (code, bits) => {
            return Err(AudioError::malformed_wav(format!(
                "unsupported format code {code} at {bits} bits"
            )))
        }
    };

    let frames = decoded.len() / channels;
    let mut out = vec![Vec::with_capacity(frames); channels];
    for frame in decoded.chunks_exact(channels) {
        for (ch, &s) in frame.iter().enumerate() {
            out[ch].push(s);
        }
    }
    Ok(WavData {
        format,
        channels: out,
    })
}
