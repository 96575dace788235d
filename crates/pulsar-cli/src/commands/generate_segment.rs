//! `pulsar generate-segment`

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use pulsar_audio::DelayRouting;

use super::{vlog, write_atomic};
use crate::input::parse_seed;

pub fn run(seed_arg: &str, out: Option<&str>, routing: DelayRouting, float: bool) -> Result<ExitCode> {
    let seed = parse_seed(seed_arg)?;
    let default_name = format!("seed_0x{seed:08x}.wav");
    let out_path = out.unwrap_or(&default_name);

    vlog(&format!("rendering segment for seed 0x{seed:08x}"));
    let segment = pulsar_audio::generate(seed, routing)
        .with_context(|| format!("segment generation failed for seed 0x{seed:08x}"))?;

    let bytes = if float {
        segment.float_wav_bytes()
    } else {
        segment.wav_bytes()
    };
    write_atomic(Path::new(out_path), &bytes)
        .with_context(|| format!("writing {out_path}"))?;

    vlog(&format!(
        "wrote {out_path} ({} samples, pcm hash {})",
        segment.left.len(),
        segment.pcm_hash
    ));
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_a_decodable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("seg.wav");
        let out_str = out.to_str().unwrap();
        run("0xCAFEBABE", Some(out_str), DelayRouting::MelodyOnly, false).unwrap();

        let bytes = std::fs::read(&out).unwrap();
        let decoded = pulsar_audio::wav::read_wav(&bytes).unwrap();
        assert_eq!(decoded.format.sample_rate, 44_100);
        assert_eq!(decoded.format.channels, 2);
        assert_eq!(decoded.format.format_code, 1);
    }

    #[test]
    fn float_flag_switches_format() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("seg.wav");
        run(
            "0x1",
            Some(out.to_str().unwrap()),
            DelayRouting::MelodyOnly,
            true,
        )
        .unwrap();
        let decoded = pulsar_audio::wav::read_wav(&std::fs::read(&out).unwrap()).unwrap();
        assert_eq!(decoded.format.format_code, 3);
        assert_eq!(decoded.format.bits_per_sample, 32);
    }

    #[test]
    fn invalid_seed_fails_before_any_work() {
        let err = run("0xnope", None, DelayRouting::MelodyOnly, false).unwrap_err();
        assert!(err.to_string().contains("invalid seed"));
    }
}
