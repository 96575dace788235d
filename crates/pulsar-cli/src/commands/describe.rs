//! `pulsar describe`: print the musical parameters a seed derives.

use std::process::ExitCode;

use anyhow::Result;
use colored::Colorize;
use pulsar_audio::MusicClock;

use crate::input::parse_seed;

pub fn run(seed_arg: &str, json: bool) -> Result<ExitCode> {
    let seed = parse_seed(seed_arg)?;
    let clock = MusicClock::from_seed(seed);

    if json {
        // Small and stable; assembled by hand rather than pulling serde
        // into the CLI crate.
        println!(
            "{{\"seed\":\"0x{seed:08x}\",\"bpm\":{},\"root_hz\":{},\"step_samples\":{},\"total_samples\":{},\"duration_secs\":{:.4},\"total_frames\":{}}}",
            clock.bpm,
            clock.root_hz,
            clock.step_samples,
            clock.total_samples,
            clock.duration_secs(),
            clock.total_frames(),
        );
    } else {
        println!("{}  0x{seed:08x}", "seed".bold());
        println!("{}   {} bpm", "tempo".bold(), clock.bpm);
        println!("{}    {} Hz", "root".bold(), clock.root_hz);
        println!("{}    {} samples", "step".bold(), clock.step_samples);
        println!(
            "{} {} samples ({:.2} s, {} frames)",
            "segment".bold(),
            clock.total_samples,
            clock.duration_secs(),
            clock.total_frames(),
        );
    }
    Ok(ExitCode::SUCCESS)
}
