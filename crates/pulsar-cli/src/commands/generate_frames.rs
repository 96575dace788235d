//! `pulsar generate-frames`

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use pulsar_audio::{wav, Timeline};
use pulsar_video::ppm::{frame_filename, write_ppm};
use pulsar_video::{
    render_range, FrameRenderer, RenderOptions, SignalSource, TimelineSignals, WavSignals,
};

use super::vlog;
use crate::input::parse_seed;

/// Options beyond the positional arguments.
pub struct FrameArgs {
    pub pipe_ppm: bool,
    pub range: Option<(u64, u64)>,
    pub max_frames: Option<u64>,
    pub chaos: bool,
}

enum Source {
    Sidecar(Box<TimelineSignals>),
    Analyzer(Box<WavSignals>),
}

impl SignalSource for Source {
    fn advance(&mut self, frame: u64) -> pulsar_video::FrameSignals {
        match self {
            Source::Sidecar(s) => s.advance(frame),
            Source::Analyzer(s) => s.advance(frame),
        }
    }

    fn total_frames(&self) -> u64 {
        match self {
            Source::Sidecar(s) => s.total_frames(),
            Source::Analyzer(s) => s.total_frames(),
        }
    }
}

pub fn run(audio: &str, seed_arg: &str, args: &FrameArgs) -> Result<ExitCode> {
    let seed = parse_seed(seed_arg)?;

    let audio_path = Path::new(audio);
    if !audio_path.exists() {
        bail!("audio file not found: {audio}");
    }

    // Sidecar first, WAV analysis as the fallback.
    let sidecar_path = format!("{audio}.json");
    let (mut source, timeline) = if Path::new(&sidecar_path).exists() {
        vlog(&format!("using sidecar {sidecar_path}"));
        let json = fs::read_to_string(&sidecar_path)
            .with_context(|| format!("reading {sidecar_path}"))?;
        let timeline = Timeline::from_json_str(&json)?;
        (
            Source::Sidecar(Box::new(TimelineSignals::new(timeline.clone())?)),
            Some(timeline),
        )
    } else {
        vlog("no sidecar found, analyzing WAV");
        let bytes = fs::read(audio_path).with_context(|| format!("reading {audio}"))?;
        let data = wav::read_wav(&bytes)?;
        let sample_rate = data.format.sample_rate;
        (
            Source::Analyzer(Box::new(WavSignals::new(data.to_mono(), sample_rate, seed)?)),
            None,
        )
    };

    let total = source.total_frames();
    let (start, end) = match args.range {
        Some((start, end)) => {
            if start >= total {
                return Err(pulsar_video::VideoError::RangeOutOfBounds { start, total }.into());
            }
            (start, end.min(total))
        }
        None => (0, total),
    };
    let end = match args.max_frames {
        Some(max) => end.min(start + max),
        None => end,
    };

    let mut renderer = FrameRenderer::new(seed, RenderOptions { chaos: args.chaos });
    if let Some(timeline) = &timeline {
        renderer.load_saw_steps(timeline);
    } else {
        // Analyzer path: derive the saw-step marks from the seed's own
        // schedule; structurally identical to the sidecar's.
        renderer.load_saw_steps(&Timeline::from_seed(seed));
    }

    vlog(&format!("rendering frames [{start}, {end}) of {total}"));

    let mut emitted = 0u64;
    if args.pipe_ppm {
        let stdout = std::io::stdout();
        let mut pipe = BufWriter::new(stdout.lock());
        render_range(&mut renderer, &mut source, start, end, |_, fb| {
            emitted += 1;
            write_ppm(fb, &mut pipe)
        })?;
        pipe.flush()?;
    } else {
        render_range(&mut renderer, &mut source, start, end, |frame, fb| {
            emitted += 1;
            if emitted % 60 == 0 {
                vlog(&format!("frame {frame}"));
            }
            let file = fs::File::create(frame_filename(frame))?;
            let mut writer = BufWriter::new(file);
            write_ppm(fb, &mut writer)?;
            writer.flush()
        })?;
    }

    vlog(&format!("emitted {emitted} frames"));
    Ok(ExitCode::SUCCESS)
}
