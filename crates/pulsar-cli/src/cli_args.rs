//! CLI argument definitions.
//!
//! All `#[derive(Parser)]` and `#[derive(Subcommand)]` types live here,
//! keeping `main.rs` focused on dispatch.

use clap::{Parser, Subcommand, ValueEnum};

/// Pulsar - deterministic generative audio-visual engine
#[derive(Parser)]
#[command(name = "pulsar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Delay routing choice exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DelayRoutingArg {
    /// Only the melody bus passes through the tape delay.
    Melody,
    /// The whole synth mix passes through the tape delay.
    Global,
}

impl From<DelayRoutingArg> for pulsar_audio::DelayRouting {
    fn from(arg: DelayRoutingArg) -> Self {
        match arg {
            DelayRoutingArg::Melody => pulsar_audio::DelayRouting::MelodyOnly,
            DelayRoutingArg::Global => pulsar_audio::DelayRouting::Global,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render one audio segment to a 16-bit PCM stereo WAV
    GenerateSegment {
        /// Seed as 0x-prefixed hex (long digests are folded to 32 bits)
        seed: String,

        /// Output path (default: seed_<seed>.wav in the current directory)
        out: Option<String>,

        /// Which bus passes through the tape delay
        #[arg(long, value_enum, default_value_t = DelayRoutingArg::Melody)]
        delay_routing: DelayRoutingArg,

        /// Write the internal 32-bit float variant instead of 16-bit PCM
        #[arg(long)]
        float: bool,
    },

    /// Export the timeline sidecar (JSON) for a seed
    ExportTimeline {
        /// Seed as 0x-prefixed hex
        seed: String,

        /// Output path (default: seed_<seed>.json in the current directory)
        out: Option<String>,
    },

    /// Render the frame stream for a previously generated segment
    GenerateFrames {
        /// The segment WAV; `<audio>.json` is used as the sidecar when present
        audio: String,

        /// Seed as 0x-prefixed hex
        seed: String,

        /// Write one concatenated P6 stream to stdout instead of frame files
        #[arg(long)]
        pipe_ppm: bool,

        /// Render only the half-open frame interval [START, END)
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        range: Option<Vec<u64>>,

        /// Stop after at most N frames
        #[arg(long)]
        max_frames: Option<u64>,

        /// Chaos mode: maximum spawn counts and reactivity
        #[arg(long)]
        chaos: bool,
    },

    /// Print the musical parameters a seed derives
    Describe {
        /// Seed as 0x-prefixed hex
        seed: String,

        /// Emit machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}
