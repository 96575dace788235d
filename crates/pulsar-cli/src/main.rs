//! Pulsar CLI - deterministic generative audio-visual engine.
//!
//! Dispatch only; argument types live in `cli_args`, command bodies in the
//! library crate's `commands` modules.

mod cli_args;

use std::process::ExitCode;

use clap::Parser;
use cli_args::*;

use pulsar_cli::commands;
use pulsar_cli::commands::generate_frames::FrameArgs;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::GenerateSegment {
            seed,
            out,
            delay_routing,
            float,
        } => commands::generate_segment::run(&seed, out.as_deref(), delay_routing.into(), float),
        Commands::ExportTimeline { seed, out } => {
            commands::export_timeline::run(&seed, out.as_deref())
        }
        Commands::GenerateFrames {
            audio,
            seed,
            pipe_ppm,
            range,
            max_frames,
            chaos,
        } => {
            let range = range.map(|r| (r[0], r[1]));
            commands::generate_frames::run(
                &audio,
                &seed,
                &FrameArgs {
                    pipe_ppm,
                    range,
                    max_frames,
                    chaos,
                },
            )
        }
        Commands::Describe { seed, json } => commands::describe::run(&seed, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {e:#}", colored::Colorize::red("error"));
            ExitCode::from(1)
        }
    }
}
