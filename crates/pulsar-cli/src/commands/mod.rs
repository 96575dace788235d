//! Subcommand implementations.

pub mod describe;
pub mod export_timeline;
pub mod generate_frames;
pub mod generate_segment;
mod output;

pub(crate) use output::{vlog, write_atomic};
