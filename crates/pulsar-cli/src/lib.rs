//! Pulsar CLI library: input parsing and command implementations.
//!
//! `main.rs` owns argument parsing and dispatch; every subcommand lives in
//! [`commands`] as a `run(...) -> anyhow::Result<ExitCode>` module.

pub mod commands;
pub mod input;
