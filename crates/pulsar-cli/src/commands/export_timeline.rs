//! `pulsar export-timeline`

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use pulsar_audio::Timeline;

use super::{vlog, write_atomic};
use crate::input::parse_seed;

pub fn run(seed_arg: &str, out: Option<&str>) -> Result<ExitCode> {
    let seed = parse_seed(seed_arg)?;
    let default_name = format!("seed_0x{seed:08x}.json");
    let out_path = out.unwrap_or(&default_name);

    let timeline = Timeline::from_seed(seed);
    let json = timeline.to_json_string();
    write_atomic(Path::new(out_path), json.as_bytes())
        .with_context(|| format!("writing {out_path}"))?;

    vlog(&format!(
        "wrote {out_path} ({} events, {} samples)",
        timeline.events.len(),
        timeline.total_samples
    ));
    Ok(ExitCode::SUCCESS)
}
