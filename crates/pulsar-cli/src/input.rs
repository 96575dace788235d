//! Seed input parsing.
//!
//! Seeds arrive as `0x`-prefixed hex of 1 to 64 digits. Longer digests
//! (transaction hashes) are folded to 32 bits by XOR of their 8-digit words,
//! so a 256-bit hash deterministically selects the same segment as its
//! folded seed would directly.

use anyhow::{bail, Result};
use pulsar_audio::fold_seed_hex;

/// Parses a seed argument into the 32-bit seed space.
pub fn parse_seed(input: &str) -> Result<u32> {
    let digits = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X"));
    let Some(digits) = digits else {
        bail!("invalid seed '{input}': expected a 0x-prefixed hex string");
    };
    match fold_seed_hex(digits) {
        Some(seed) => Ok(seed),
        None => bail!(
            "invalid seed '{input}': expected 1-64 hex digits after the 0x prefix"
        ),
    }
}
