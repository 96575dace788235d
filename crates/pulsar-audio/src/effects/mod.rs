//! Block-streaming effects: tape delay and peak limiter.

mod delay;
mod limiter;

pub use delay::{DelayRouting, TapeDelay};
pub use limiter::PeakLimiter;
