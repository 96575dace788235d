//! Pulsar audio backend.
//!
//! Turns a 32-bit seed into a deterministic stereo music segment plus a
//! sample-accurate timeline sidecar. The same seed always yields the same
//! PCM bytes on the same target.
//!
//! # Pipeline
//!
//! 1. [`rng`] seeds named LCG streams (music, terrain, ship, ...).
//! 2. [`clock`] derives tempo, root pitch and the 32-step segment length.
//! 3. [`events`] expands fixed rhythm patterns into a sorted event queue.
//! 4. [`voice`] renders kick / snare / hat / melody / two FM voices into
//!    accumulation buses.
//! 5. [`effects`] applies the tape delay and the peak limiter.
//! 6. [`generator`] drives the block loop and emits the segment.
//! 7. [`timeline`] exports the schedule for the visual renderer.
//! 8. [`wav`] reads and writes the RIFF containers.
//!
//! # Example
//!
//! ```
//! use pulsar_audio::{generate, DelayRouting, Timeline};
//!
//! let segment = generate(0xCAFEBABE, DelayRouting::MelodyOnly).unwrap();
//! let sidecar = Timeline::from_seed(0xCAFEBABE);
//! assert_eq!(segment.left.len() as u64, sidecar.total_samples);
//! ```

pub mod clock;
pub mod effects;
pub mod error;
pub mod events;
pub mod fastmath;
pub mod generator;
pub mod rng;
pub mod timeline;
pub mod voice;
pub mod wav;

pub use clock::{MusicClock, FRAME_RATE, SAMPLE_RATE, STEPS_PER_SEGMENT};
pub use effects::DelayRouting;
pub use error::{AudioError, AudioResult};
pub use events::{Event, EventKind, EventQueue};
pub use generator::{generate, Generator, SegmentResult};
pub use rng::{fold_seed_hex, Lcg32};
pub use timeline::{Timeline, TimelineEvent};
