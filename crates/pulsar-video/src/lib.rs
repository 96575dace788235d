//! Pulsar video backend.
//!
//! Renders the audio-reactive 800x600 @ 60 FPS frame stream for a seed.
//! Signals come from the timeline sidecar when available, or from direct
//! WAV analysis as a fallback; either way the pixels are deterministic per
//! seed on a given target.
//!
//! # Pipeline
//!
//! - [`signals`] turns the sidecar (or WAV) into per-frame level / beat /
//!   band / hue values.
//! - [`frame`], [`color`], [`luts`], [`font`] are the drawing primitives.
//! - [`terrain`], [`ship`], [`boss`], [`projectile`], [`particles`],
//!   [`glitch`] are the scene layers, drawn in that order by
//!   [`renderer::FrameRenderer`].
//! - [`ppm`] emits P6 frames to files or a pipe.

pub mod boss;
pub mod color;
pub mod error;
pub mod font;
pub mod frame;
pub mod glitch;
pub mod luts;
pub mod particles;
pub mod ppm;
pub mod projectile;
pub mod renderer;
pub mod ship;
pub mod signals;
pub mod terrain;

pub use error::{VideoError, VideoResult};
pub use frame::{FrameBuffer, HEIGHT, WIDTH};
pub use renderer::{render_range, FrameRenderer, RenderOptions};
pub use signals::{FrameSignals, SignalSource, TimelineSignals, WavSignals, FPS};
