//! Per-frame audio signals: smoothed level, beat flag, band energies, hue.
//!
//! The timeline sidecar is the primary source; when it is absent the
//! renderer falls back to analyzing the WAV directly. The two paths agree
//! structurally (same beats on the same frames) but not pixel-exactly.

use pulsar_audio::{EventKind, Timeline, SAMPLE_RATE};

use crate::error::{VideoError, VideoResult};

/// Frames per second of the video stream.
pub const FPS: u64 = 60;

/// Smoothing factor: `L = 0.8 * prev + 0.2 * raw`.
const SMOOTH_PREV: f64 = 0.8;
const SMOOTH_RAW: f64 = 0.2;

/// What the renderer reads for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSignals {
    /// Smoothed overall level in `[0, 1]`.
    pub level: f64,
    /// True on the frame containing a beat.
    pub beat_now: bool,
    /// Low-band energy in `[0, 1]`.
    pub bass: f64,
    /// High-band energy in `[0, 1]`.
    pub treble: f64,
    /// Base hue for the palette drift, in turns.
    pub hue_base: f64,
}

/// A source of per-frame signals. Frames must be queried sequentially from
/// zero; slice mode fast-forwards by querying and discarding.
pub trait SignalSource {
    /// Signals for frame `frame`; must be called with increasing values.
    fn advance(&mut self, frame: u64) -> FrameSignals;

    /// Total frame count of the underlying audio.
    fn total_frames(&self) -> u64;
}

/// Per-kind excitation weight applied when an event fires.
fn kind_weight(kind: EventKind) -> f64 {
    match kind {
        EventKind::Kick => 1.0,
        EventKind::BassFm => 0.9,
        EventKind::Snare => 0.7,
        EventKind::MidFm => 0.5,
        EventKind::Melody => 0.3,
        EventKind::Hat => 0.2,
    }
}

/// Sidecar-driven signals: events inject per-kind energy that decays
/// exponentially (about a quarter second to the floor).
pub struct TimelineSignals {
    timeline: Timeline,
    seed_hue: f64,
    event_cursor: usize,
    beat_cursor: usize,
    excite: [f64; 6],
    level: f64,
}

/// Per-frame decay of the excitation accumulators.
const EXCITE_DECAY: f64 = 0.935;

impl TimelineSignals {
    pub fn new(timeline: Timeline) -> VideoResult<Self> {
        let seed = timeline.seed_value()?;
        Ok(Self {
            timeline,
            seed_hue: f64::from(seed) / f64::from(u32::MAX),
            event_cursor: 0,
            beat_cursor: 0,
            excite: [0.0; 6],
            level: 0.0,
        })
    }

    fn kind_index(kind: EventKind) -> usize {
        EventKind::ALL.iter().position(|&k| k == kind).unwrap()
    }
}

impl SignalSource for TimelineSignals {
    fn advance(&mut self, frame: u64) -> FrameSignals {
        let win_start = frame * u64::from(SAMPLE_RATE) / FPS;
        let win_end = (frame + 1) * u64::from(SAMPLE_RATE) / FPS;

        for e in &mut self.excite {
            *e *= EXCITE_DECAY;
        }

        let events = &self.timeline.events;
        while self.event_cursor < events.len() && events[self.event_cursor].t < win_end {
            let event = &events[self.event_cursor];
            if event.t >= win_start {
                self.excite[Self::kind_index(event.kind)] += kind_weight(event.kind);
            }
            self.event_cursor += 1;
        }

        let mut beat_now = false;
        let beats = &self.timeline.beats;
        while self.beat_cursor < beats.len() && beats[self.beat_cursor] < win_end {
            if beats[self.beat_cursor] >= win_start {
                beat_now = true;
            }
            self.beat_cursor += 1;
        }

        let raw: f64 = self.excite.iter().sum::<f64>().min(1.0);
        self.level = SMOOTH_PREV * self.level + SMOOTH_RAW * raw;

        let bass = (self.excite[Self::kind_index(EventKind::Kick)]
            + self.excite[Self::kind_index(EventKind::BassFm)])
        .min(1.0);
        let treble = (self.excite[Self::kind_index(EventKind::Hat)]
            + self.excite[Self::kind_index(EventKind::Melody)])
        .min(1.0);

        FrameSignals {
            level: self.level,
            beat_now,
            bass,
            treble,
            hue_base: (self.seed_hue + frame as f64 * 0.0005).fract(),
        }
    }

    fn total_frames(&self) -> u64 {
        self.timeline.total_samples * FPS / u64::from(SAMPLE_RATE)
    }
}

/// WAV-derived fallback: windowed RMS with onset detection.
pub struct WavSignals {
    mono: Vec<f64>,
    sample_rate: u32,
    seed_hue: f64,
    level: f64,
    prev_rms: f64,
    frames_since_beat: u64,
}

/// RMS analysis window length in samples.
const RMS_WINDOW: usize = 1024;
/// Onset threshold: current RMS must exceed the previous frame by 5%.
const ONSET_RATIO: f64 = 1.05;
/// Minimum frames between detected beats.
const BEAT_REFRACTORY: u64 = 3;
/// Low/high band split frequency in Hz.
const BAND_SPLIT_HZ: f64 = 250.0;

impl WavSignals {
    /// Builds the analyzer from mono samples. `seed` only steers the hue.
    pub fn new(mono: Vec<f64>, sample_rate: u32, seed: u32) -> VideoResult<Self> {
        if sample_rate == 0 {
            return Err(VideoError::invalid_param("sample_rate", "must be non-zero"));
        }
        Ok(Self {
            mono,
            sample_rate,
            seed_hue: f64::from(seed) / f64::from(u32::MAX),
            level: 0.0,
            prev_rms: 0.0,
            frames_since_beat: BEAT_REFRACTORY,
        })
    }

    /// Window RMS plus low/high split energies, all in linear amplitude.
    fn analyze_window(&self, center: u64) -> (f64, f64, f64) {
        let half = (RMS_WINDOW / 2) as u64;
        let start = center.saturating_sub(half) as usize;
        let end = (start + RMS_WINDOW).min(self.mono.len());
        if start >= end {
            return (0.0, 0.0, 0.0);
        }
        let window = &self.mono[start..end];

        let alpha = 1.0
            - (-std::f64::consts::TAU * BAND_SPLIT_HZ / f64::from(self.sample_rate)).exp();
        let mut lp = 0.0;
        let mut sum = 0.0;
        let mut low = 0.0;
        let mut high = 0.0;
        for &s in window {
            lp += alpha * (s - lp);
            let hp = s - lp;
            sum += s * s;
            low += lp * lp;
            high += hp * hp;
        }
        let n = window.len() as f64;
        ((sum / n).sqrt(), (low / n).sqrt(), (high / n).sqrt())
    }
}

impl SignalSource for WavSignals {
    fn advance(&mut self, frame: u64) -> FrameSignals {
        let center = frame * u64::from(self.sample_rate) / FPS;
        let (rms, low, high) = self.analyze_window(center);

        self.frames_since_beat += 1;
        let mut beat_now = false;
        if rms > self.prev_rms * ONSET_RATIO
            && rms > 0.01
            && self.frames_since_beat >= BEAT_REFRACTORY
        {
            beat_now = true;
            self.frames_since_beat = 0;
        }
        self.prev_rms = rms;

        // The limiter parks musical peaks well under 1.0; scale RMS so a
        // typical mix reaches the upper level range.
        let raw = (rms * 3.0).min(1.0);
        self.level = SMOOTH_PREV * self.level + SMOOTH_RAW * raw;

        FrameSignals {
            level: self.level,
            beat_now,
            bass: (low * 3.0).min(1.0),
            treble: (high * 3.0).min(1.0),
            hue_base: (self.seed_hue + frame as f64 * 0.0005).fract(),
        }
    }

    fn total_frames(&self) -> u64 {
        self.mono.len() as u64 * FPS / u64::from(self.sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulsar_audio::Timeline;

    #[test]
    fn timeline_frame_count_matches_clock() {
        let t = Timeline::from_seed(0xCAFEBABE);
        let total = t.total_samples;
        let src = TimelineSignals::new(t).unwrap();
        assert_eq!(src.total_frames(), total * 60 / 44_100);
    }

    #[test]
    fn first_frame_reacts_to_step_zero() {
        // Step 0 fires kick + melody + bass: the first frame carries level
        // and a beat (beats[0] == 0).
        let mut src = TimelineSignals::new(Timeline::from_seed(0xCAFEBABE)).unwrap();
        let s = src.advance(0);
        assert!(s.beat_now);
        assert!(s.level > 0.1);
        assert!(s.bass > 0.5);
    }

    #[test]
    fn level_stays_normalized_and_varies() {
        let mut src = TimelineSignals::new(Timeline::from_seed(0xCAFEBABE)).unwrap();
        let total = src.total_frames();
        let levels: Vec<f64> = (0..total).map(|f| src.advance(f).level).collect();
        let min = levels.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = levels.iter().cloned().fold(0.0f64, f64::max);
        assert!(min >= 0.0);
        assert!(max <= 1.0);
        // The smoothed level is musical, not flat.
        assert!(max - min > 0.05);
    }

    #[test]
    fn signals_are_deterministic() {
        let run = || {
            let mut src = TimelineSignals::new(Timeline::from_seed(7)).unwrap();
            (0..50).map(|f| src.advance(f)).collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn silence_yields_no_beats_and_zero_level() {
        let mono = vec![0.0; 44_100];
        let mut src = WavSignals::new(mono, 44_100, 1).unwrap();
        for f in 0..60 {
            let s = src.advance(f);
            assert!(!s.beat_now);
            assert!(s.level == 0.0);
        }
    }

    #[test]
    fn loud_onset_is_detected_once() {
        // Quiet first half second, loud burst after: exactly one onset
        // inside the refractory span.
        let sr = 44_100usize;
        let mut mono = vec![0.0; sr];
        for (i, s) in mono.iter_mut().enumerate().skip(sr / 2) {
            *s = 0.5 * (i as f64 * 0.3).sin();
        }
        let mut src = WavSignals::new(mono, 44_100, 1).unwrap();
        let beats: Vec<u64> = (0..60).filter(|&f| src.advance(f).beat_now).collect();
        assert!(!beats.is_empty());
        // Refractory: no two beats closer than 3 frames.
        for pair in beats.windows(2) {
            assert!(pair[1] - pair[0] >= BEAT_REFRACTORY);
        }
    }

    #[test]
    fn sidecar_and_wav_paths_agree_structurally() {
        // Render the real segment, analyze it, and check the analyzer fires
        // around the sidecar's beat frames (within one frame of slack).
        let seed = 0xCAFEBABE;
        let seg = pulsar_audio::generate(seed, pulsar_audio::DelayRouting::MelodyOnly).unwrap();
        let mono: Vec<f64> = seg
            .left
            .iter()
            .zip(seg.right.iter())
            .map(|(l, r)| (l + r) / 2.0)
            .collect();

        let timeline = Timeline::from_seed(seed);
        let mut sidecar = TimelineSignals::new(timeline).unwrap();
        let total = sidecar.total_frames();

        let mut wav = WavSignals::new(mono, 44_100, seed).unwrap();
        let sidecar_beats: Vec<u64> = (0..total).filter(|&f| sidecar.advance(f).beat_now).collect();
        let wav_beats: Vec<u64> = (0..total).filter(|&f| wav.advance(f).beat_now).collect();

        // Pixel equality is not required of the fallback path, but the beat
        // structure must line up: most sidecar beats see an analyzer onset
        // within two frames.
        assert!(!wav_beats.is_empty());
        let matched = sidecar_beats
            .iter()
            .filter(|b| wav_beats.iter().any(|w| w.abs_diff(**b) <= 2))
            .count();
        assert!(
            matched * 2 >= sidecar_beats.len(),
            "only {matched} of {} sidecar beats matched",
            sidecar_beats.len()
        );
    }
}
