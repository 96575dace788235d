//! Segment generation: event scheduling, voice mixing, effects.
//!
//! The generator walks the segment in blocks of at most 1024 samples, never
//! crossing a sixteenth-note boundary. Events fire at block start (triggers
//! land exactly on step boundaries), voices accumulate into three buses
//! (drums, synths, melody), the delay runs on the configured bus, and the
//! limiter seals the mix.

use crate::clock::{MusicClock, SAMPLE_RATE};
use crate::effects::{DelayRouting, PeakLimiter, TapeDelay};
use crate::error::AudioResult;
use crate::events::{melody_freq, Event, EventKind, EventQueue};
use crate::voice::{FmVoice, Hat, Kick, MelodyVoice, Snare, Voice};
use crate::wav::{self, WavFormat};

/// Upper bound on the processing block length.
const MAX_BLOCK: usize = 1024;

/// Mid FM voice: carrier two octaves over the root degree, bright and short.
const MID_FM_DUR: f64 = 0.16;
const MID_FM_RATIO: f64 = 2.0;
const MID_FM_INDEX: f64 = 2.5;
const MID_FM_AMP: f64 = 0.25;
const MID_FM_DECAY: f64 = 30.0;

/// Bass FM voice: half the root, heavy index, slow decay.
const BASS_FM_DUR: f64 = 1.25;
const BASS_FM_RATIO: f64 = 1.5;
const BASS_FM_INDEX: f64 = 8.0;
const BASS_FM_AMP: f64 = 0.45;
const BASS_FM_DECAY: f64 = 4.0;

/// A rendered stereo segment.
#[derive(Debug, Clone)]
pub struct SegmentResult {
    pub left: Vec<f64>,
    pub right: Vec<f64>,
    /// BLAKE3 hex digest of the 16-bit PCM payload.
    pub pcm_hash: String,
}

impl SegmentResult {
    /// The public artifact: a 16-bit PCM stereo WAV.
    pub fn wav_bytes(&self) -> Vec<u8> {
        let pcm = wav::stereo_to_pcm16(&self.left, &self.right);
        let mut buf = Vec::with_capacity(44 + pcm.len());
        wav::write_wav(&mut buf, &WavFormat::pcm16_stereo(SAMPLE_RATE), &pcm)
            .expect("writing to Vec cannot fail");
        buf
    }

    /// Internal variant: 32-bit float WAV.
    pub fn float_wav_bytes(&self) -> Vec<u8> {
        let pcm = wav::stereo_to_float32(&self.left, &self.right);
        let mut buf = Vec::with_capacity(44 + pcm.len());
        wav::write_wav(&mut buf, &WavFormat::float32_stereo(SAMPLE_RATE), &pcm)
            .expect("writing to Vec cannot fail");
        buf
    }
}

/// One segment's worth of synthesis state.
pub struct Generator {
    clock: MusicClock,
    queue: EventQueue,
    routing: DelayRouting,
    kick: Kick,
    snare: Snare,
    hat: Hat,
    melody: MelodyVoice,
    mid_fm: FmVoice,
    bass_fm: FmVoice,
    delay: TapeDelay,
    limiter: PeakLimiter,
}

impl Generator {
    /// Builds the schedule and initializes every voice. Initializing all six
    /// voices here is mandatory: a voice triggered with a zero sample rate
    /// would compute a zero length and silently corrupt its state.
    pub fn new(seed: u32, routing: DelayRouting) -> AudioResult<Self> {
        let clock = MusicClock::from_seed(seed);
        let queue = EventQueue::build(&clock);
        let delay = TapeDelay::eighth_note(clock.step_samples)?;

        let sr = f64::from(SAMPLE_RATE);
        let mut gen = Self {
            clock,
            queue,
            routing,
            kick: Kick::default(),
            snare: Snare::new(seed),
            hat: Hat::new(seed),
            melody: MelodyVoice::default(),
            mid_fm: FmVoice::default(),
            bass_fm: FmVoice::default(),
            delay,
            limiter: PeakLimiter::new(),
        };
        gen.kick.init(sr);
        gen.snare.init(sr);
        gen.hat.init(sr);
        gen.melody.init(sr);
        gen.mid_fm.init(sr);
        gen.bass_fm.init(sr);
        Ok(gen)
    }

    /// The timing this generator derived from its seed.
    pub fn clock(&self) -> &MusicClock {
        &self.clock
    }

    fn fire(&mut self, event: &Event) {
        let root = self.clock.root_hz;
        let step_secs = f64::from(self.clock.step_samples) / f64::from(SAMPLE_RATE);
        match event.kind {
            EventKind::Kick => self.kick.trigger(f64::from(event.aux) / 100.0),
            EventKind::Snare => self.snare.trigger(f64::from(event.aux) / 100.0),
            EventKind::Hat => self.hat.trigger(f64::from(event.aux) / 100.0),
            EventKind::Melody => {
                self.melody.trigger(melody_freq(root, event.aux), step_secs);
            }
            EventKind::MidFm => self.mid_fm.trigger(
                2.0 * melody_freq(root, event.aux),
                MID_FM_DUR,
                MID_FM_RATIO,
                MID_FM_INDEX,
                MID_FM_AMP,
                MID_FM_DECAY,
            ),
            EventKind::BassFm => self.bass_fm.trigger(
                root / 2.0,
                BASS_FM_DUR,
                BASS_FM_RATIO,
                BASS_FM_INDEX,
                BASS_FM_AMP,
                BASS_FM_DECAY,
            ),
        }
    }

    /// Renders the whole segment: exactly `clock.total_samples` stereo
    /// samples, limiter applied, `|y| <= 1.0`.
    pub fn render_segment(&mut self) -> SegmentResult {
        let total = self.clock.total_samples as usize;
        let step_samples = self.clock.step_samples as usize;

        let mut left = vec![0.0; total];
        let mut right = vec![0.0; total];

        let mut drums_l = vec![0.0; MAX_BLOCK];
        let mut drums_r = vec![0.0; MAX_BLOCK];
        let mut synth_l = vec![0.0; MAX_BLOCK];
        let mut synth_r = vec![0.0; MAX_BLOCK];
        let mut mel_l = vec![0.0; MAX_BLOCK];
        let mut mel_r = vec![0.0; MAX_BLOCK];

        self.queue.rewind();
        let mut pos_in_step = 0usize;
        let mut produced = 0usize;

        while produced < total {
            // Blocks never straddle a step boundary, so every trigger lands
            // exactly on one.
            let block = MAX_BLOCK
                .min(step_samples - pos_in_step)
                .min(total - produced);

            if pos_in_step == 0 {
                let due: Vec<Event> = self.queue.pop_due(produced as u64).to_vec();
                for event in &due {
                    self.fire(event);
                }
            }

            for bus in [
                &mut drums_l,
                &mut drums_r,
                &mut synth_l,
                &mut synth_r,
                &mut mel_l,
                &mut mel_r,
            ] {
                bus[..block].fill(0.0);
            }

            self.kick
                .process(&mut drums_l[..block], &mut drums_r[..block]);
            self.snare
                .process(&mut drums_l[..block], &mut drums_r[..block]);
            self.hat
                .process(&mut drums_l[..block], &mut drums_r[..block]);
            self.melody.process(&mut mel_l[..block], &mut mel_r[..block]);
            self.mid_fm
                .process(&mut synth_l[..block], &mut synth_r[..block]);
            self.bass_fm
                .process(&mut synth_l[..block], &mut synth_r[..block]);

            match self.routing {
                DelayRouting::MelodyOnly => {
                    self.delay
                        .process_block(&mut mel_l[..block], &mut mel_r[..block]);
                }
                DelayRouting::Global => {
                    for i in 0..block {
                        synth_l[i] += mel_l[i];
                        synth_r[i] += mel_r[i];
                        mel_l[i] = 0.0;
                        mel_r[i] = 0.0;
                    }
                    self.delay
                        .process_block(&mut synth_l[..block], &mut synth_r[..block]);
                }
            }

            let out_l = &mut left[produced..produced + block];
            let out_r = &mut right[produced..produced + block];
            for i in 0..block {
                out_l[i] = drums_l[i] + synth_l[i] + mel_l[i];
                out_r[i] = drums_r[i] + synth_r[i] + mel_r[i];
            }
            self.limiter.process_block(out_l, out_r);

            produced += block;
            pos_in_step += block;
            // Strict less-than: the step wraps only once fully consumed.
            if pos_in_step >= step_samples {
                pos_in_step = 0;
            }
        }

        let pcm = wav::stereo_to_pcm16(&left, &right);
        let pcm_hash = blake3::hash(&pcm).to_hex().to_string();
        SegmentResult {
            left,
            right,
            pcm_hash,
        }
    }
}

/// Renders one segment for `seed`. Main entry point.
pub fn generate(seed: u32, routing: DelayRouting) -> AudioResult<SegmentResult> {
    Ok(Generator::new(seed, routing)?.render_segment())
}
