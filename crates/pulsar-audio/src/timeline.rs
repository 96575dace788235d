//! Timeline sidecar: the sample-accurate schedule the visual renderer
//! consumes instead of re-deriving beats from audio.

use serde::{Deserialize, Serialize};

use crate::clock::{MusicClock, SAMPLE_RATE, STEPS_PER_SEGMENT};
use crate::error::{AudioError, AudioResult};
use crate::events::{EventKind, EventQueue};

/// One sidecar event: sample timestamp, voice kind, payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub t: u64,
    pub kind: EventKind,
    pub aux: i32,
}

/// The sidecar record. Field order is the serialized order and part of the
/// schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    /// Seed as a `0x`-prefixed 8-digit hex string.
    pub seed: String,
    pub sample_rate: u32,
    pub bpm: f64,
    pub step_samples: u32,
    pub total_samples: u64,
    /// Sample index of each of the 32 steps.
    pub steps: Vec<u64>,
    /// Sample index of every 4th step (8 entries).
    pub beats: Vec<u64>,
    pub events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Builds the sidecar for a seed from the same schedule the generator
    /// plays.
    pub fn from_seed(seed: u32) -> Self {
        let clock = MusicClock::from_seed(seed);
        let queue = EventQueue::build(&clock);
        let step = u64::from(clock.step_samples);
        Self {
            seed: format!("0x{seed:08x}"),
            sample_rate: SAMPLE_RATE,
            bpm: clock.bpm,
            step_samples: clock.step_samples,
            total_samples: clock.total_samples,
            steps: (0..u64::from(STEPS_PER_SEGMENT)).map(|s| s * step).collect(),
            beats: (0..u64::from(STEPS_PER_SEGMENT))
                .step_by(4)
                .map(|s| s * step)
                .collect(),
            events: queue
                .events()
                .iter()
                .map(|e| TimelineEvent {
                    t: e.time,
                    kind: e.kind,
                    aux: e.aux,
                })
                .collect(),
        }
    }

    /// The numeric seed parsed back from the `seed` field.
    pub fn seed_value(&self) -> AudioResult<u32> {
        let digits = self
            .seed
            .strip_prefix("0x")
            .ok_or_else(|| AudioError::invalid_param("timeline.seed", "missing 0x prefix"))?;
        u32::from_str_radix(digits, 16)
            .map_err(|e| AudioError::invalid_param("timeline.seed", e.to_string()))
    }

    /// Serializes the sidecar. Output is byte-stable for a given seed.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(self).expect("timeline serialization cannot fail")
    }

    /// Parses a sidecar produced by [`Timeline::to_json_string`].
    pub fn from_json_str(json: &str) -> AudioResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AudioError::invalid_param("timeline", e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_counts() {
        let t = Timeline::from_seed(0xCAFEBABE);
        assert_eq!(t.steps.len(), 32);
        assert_eq!(t.beats.len(), 8);
        assert_eq!(t.sample_rate, 44_100);
        assert_eq!(t.seed, "0xcafebabe");
    }

    #[test]
    fn events_sorted_and_inside_segment() {
        let t = Timeline::from_seed(0x12345678);
        for pair in t.events.windows(2) {
            assert!(pair[0].t <= pair[1].t);
        }
        for e in &t.events {
            assert!(e.t < t.total_samples);
        }
    }

    #[test]
    fn reexport_is_byte_identical() {
        let a = Timeline::from_seed(0xDEADBEEF).to_json_string();
        let b = Timeline::from_seed(0xDEADBEEF).to_json_string();
        assert_eq!(a, b);
    }

    #[test]
    fn json_roundtrip() {
        let t = Timeline::from_seed(99);
        let parsed = Timeline::from_json_str(&t.to_json_string()).unwrap();
        assert_eq!(t, parsed);
        assert_eq!(parsed.seed_value().unwrap(), 99);
    }

    #[test]
    fn schema_field_names() {
        let t = Timeline::from_seed(1);
        let value: serde_json::Value = serde_json::from_str(&t.to_json_string()).unwrap();
        for key in [
            "seed",
            "sample_rate",
            "bpm",
            "step_samples",
            "total_samples",
            "steps",
            "beats",
            "events",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        let first = &value["events"][0];
        assert!(first.get("t").is_some());
        assert!(first.get("kind").is_some());
        assert!(first.get("aux").is_some());
    }

    #[test]
    fn beats_are_every_fourth_step() {
        let t = Timeline::from_seed(0);
        for (i, &b) in t.beats.iter().enumerate() {
            assert_eq!(b, t.steps[i * 4]);
        }
    }
}
