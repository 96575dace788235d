//! Rhythmic patterns and the per-segment event queue.
//!
//! Each voice kind has a fixed 8-step pattern byte; bit `s % 8` gates step
//! `s`. The queue is built once per segment, sorted by `(time, kind)`, and
//! consumed by absolute sample time only.

use serde::{Deserialize, Serialize};

use crate::clock::{MusicClock, STEPS_PER_SEGMENT};

/// Voice kinds in tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Kick,
    Snare,
    Hat,
    Melody,
    #[serde(rename = "mid")]
    MidFm,
    #[serde(rename = "fm_bass")]
    BassFm,
}

impl EventKind {
    /// All kinds in scheduling (tie-break) order.
    pub const ALL: [EventKind; 6] = [
        EventKind::Kick,
        EventKind::Snare,
        EventKind::Hat,
        EventKind::Melody,
        EventKind::MidFm,
        EventKind::BassFm,
    ];

    /// The fixed default 8-step pattern byte for this kind.
    pub fn pattern(self) -> u8 {
        match self {
            EventKind::Kick => 0x91,
            EventKind::Snare => 0x44,
            EventKind::Hat => 0xAA,
            EventKind::Melody => 0x55,
            EventKind::MidFm => 0x88,
            EventKind::BassFm => 0x11,
        }
    }
}

/// Minor pentatonic semitone offsets; melody degree is indexed by
/// `step % 5`.
pub const PENTATONIC: [i32; 5] = [0, 3, 5, 7, 10];

/// Default velocity payload for the drum voices.
const DRUM_VELOCITY: i32 = 100;

/// A scheduled trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Absolute sample offset within the segment.
    pub time: u64,
    pub kind: EventKind,
    /// Kind-dependent payload: semitone offset for melodic voices,
    /// velocity for drums.
    pub aux: i32,
}

/// Time-ordered schedule of one segment's triggers.
#[derive(Debug, Clone)]
pub struct EventQueue {
    events: Vec<Event>,
    cursor: usize,
}

impl EventQueue {
    /// Builds the full schedule for a segment. Every step whose pattern bit
    /// is set produces one event at the step boundary.
    pub fn build(clock: &MusicClock) -> Self {
        let mut events = Vec::new();
        for step in 0..STEPS_PER_SEGMENT {
            let time = u64::from(step) * u64::from(clock.step_samples);
            for kind in EventKind::ALL {
                if kind.pattern() >> (step % 8) & 1 == 1 {
                    let aux = match kind {
                        EventKind::Melody | EventKind::MidFm => {
                            PENTATONIC[(step % 5) as usize]
                        }
                        EventKind::BassFm => 0,
                        _ => DRUM_VELOCITY,
                    };
                    events.push(Event { time, kind, aux });
                }
            }
        }
        events.sort_by_key(|e| (e.time, e.kind));
        Self { events, cursor: 0 }
    }

    /// Pops every event with `time <= now`, in order.
    pub fn pop_due(&mut self, now: u64) -> &[Event] {
        let start = self.cursor;
        while self.cursor < self.events.len() && self.events[self.cursor].time <= now {
            self.cursor += 1;
        }
        &self.events[start..self.cursor]
    }

    /// All events, ordered. Used by the timeline exporter.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Rewinds the consumption cursor to the start of the segment.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

/// Melody note frequency for a semitone offset: one octave above the root.
pub fn melody_freq(root_hz: f64, semitones: i32) -> f64 {
    root_hz * 2.0 * (f64::from(semitones) / 12.0).exp2()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue_for(seed: u32) -> (MusicClock, EventQueue) {
        let clock = MusicClock::from_seed(seed);
        let queue = EventQueue::build(&clock);
        (clock, queue)
    }

    #[test]
    fn kick_fires_on_steps_0_4_7() {
        let (_, q) = queue_for(0xCAFEBABE);
        let steps: Vec<u64> = q
            .events()
            .iter()
            .filter(|e| e.kind == EventKind::Kick)
            .map(|e| e.time)
            .collect();
        let clock = MusicClock::from_seed(0xCAFEBABE);
        let expected: Vec<u64> = (0..32u64)
            .filter(|s| [0, 4, 7].contains(&(s % 8)))
            .map(|s| s * u64::from(clock.step_samples))
            .collect();
        assert_eq!(steps, expected);
    }

    #[test]
    fn mid_fm_fires_exactly_eight_times() {
        let (clock, q) = queue_for(0xDEADBEEF);
        let steps: Vec<u64> = q
            .events()
            .iter()
            .filter(|e| e.kind == EventKind::MidFm)
            .map(|e| e.time / u64::from(clock.step_samples))
            .collect();
        assert_eq!(steps, vec![3, 7, 11, 15, 19, 23, 27, 31]);
    }

    #[test]
    fn events_sorted_with_kind_tiebreak() {
        let (_, q) = queue_for(42);
        for pair in q.events().windows(2) {
            assert!(
                pair[0].time < pair[1].time
                    || (pair[0].time == pair[1].time && pair[0].kind <= pair[1].kind)
            );
        }
    }

    #[test]
    fn all_events_inside_segment() {
        let (clock, q) = queue_for(0x12345678);
        for e in q.events() {
            assert!(e.time < clock.total_samples);
        }
    }

    #[test]
    fn pop_due_returns_events_in_order() {
        let (clock, mut q) = queue_for(7);
        let step = u64::from(clock.step_samples);
        let first = q.pop_due(0);
        // Step 0: kick (bit 0 of 0x91), melody (0x55), bass (0x11).
        let kinds: Vec<EventKind> = first.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EventKind::Kick, EventKind::Melody, EventKind::BassFm]
        );
        // Nothing more until the next step boundary.
        assert!(q.pop_due(step - 1).is_empty());
        assert!(!q.pop_due(step).is_empty());
    }

    #[test]
    fn serde_kind_names_match_schema() {
        assert_eq!(serde_json::to_string(&EventKind::MidFm).unwrap(), "\"mid\"");
        assert_eq!(
            serde_json::to_string(&EventKind::BassFm).unwrap(),
            "\"fm_bass\""
        );
        assert_eq!(serde_json::to_string(&EventKind::Kick).unwrap(), "\"kick\"");
    }

    #[test]
    fn melody_freq_is_octave_up_pentatonic() {
        let f0 = melody_freq(110.0, 0);
        assert!((f0 - 220.0).abs() < 1e-9);
        let f3 = melody_freq(110.0, 3);
        assert!((f3 - 220.0 * 2.0_f64.powf(0.25)).abs() < 1e-9);
    }
}
