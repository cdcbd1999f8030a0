#![doc = r#"
Pairs Note-On and Note-Off events into [`Note`]s.

Overlapping Note-Ons of the same key close in the order they started: a Note-Off
closes the earliest Note-On of its key that is still open. A Note-Off with nothing to
close is ignored, and Note-Ons still open when the track ends never become notes.
"#]

use alloc::vec::Vec;

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNote {
    key: Pitch,
    velocity: Velocity,
    start: u64,
}

/// Walks a track's events in order, producing a [`Note`] each time one is closed.
///
/// # Example
/// ```rust
/// # use midisheet::prelude::*;
/// let key = Pitch::new(60).unwrap();
/// let velocity = Velocity::new(100).unwrap();
///
/// let mut notes = NoteReconstructor::default();
/// assert_eq!(notes.push(&TrackEvent::new(0, EventKind::NoteOn { key, velocity })), None);
///
/// let off = TrackEvent::new(480, EventKind::NoteOff { key, velocity: Velocity::new(0).unwrap() });
/// assert_eq!(notes.push(&off), Some(Note::new(key, velocity, 0, 480)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NoteReconstructor {
    now: u64,
    open: Vec<OpenNote>,
}

impl NoteReconstructor {
    /// Advance by the event's delta and apply it
    pub fn push(&mut self, event: &TrackEvent) -> Option<Note> {
        self.now += event.delta_ticks();
        match *event.kind() {
            EventKind::NoteOn { key, velocity } => {
                self.open.push(OpenNote {
                    key,
                    velocity,
                    start: self.now,
                });
                None
            }
            EventKind::NoteOff { key, .. } => {
                let index = self.open.iter().position(|n| n.key == key)?;
                let open = self.open.remove(index);
                Some(Note::new(
                    open.key,
                    open.velocity,
                    open.start,
                    self.now - open.start,
                ))
            }
            EventKind::Other(_) => None,
        }
    }

    /// Absolute tick of the last event pushed
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Number of Note-Ons that have not been closed
    pub fn open_notes(&self) -> usize {
        self.open.len()
    }
}

impl Track {
    /// Rebuild the note list from the track's events.
    pub(crate) fn reconstruct_notes(&mut self) {
        let mut reconstructor = NoteReconstructor::default();
        let mut notes = Vec::new();
        for event in self.events() {
            if let Some(note) = reconstructor.push(event) {
                notes.push(note);
            }
        }
        if reconstructor.open_notes() > 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                "{} notes were never released and have been dropped",
                reconstructor.open_notes()
            );
        }
        for note in notes {
            self.push_note(note);
        }
    }
}

#[cfg(test)]
fn on(delta: u64, key: u8, velocity: u8) -> TrackEvent {
    TrackEvent::new(
        delta,
        EventKind::NoteOn {
            key: Pitch::new(key).unwrap(),
            velocity: Velocity::new(velocity).unwrap(),
        },
    )
}

#[cfg(test)]
fn off(delta: u64, key: u8) -> TrackEvent {
    TrackEvent::new(
        delta,
        EventKind::NoteOff {
            key: Pitch::new(key).unwrap(),
            velocity: Velocity::new(0).unwrap(),
        },
    )
}

#[cfg(test)]
fn note(key: u8, velocity: u8, start: u64, duration: u64) -> Note {
    Note::new(
        Pitch::new(key).unwrap(),
        Velocity::new(velocity).unwrap(),
        start,
        duration,
    )
}

#[test]
fn single_note() {
    use pretty_assertions::assert_eq;

    let track = Track::new(alloc::vec![on(0, 60, 100), off(480, 60)]);
    assert_eq!(track.notes(), &[note(60, 100, 0, 480)]);
}

#[test]
fn overlapping_same_key_closes_first_in_first_out() {
    use pretty_assertions::assert_eq;

    let track = Track::new(alloc::vec![
        on(0, 60, 90),
        on(5, 60, 80),
        off(3, 60),
        off(4, 60),
    ]);
    assert_eq!(
        track.notes(),
        &[note(60, 90, 0, 8), note(60, 80, 5, 7)]
    );
}

#[test]
fn unmatched_note_off_is_ignored() {
    let track = Track::new(alloc::vec![off(10, 61), on(0, 60, 100), off(10, 60)]);
    assert_eq!(track.notes(), &[note(60, 100, 10, 10)]);
}

#[test]
fn unreleased_notes_are_dropped() {
    let mut notes = NoteReconstructor::default();
    notes.push(&on(0, 60, 100));
    notes.push(&on(0, 64, 100));
    assert_eq!(notes.push(&off(96, 64)), Some(note(64, 100, 0, 96)));
    assert_eq!(notes.open_notes(), 1);

    let track = Track::new(alloc::vec![on(0, 60, 100), on(0, 64, 100), off(96, 64)]);
    assert_eq!(track.notes().len(), 1);
}

#[test]
fn other_events_advance_time() {
    let track = Track::new(alloc::vec![
        on(0, 60, 100),
        TrackEvent::new(100, EventKind::Other(VoiceKind::ControlChange)),
        off(20, 60),
    ]);
    assert_eq!(track.notes(), &[note(60, 100, 0, 120)]);
}

#[test]
fn pitch_range_widens_from_neutral() {
    let track = Track::new(alloc::vec![on(0, 60, 1), off(1, 60), on(0, 72, 1), off(1, 72)]);
    assert_eq!(track.min_key().byte(), 60);
    assert_eq!(track.max_key().byte(), 72);

    let track = Track::new(alloc::vec![on(0, 70, 1), off(1, 70)]);
    assert_eq!(track.min_key(), NEUTRAL_PITCH);
    assert_eq!(track.max_key().byte(), 70);

    let empty = Track::new(alloc::vec![]);
    assert_eq!(empty.min_key(), NEUTRAL_PITCH);
    assert_eq!(empty.max_key(), NEUTRAL_PITCH);
}

#[test]
fn notes_complete_in_note_off_order() {
    let track = Track::new(alloc::vec![
        on(0, 60, 1),
        on(0, 64, 1),
        off(10, 64),
        off(10, 60),
    ]);
    let keys: alloc::vec::Vec<u8> = track.notes().iter().map(|n| n.key().byte()).collect();
    assert_eq!(keys, alloc::vec![64, 60]);
}
