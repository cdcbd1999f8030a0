use core::slice;

use crate::prelude::*;

/// A value placed in wall-clock time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timed<T> {
    /// Time from the start of the file
    pub start: UMicros,
    /// How long the value lasts
    pub duration: UMicros,
    /// The value
    pub event: T,
}

impl<T> Timed<T> {
    /// Create a new timed value
    pub const fn new(start: UMicros, duration: UMicros, event: T) -> Self {
        Self {
            start,
            duration,
            event,
        }
    }

    /// When the value ends
    pub fn end(&self) -> UMicros {
        self.start + self.duration
    }
}

/// An iterator returned from [`MidiFile::timed_notes`].
///
/// Notes come in the same order as [`Track::notes`].
#[derive(Debug, Clone)]
pub struct TimedNotes<'a> {
    tempo: Tempo,
    ticks_per_quarter_note: u16,
    notes: slice::Iter<'a, Note>,
}

impl<'a> TimedNotes<'a> {
    pub(super) fn new(track: &'a Track, tempo: Tempo, ticks_per_quarter_note: u16) -> Self {
        Self {
            tempo,
            ticks_per_quarter_note,
            notes: track.notes().iter(),
        }
    }

    fn to_micros(&self, ticks: u64) -> UMicros {
        ticks_to_micros(ticks, self.tempo, self.ticks_per_quarter_note)
    }
}

/// µs = ticks × tempo / TPQN, saturating at `u64::MAX`
pub(super) fn ticks_to_micros(ticks: u64, tempo: Tempo, ticks_per_quarter_note: u16) -> UMicros {
    let micros = ticks as u128 * tempo.micros_per_quarter_note() as u128
        / ticks_per_quarter_note.max(1) as u128;
    UMicros::new(u64::try_from(micros).unwrap_or(u64::MAX))
}

impl Iterator for TimedNotes<'_> {
    type Item = Timed<Note>;
    fn next(&mut self) -> Option<Self::Item> {
        let note = *self.notes.next()?;
        let start = self.to_micros(note.start());
        let end = self.to_micros(note.end());
        Some(Timed::new(start, end.saturating_sub(start), note))
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.notes.size_hint()
    }
}

impl ExactSizeIterator for TimedNotes<'_> {}

impl MidiFile {
    /// The notes of the track at `track_index`, placed in wall-clock time.
    ///
    /// `None` if there is no such track or the file does not count in ticks per
    /// quarter note.
    pub fn timed_notes(&self, track_index: usize) -> Option<TimedNotes<'_>> {
        let tpqn = self.time_division().filter(|t| *t > 0)?;
        let track = self.tracks().get(track_index)?;
        Some(TimedNotes::new(track, self.tempo_or_default(), tpqn))
    }
}

#[cfg(test)]
fn note(key: u8, start: u64, duration: u64) -> Note {
    Note::new(
        Pitch::new(key).unwrap(),
        Velocity::new(100).unwrap(),
        start,
        duration,
    )
}

#[test]
fn notes_at_default_tempo() {
    use pretty_assertions::assert_eq;

    let track = Track::default();
    let mut notes = TimedNotes::new(&track, Tempo::DEFAULT, 480);
    assert_eq!(notes.next(), None);

    let mut track = Track::default();
    track.push_note(note(60, 0, 480));
    track.push_note(note(62, 720, 240));
    let timed: alloc::vec::Vec<_> = TimedNotes::new(&track, Tempo::DEFAULT, 480).collect();
    assert_eq!(
        timed,
        alloc::vec![
            Timed::new(UMicros::new(0), UMicros::new(500_000), note(60, 0, 480)),
            Timed::new(UMicros::new(750_000), UMicros::new(250_000), note(62, 720, 240)),
        ]
    );
    assert_eq!(timed[1].end(), UMicros::new(1_000_000));
}

#[test]
fn slower_tempo_stretches_notes() {
    let mut track = Track::default();
    track.push_note(note(48, 960, 960));
    let timed = TimedNotes::new(&track, Tempo::new(1_000_000), 960).next().unwrap();
    assert_eq!(timed.start, UMicros::new(1_000_000));
    assert_eq!(timed.duration, UMicros::new(1_000_000));
}
