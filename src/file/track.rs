use alloc::{string::String, vec::Vec};

use crate::prelude::*;

/// The key a track's pitch range starts from before any note completes.
pub const NEUTRAL_PITCH: Pitch = Pitch::from_data_byte(DataByte(64));

/// A text meta event kept on a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextKind {
    /// Free text (0x01)
    Text,
    /// Copyright notice (0x02)
    Copyright,
    /// A lyric syllable (0x05)
    Lyric,
    /// A rehearsal mark or section name (0x06)
    Marker,
    /// A cue for something happening outside the music (0x07)
    CuePoint,
    /// Name of the program or patch (0x08)
    ProgramName,
    /// Name of the device the track plays on (0x09)
    DeviceName,
}

/// Text from a meta event, with the absolute tick it occurred at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEvent {
    /// What kind of text this is
    pub kind: TextKind,
    /// Ticks from the start of the track
    pub tick: u64,
    /// The payload, decoded as UTF-8 with invalid sequences replaced
    pub text: String,
}

#[doc = r#"
One track chunk of a MIDI file.

Events appear in the order they were decoded. Notes appear in the order they were
completed, which is the order of their Note-Offs.

The pitch range starts at [`NEUTRAL_PITCH`] for both ends and only widens as notes
complete, so a track whose notes are all above middle range still reports 64 as its
lowest key.
"#]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Track {
    name: Option<String>,
    instrument: Option<String>,
    texts: Vec<TextEvent>,
    min: Pitch,
    max: Pitch,
    events: Vec<TrackEvent>,
    notes: Vec<Note>,
    /// Absolute tick of the last record read, including meta and sysex records
    end_tick: u64,
    interruption: Option<TrackInterruption>,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            name: None,
            instrument: None,
            texts: Vec::new(),
            min: NEUTRAL_PITCH,
            max: NEUTRAL_PITCH,
            events: Vec::new(),
            notes: Vec::new(),
            end_tick: 0,
            interruption: None,
        }
    }
}

impl Track {
    /// Create a track from decoded events and reconstruct its notes
    pub fn new(events: Vec<TrackEvent>) -> Self {
        let end_tick = events.iter().map(|e| e.delta_ticks()).sum();
        let mut track = Self {
            events,
            end_tick,
            ..Self::default()
        };
        track.reconstruct_notes();
        track
    }

    /// The track name (meta 0x03), if the track has one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The instrument name (meta 0x04), if the track has one
    pub fn instrument(&self) -> Option<&str> {
        self.instrument.as_deref()
    }

    /// Text meta events, in decode order
    pub fn texts(&self) -> &[TextEvent] {
        &self.texts
    }

    /// Lowest key among completed notes, or 64 if that is lower
    pub const fn min_key(&self) -> Pitch {
        self.min
    }

    /// Highest key among completed notes, or 64 if that is higher
    pub const fn max_key(&self) -> Pitch {
        self.max
    }

    /// Decoded channel voice events
    pub fn events(&self) -> &[TrackEvent] {
        &self.events
    }

    /// Reconstructed notes
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Why decoding stopped early, if it did
    pub const fn interruption(&self) -> Option<TrackInterruption> {
        self.interruption
    }

    /// Ticks from the start of the track to its last record.
    ///
    /// Delta-times of trailing meta and sysex records, including the end-of-track
    /// event, are counted.
    pub const fn length_ticks(&self) -> u64 {
        self.end_tick
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    pub(crate) fn set_instrument(&mut self, instrument: String) {
        self.instrument = Some(instrument);
    }

    pub(crate) fn push_text(&mut self, text: TextEvent) {
        self.texts.push(text);
    }

    pub(crate) fn push_event(&mut self, event: TrackEvent) {
        self.events.push(event);
    }

    pub(crate) fn set_end_tick(&mut self, tick: u64) {
        self.end_tick = tick;
    }

    pub(crate) fn set_interruption(&mut self, interruption: Option<TrackInterruption>) {
        self.interruption = interruption;
    }

    pub(crate) fn push_note(&mut self, note: Note) {
        let key = note.key();
        if key < self.min {
            self.min = key;
        }
        if key > self.max {
            self.max = key;
        }
        self.notes.push(note);
    }
}
