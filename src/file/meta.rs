#![doc = r#"
Meta events: `0xFF`, a type byte, a variable length quantity and that many payload
bytes.

The decoder always consumes exactly the declared payload before handing it over here,
so a meta type that is unknown, or whose payload is shorter or longer than expected,
never moves the stream out of step.
"#]

use alloc::string::String;
use num_enum::FromPrimitive;

use crate::prelude::*;

/// The meta event types a track can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum MetaType {
    /// Sequence number (2 bytes)
    SequenceNumber = 0x00,
    /// Free text
    Text = 0x01,
    /// Copyright notice
    Copyright = 0x02,
    /// Sequence or track name
    TrackName = 0x03,
    /// Instrument name
    InstrumentName = 0x04,
    /// Lyric
    Lyric = 0x05,
    /// Marker
    Marker = 0x06,
    /// Cue point
    CuePoint = 0x07,
    /// Program name
    ProgramName = 0x08,
    /// Device name
    DeviceName = 0x09,
    /// MIDI channel prefix (1 byte)
    ChannelPrefix = 0x20,
    /// MIDI port (1 byte)
    MidiPort = 0x21,
    /// End of track (0 bytes)
    EndOfTrack = 0x2F,
    /// Tempo in microseconds per quarter note (3 bytes)
    SetTempo = 0x51,
    /// SMPTE offset (5 bytes)
    SmpteOffset = 0x54,
    /// Time signature (4 bytes)
    TimeSignature = 0x58,
    /// Key signature (2 bytes)
    KeySignature = 0x59,
    /// Sequencer specific data
    SequencerSpecific = 0x7F,
    /// A type this crate does not know
    #[num_enum(catch_all)]
    Unknown(u8),
}

impl MetaType {
    const fn text_kind(&self) -> Option<TextKind> {
        Some(match self {
            Self::Text => TextKind::Text,
            Self::Copyright => TextKind::Copyright,
            Self::Lyric => TextKind::Lyric,
            Self::Marker => TextKind::Marker,
            Self::CuePoint => TextKind::CuePoint,
            Self::ProgramName => TextKind::ProgramName,
            Self::DeviceName => TextKind::DeviceName,
            _ => return None,
        })
    }
}

#[doc = r#"
Tempo, as microseconds per quarter note.

# Example
```rust
# use midisheet::prelude::*;
let tempo = Tempo::from_bytes([0x07, 0xA1, 0x20]);
assert_eq!(tempo.micros_per_quarter_note(), 500_000);
assert_eq!(tempo.bpm(), Some(120));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Tempo {
    /// 120 beats per minute, the tempo a file has until it sets one
    pub const DEFAULT: Tempo = Tempo(500_000);

    /// Create a tempo from microseconds per quarter note
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Read the three big-endian bytes of a set tempo payload
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self((bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32)
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// Whole beats per minute, rounded down. `None` for a zero tempo.
    pub const fn bpm(&self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        Some(60_000_000 / self.0)
    }
}

/// What the decoder should do after a meta event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MetaOutcome {
    Continue,
    EndOfTrack,
}

/// State a meta event can update
pub(crate) struct MetaTarget<'a> {
    pub track: &'a mut Track,
    pub tempo: &'a mut Option<Tempo>,
    /// Absolute tick of the meta event
    pub tick: u64,
}

fn text(payload: &[u8]) -> String {
    String::from_utf8_lossy(payload).into_owned()
}

/// Apply a meta event whose payload has already been consumed from the stream.
pub(crate) fn dispatch(meta_type: MetaType, payload: &[u8], target: MetaTarget<'_>) -> MetaOutcome {
    match meta_type {
        MetaType::TrackName => target.track.set_name(text(payload)),
        MetaType::InstrumentName => target.track.set_instrument(text(payload)),
        MetaType::SetTempo => match <[u8; 3]>::try_from(payload) {
            Ok(bytes) => {
                let tempo = Tempo::from_bytes(bytes);
                match *target.tempo {
                    None => {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(
                            "Tempo {} (bpm {:?}) at tick {}",
                            tempo.micros_per_quarter_note(),
                            tempo.bpm(),
                            target.tick
                        );
                        *target.tempo = Some(tempo);
                    }
                    Some(_current) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!(
                            "Ignoring tempo {} at tick {}, keeping the first tempo {}",
                            tempo.micros_per_quarter_note(),
                            target.tick,
                            _current.micros_per_quarter_note()
                        );
                    }
                }
            }
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    "Set tempo payload must be 3 bytes, found {}; skipped",
                    payload.len()
                );
            }
        },
        MetaType::EndOfTrack => return MetaOutcome::EndOfTrack,
        MetaType::Unknown(_byte) => {
            #[cfg(feature = "tracing")]
            tracing::trace!(
                "Skipped unknown meta type {:#04X} ({} bytes)",
                _byte,
                payload.len()
            );
        }
        other => match other.text_kind() {
            Some(kind) => target.track.push_text(TextEvent {
                kind,
                tick: target.tick,
                text: text(payload),
            }),
            None => {
                #[cfg(feature = "tracing")]
                tracing::trace!("Skipped meta event {:?} ({} bytes)", other, payload.len());
            }
        },
    }
    MetaOutcome::Continue
}

#[cfg(test)]
fn apply(meta_type: u8, payload: &[u8], track: &mut Track, tempo: &mut Option<Tempo>) -> MetaOutcome {
    dispatch(
        MetaType::from(meta_type),
        payload,
        MetaTarget {
            track,
            tempo,
            tick: 0,
        },
    )
}

#[test]
fn meta_type_catch_all() {
    assert_eq!(MetaType::from(0x51), MetaType::SetTempo);
    assert_eq!(MetaType::from(0x2F), MetaType::EndOfTrack);
    assert_eq!(MetaType::from(0x60), MetaType::Unknown(0x60));
}

#[test]
fn names_overwrite() {
    let mut track = Track::default();
    let mut tempo = None;
    apply(0x03, b"Piano", &mut track, &mut tempo);
    apply(0x03, b"Right hand", &mut track, &mut tempo);
    apply(0x04, b"Grand Piano", &mut track, &mut tempo);
    assert_eq!(track.name(), Some("Right hand"));
    assert_eq!(track.instrument(), Some("Grand Piano"));
}

#[test]
fn first_tempo_wins() {
    let mut track = Track::default();
    let mut tempo = None;
    apply(0x51, &[0x07, 0xA1, 0x20], &mut track, &mut tempo);
    apply(0x51, &[0x0F, 0x42, 0x40], &mut track, &mut tempo);
    assert_eq!(tempo, Some(Tempo::new(500_000)));
    assert_eq!(tempo.and_then(|t| t.bpm()), Some(120));
}

#[test]
fn malformed_tempo_is_ignored() {
    let mut track = Track::default();
    let mut tempo = None;
    apply(0x51, &[0x07, 0xA1], &mut track, &mut tempo);
    assert_eq!(tempo, None);
}

#[test]
fn end_of_track_stops() {
    let mut track = Track::default();
    let mut tempo = None;
    assert_eq!(apply(0x2F, &[], &mut track, &mut tempo), MetaOutcome::EndOfTrack);
    assert_eq!(apply(0x58, &[4, 2, 24, 8], &mut track, &mut tempo), MetaOutcome::Continue);
    assert_eq!(apply(0x60, &[1, 2, 3], &mut track, &mut tempo), MetaOutcome::Continue);
    assert_eq!(track, Track::default());
}

#[test]
fn text_events_are_kept() {
    let mut track = Track::default();
    let mut tempo = None;
    apply(0x05, b"la", &mut track, &mut tempo);
    apply(0x06, &[0x56, 0xFF, 0x72], &mut track, &mut tempo);
    assert_eq!(track.texts()[0].kind, TextKind::Lyric);
    assert_eq!(track.texts()[0].text, "la");
    assert_eq!(track.texts()[1].kind, TextKind::Marker);
    assert_eq!(track.texts()[1].text, "V\u{FFFD}r");
}

#[test]
fn zero_tempo_has_no_bpm() {
    assert_eq!(Tempo::new(0).bpm(), None);
    assert_eq!(Tempo::DEFAULT.bpm(), Some(120));
}
