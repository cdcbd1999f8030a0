#![doc = r#"
Rusty representation of a [`MidiFile`]
"#]

mod chunk;
pub use chunk::*;

mod decoder;

mod event;
pub use event::*;

mod header;
pub use header::*;

mod meta;
pub use meta::{MetaType, Tempo};

mod note;
pub use note::*;

mod reconstruct;
pub use reconstruct::*;

mod timed_note_iter;
pub use timed_note_iter::*;

mod timing;
pub use timing::*;

mod track;
pub use track::*;

use crate::{file::decoder::TrackDecoder, prelude::*};
use alloc::{borrow::Cow, vec::Vec};

/// How a parse ended
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParseStatus {
    /// Every declared track chunk was read
    #[default]
    Success,
    /// The container was malformed; the file holds what was read before the error
    Failed(FormatError),
}

impl ParseStatus {
    /// True if the parse reached the end of the declared tracks
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// The error that stopped the parse, if any
    pub const fn error(&self) -> Option<&FormatError> {
        match self {
            Self::Success => None,
            Self::Failed(e) => Some(e),
        }
    }
}

#[doc = r#"
A decoded Standard MIDI File.

Built once by [`MidiFile::parse`] and never modified afterwards. Parsing always
produces a value; check [`MidiFile::status`] before trusting it, and
[`Track::interruption`] for tracks that were cut short.

# Example
```rust
# use midisheet::prelude::*;
let file = MidiFile::parse(&b"MThx\0\0\0\x06\0\0\0\x01\x01\xE0"[..]);

assert_eq!(
    file.status().error(),
    Some(&FormatError::InvalidMagic(*b"MThx"))
);
assert!(file.tracks().is_empty());
```
"#]
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MidiFile {
    header: Option<MidiFileHeader>,
    tracks: Vec<Track>,
    tempo: Option<Tempo>,
    status: ParseStatus,
}

impl MidiFile {
    /// Parse a set of bytes into a file struct
    pub fn parse<'a, B>(bytes: B) -> Self
    where
        B: Into<Cow<'a, [u8]>>,
    {
        let mut reader = Reader::from_bytes(bytes);
        let mut file = MidiFile::default();
        if let Err(e) = file.read_chunks(&mut reader) {
            #[cfg(feature = "tracing")]
            tracing::warn!("Parse failed at byte {}: {e}", reader.buffer_position());
            file.status = ParseStatus::Failed(e);
        }
        file
    }

    /// Read every byte from `source`, then parse them.
    ///
    /// Only I/O failures are returned as errors; decoding problems are reported through
    /// [`MidiFile::status`] as with [`MidiFile::parse`].
    #[cfg(feature = "std")]
    pub fn from_read<R: std::io::Read>(mut source: R) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        source.read_to_end(&mut bytes)?;
        Ok(Self::parse(bytes))
    }

    fn read_chunks(&mut self, reader: &mut Reader<'_>) -> Result<(), FormatError> {
        let header = MidiFileHeader::read(reader).map_err(|e| match into_format_error(e) {
            Some(format) => format,
            None => FormatError::TruncatedHeader(reader.buffer_position()),
        })?;
        self.header = Some(header);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            "Header: format {}, {} tracks, division {}",
            header.format(),
            header.track_count(),
            header.timing().division()
        );

        let declared = header.track_count();
        for index in 0..declared as usize {
            let chunk = match TrackChunkHeader::read(reader, index) {
                Ok(chunk) => chunk,
                Err(e) => {
                    return Err(into_format_error(e).unwrap_or(FormatError::MissingTracks {
                        declared,
                        found: index,
                    }));
                }
            };

            let (mut body, clamped) = reader.split_off(chunk.len() as usize);
            let mut track = Track::default();
            let mut interruption =
                TrackDecoder::new(&mut body).run(&mut track, &mut self.tempo);
            if clamped && interruption == Some(TrackInterruption::MissingEndOfTrack) {
                interruption = Some(TrackInterruption::Truncated);
            }
            track.set_interruption(interruption);
            track.reconstruct_notes();

            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Track {index} ({:?}): {} events, {} notes",
                track.name(),
                track.events().len(),
                track.notes().len()
            );

            self.tracks.push(track);
        }

        if !reader.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                "Ignoring {} bytes after the last declared track",
                reader.remaining()
            );
        }
        Ok(())
    }

    /// How the parse ended
    pub const fn status(&self) -> &ParseStatus {
        &self.status
    }

    /// Convert into a `Result`, discarding the partial file on failure
    pub fn into_result(self) -> Result<Self, FormatError> {
        match self.status {
            ParseStatus::Success => Ok(self),
            ParseStatus::Failed(e) => Err(e),
        }
    }

    /// The file header, if it could be read
    pub const fn header(&self) -> Option<&MidiFileHeader> {
        self.header.as_ref()
    }

    /// Returns header timing info
    pub fn timing(&self) -> Option<Timing> {
        self.header.map(|h| *h.timing())
    }

    /// Ticks per quarter note, if the file counts time that way
    pub fn time_division(&self) -> Option<u16> {
        self.timing().and_then(|t| t.ticks_per_quarter_note())
    }

    /// Returns the decoded tracks
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// The first tempo set anywhere in the file
    pub const fn tempo(&self) -> Option<Tempo> {
        self.tempo
    }

    /// Beats per minute derived from [`MidiFile::tempo`]
    pub fn bpm(&self) -> Option<u32> {
        self.tempo.and_then(|t| t.bpm())
    }

    /// Microseconds per tick.
    ///
    /// Uses [`Tempo::DEFAULT`] if the file never set a tempo. `None` if the file does not
    /// count in ticks per quarter note.
    pub fn micros_per_tick(&self) -> Option<f64> {
        let tpqn = self.time_division().filter(|t| *t > 0)?;
        Some(self.tempo_or_default().micros_per_quarter_note() as f64 / tpqn as f64)
    }

    /// Convert a tick position to wall-clock time from the start of the file
    pub fn ticks_to_micros(&self, ticks: u64) -> Option<UMicros> {
        let tpqn = self.time_division().filter(|t| *t > 0)?;
        Some(timed_note_iter::ticks_to_micros(
            ticks,
            self.tempo_or_default(),
            tpqn,
        ))
    }

    fn tempo_or_default(&self) -> Tempo {
        self.tempo.unwrap_or(Tempo::DEFAULT)
    }
}

fn into_format_error(err: ReaderError) -> Option<FormatError> {
    match err.kind {
        ReaderErrorKind::ParseError(ParseError::Format(format)) => Some(format),
        _ => None,
    }
}

#[test]
fn empty_input_is_truncated_header() {
    let file = MidiFile::parse(alloc::vec::Vec::<u8>::new());
    assert_eq!(
        file.status(),
        &ParseStatus::Failed(FormatError::TruncatedHeader(0))
    );
    assert_eq!(file.header(), None);
}

#[test]
fn header_without_tracks() {
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 0, 0x00, 0x60];
    let file = MidiFile::parse(&bytes[..]);
    assert!(file.status().is_success());
    assert_eq!(file.time_division(), Some(96));
    assert!(file.tracks().is_empty());
    assert_eq!(file.tempo(), None);
    assert_eq!(file.bpm(), None);
}

#[test]
fn default_tempo_for_wall_clock() {
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 0, 0x01, 0xE0];
    let file = MidiFile::parse(&bytes[..]);
    assert_eq!(file.ticks_to_micros(480), Some(UMicros::new(500_000)));
    assert_eq!(file.ticks_to_micros(240), Some(UMicros::new(250_000)));
}

#[test]
fn timecode_files_have_no_tick_rate() {
    let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 0, 0xE7, 0x28];
    let file = MidiFile::parse(&bytes[..]);
    assert!(file.status().is_success());
    assert_eq!(file.timing(), Some(Timing::Timecode(0xE728)));
    assert_eq!(file.time_division(), None);
    assert_eq!(file.micros_per_tick(), None);
}
