use thiserror::Error;

#[doc = r#"
Problems with the file's container structure.

Any of these stops the parse. The [`MidiFile`](crate::file::MidiFile) that comes back
keeps whatever was decoded before the problem was found.
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FormatError {
    /// The first four bytes were not `MThd`
    #[error("Expected file id `MThd`, found {0:?}")]
    InvalidMagic([u8; 4]),
    /// The header declared a length other than 6
    #[error("Header length must be 6, found {0}")]
    InvalidHeaderLength(u32),
    /// The stream ended inside the 14 byte header
    #[error("Header ended after {0} of 14 bytes")]
    TruncatedHeader(usize),
    /// A track chunk did not start with `MTrk`
    #[error("Track {index} has chunk id {found:?}, expected `MTrk`")]
    InvalidChunkId {
        /// Zero-based index of the offending track
        index: usize,
        /// The id that was read instead
        found: [u8; 4],
    },
    /// The stream ended before every declared track was found
    #[error("Header declares {declared} tracks, but the stream ended after {found}")]
    MissingTracks {
        /// Track count from the header
        declared: u16,
        /// Number of track chunks actually present
        found: usize,
    },
}

#[doc = r#"
A track's event stream could not be decoded any further.

There is no point in the stream from which decoding could safely resume, so the track
stops here. Other tracks are unaffected.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecodeError {
    /// A status byte that is not valid inside a track chunk (0xF1-0xFE)
    #[error("Unrecognized status byte {0:#04X}")]
    UnrecognizedStatus(u8),
    /// A data byte arrived but no running status was active
    #[error("Data byte {0:#04X} found with no running status")]
    MissingRunningStatus(u8),
}

/// Any error raised while interpreting bytes
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Container structure
    #[error("Format: {0}")]
    Format(#[from] FormatError),
    /// Expected a byte with a leading 0 bit
    #[error("{0:#04X} is not a data byte (leading bit is set)")]
    DataByte(u8),
}

#[doc = r#"
Why a track stopped decoding before its end-of-track event.

Events and notes decoded before the interruption are kept.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrackInterruption {
    /// The track data ran out between two events
    #[error("Track ended without an end-of-track event")]
    MissingEndOfTrack,
    /// The track data ran out in the middle of an event
    #[error("Track data ended in the middle of an event")]
    Truncated,
    /// The event stream could not be decoded any further
    #[error("Track stream is corrupt: {0}")]
    Corrupt(#[from] DecodeError),
}
