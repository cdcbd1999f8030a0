#![doc = r#"
A Standard MIDI File decoder built for note-sheet renderers.

`midisheet` reads a `.mid` byte stream and hands back a [`MidiFile`](crate::file::MidiFile):
every track's decoded events, the notes reconstructed from its Note-On/Note-Off pairs,
the file tempo and the time division needed to place those notes in time.

# Example
```rust
use midisheet::prelude::*;

let bytes = [
    b'M', b'T', b'h', b'd', 0, 0, 0, 6, 0, 0, 0, 1, 0x01, 0xE0,
    b'M', b'T', b'r', b'k', 0, 0, 0, 13,
    0x00, 0x90, 60, 100,
    0x83, 0x60, 0x80, 60, 0,
    0x00, 0xFF, 0x2F, 0x00,
];

let file = MidiFile::parse(&bytes[..]);
assert!(file.status().is_success());

let track = &file.tracks()[0];
let note = track.notes()[0];
assert_eq!(note.key().byte(), 60);
assert_eq!(note.start(), 0);
assert_eq!(note.duration(), 480);
```

# Decoding model

Parsing never panics and never fails outright. Problems are recorded on the value
that comes back:

- a malformed header or chunk id stops the parse and sets
  [`ParseStatus::Failed`](crate::file::ParseStatus::Failed);
- a track whose bytes run out, or whose stream cannot be decoded any further, keeps
  what was read so far and records a [`TrackInterruption`](crate::TrackInterruption).
"#]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod byte;
pub use byte::*;

mod error;
pub use error::*;

pub mod file;

pub mod message;

mod micros;
pub use micros::*;

mod pitch;
pub use pitch::*;

pub mod reader;

/// Commonly used types
pub mod prelude {
    pub use crate::{
        byte::*,
        error::*,
        file::*,
        message::*,
        micros::*,
        pitch::*,
        reader::{ReadResult, Reader, ReaderError, ReaderErrorKind},
    };
}
