use crate::{DecodeError, message::VoiceKind};

/// Begins a system exclusive message
pub const SYSEX: u8 = 0xF0;
/// Continues or escapes a system exclusive message
pub const SYSEX_ESCAPE: u8 = 0xF7;
/// Begins a meta event
pub const META: u8 = 0xFF;

#[doc = r#"
What a status byte introduces.

# Example
```rust
# use midisheet::prelude::*;
assert_eq!(
    StatusKind::classify(0x91),
    StatusKind::Voice { kind: VoiceKind::NoteOn, channel: 1 }
);
assert_eq!(StatusKind::classify(0xFF), StatusKind::Meta);
assert_eq!(StatusKind::classify(0xF3), StatusKind::Unrecognized(0xF3));
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A channel voice message
    Voice {
        /// Which message
        kind: VoiceKind,
        /// Zero-based channel from the low nibble
        channel: u8,
    },
    /// `0xF0` or `0xF7`, followed by a length and opaque bytes
    SystemExclusive(u8),
    /// `0xFF`, followed by a type byte, a length and a payload
    Meta,
    /// Anything that may not appear as a status inside a track chunk
    Unrecognized(u8),
}

impl StatusKind {
    /// Classify a status byte
    pub fn classify(status: u8) -> Self {
        match status {
            SYSEX | SYSEX_ESCAPE => Self::SystemExclusive(status),
            META => Self::Meta,
            _ => match VoiceKind::from_status(status) {
                Some(kind) => Self::Voice {
                    kind,
                    channel: status & 0x0F,
                },
                None => Self::Unrecognized(status),
            },
        }
    }
}

#[doc = r#"
The status carried from one message to the next.

Channel voice messages may omit their status byte when it repeats the previous
message's status. This value is threaded through each decode step: given the byte
peeked where a status was expected, [`RunningStatus::resolve`] returns the status to
use, whether that byte belongs to the status, and the running status for the next
step.

# Example
```rust
# use midisheet::prelude::*;
let running = RunningStatus::default();

let first = running.resolve(0x90).unwrap();
assert_eq!(first.status, 0x90);
assert!(first.consumes_byte);

// a data byte reuses the previous status and stays in the stream
let second = first.next.resolve(62).unwrap();
assert_eq!(second.status, 0x90);
assert!(!second.consumes_byte);

// meta events clear it
let meta = second.next.resolve(0xFF).unwrap();
assert_eq!(meta.next, RunningStatus::default());
```
"#]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunningStatus(Option<u8>);

/// The outcome of [`RunningStatus::resolve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedStatus {
    /// The status byte that governs the message
    pub status: u8,
    /// True if the peeked byte was the status and must be consumed
    pub consumes_byte: bool,
    /// Running status for the following message
    pub next: RunningStatus,
}

impl RunningStatus {
    /// The active status, if any
    pub const fn status(&self) -> Option<u8> {
        self.0
    }

    /// Resolve the status for a message whose first byte is `peeked`.
    ///
    /// # Errors
    /// [`DecodeError::MissingRunningStatus`] if `peeked` is a data byte and no running
    /// status is active.
    pub const fn resolve(self, peeked: u8) -> Result<ResolvedStatus, DecodeError> {
        if peeked < 0x80 {
            return match self.0 {
                Some(status) => Ok(ResolvedStatus {
                    status,
                    consumes_byte: false,
                    next: self,
                }),
                None => Err(DecodeError::MissingRunningStatus(peeked)),
            };
        }
        let next = if peeked >= 0xF0 {
            RunningStatus(None)
        } else {
            RunningStatus(Some(peeked))
        };
        Ok(ResolvedStatus {
            status: peeked,
            consumes_byte: true,
            next,
        })
    }
}

#[test]
fn data_byte_without_running_status() {
    assert_eq!(
        RunningStatus::default().resolve(0x3C),
        Err(DecodeError::MissingRunningStatus(0x3C))
    );
}

#[test]
fn system_statuses_clear_running_status() {
    let running = RunningStatus::default().resolve(0xB2).unwrap().next;
    assert_eq!(running.status(), Some(0xB2));

    for status in [SYSEX, SYSEX_ESCAPE, META, 0xF8] {
        let resolved = running.resolve(status).unwrap();
        assert_eq!(resolved.status, status);
        assert!(resolved.consumes_byte);
        assert_eq!(resolved.next.status(), None);
    }
}

#[test]
fn new_channel_status_replaces_running_status() {
    let running = RunningStatus::default().resolve(0x90).unwrap().next;
    let resolved = running.resolve(0x81).unwrap();
    assert_eq!(resolved.next.status(), Some(0x81));
}

#[test]
fn classify_all_statuses() {
    for status in 0x80..=0xEFu8 {
        assert!(matches!(
            StatusKind::classify(status),
            StatusKind::Voice { channel, .. } if channel == status & 0x0F
        ));
    }
    assert_eq!(
        StatusKind::classify(SYSEX),
        StatusKind::SystemExclusive(SYSEX)
    );
    assert_eq!(
        StatusKind::classify(SYSEX_ESCAPE),
        StatusKind::SystemExclusive(SYSEX_ESCAPE)
    );
    for status in 0xF1..=0xFEu8 {
        if status != SYSEX_ESCAPE {
            assert_eq!(StatusKind::classify(status), StatusKind::Unrecognized(status));
        }
    }
}
