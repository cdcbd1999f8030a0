use crate::{FormatError, ParseError};
use thiserror::Error;

#[doc = r#"
A set of errors that can occur while reading bytes into the midi representation
"#]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Reading at Position {position}, {kind}")]
pub struct ReaderError {
    position: usize,
    pub(crate) kind: ReaderErrorKind,
}

/// A kind of error that a reader can produce
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReaderErrorKind {
    /// Parsing errors
    #[error("Parsing {0}")]
    ParseError(#[from] ParseError),
    /// Reading out of bounds.
    #[error("Read out of bounds!")]
    OutOfBounds,
    /// The stream ended in the middle of a variable length quantity.
    #[error("Stream ended inside a variable length quantity (read {partial} so far)")]
    TruncatedVarLen {
        /// The value folded together from the bytes that were available
        partial: u32,
    },
}

impl ReaderErrorKind {
    #[cfg(test)]
    pub(crate) const fn format(err: FormatError) -> Self {
        Self::ParseError(ParseError::Format(err))
    }
}

impl ReaderError {
    /// Create a reader error from a position and kind
    pub const fn new(position: usize, kind: ReaderErrorKind) -> Self {
        Self { position, kind }
    }
    /// True if the stream ended before the read could complete
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(
            self.kind,
            ReaderErrorKind::OutOfBounds | ReaderErrorKind::TruncatedVarLen { .. }
        )
    }
    /// Returns the error kind of the reader.
    pub fn error_kind(&self) -> &ReaderErrorKind {
        &self.kind
    }
    /// Returns the position where the read error occurred.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Create a new invalid data error
    pub fn parse_error(position: usize, error: impl Into<ParseError>) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::ParseError(error.into()),
        }
    }

    /// Create a new out of bounds error
    pub const fn oob(position: usize) -> Self {
        Self {
            position,
            kind: ReaderErrorKind::OutOfBounds,
        }
    }
}

/// The Read Result type (see [`ReaderError`])
pub type ReadResult<T> = Result<T, ReaderError>;
