//! Errors reported by the input readers.

use std::io;
use thiserror::Error;

/// Why a single read could not produce the unit it was asked for.
///
/// None of the readers retry or log these; every error goes straight back to the caller,
/// which decides whether to stop, re-prompt or fall back to a default.
#[derive(Debug, Error)]
pub enum ReadError {
    /// The stream ended before a full token or line could be delimited.
    #[error("end of input")]
    EndOfInput,

    /// A token was read but its text does not parse as the requested type.
    #[error("cannot read {token:?} as {expected}: {reason}")]
    FormatMismatch {
        /// The consumed token text.
        token: String,
        /// Name of the type the caller asked for.
        expected: &'static str,
        /// Parser message for the failure.
        reason: String,
    },

    /// The underlying source reported a failure other than ordinary exhaustion.
    #[error("read failed: {0}")]
    Io(#[from] io::Error),

    /// A scanned line grew beyond the scanner's limit.
    #[error("line longer than {limit} bytes")]
    LineTooLong { limit: usize },
}

impl ReadError {
    /// True for ordinary exhaustion, false for every genuine failure.
    pub fn is_end_of_input(&self) -> bool {
        matches!(self, ReadError::EndOfInput)
    }
}

/// A line read that stopped early.
///
/// The text gathered before the failure is kept (already trimmed) next to the error, so a
/// caller can still use e.g. a last line that had no trailing newline.
#[derive(Debug, Error)]
#[error("{error} (after {text:?})")]
pub struct PartialLine {
    /// Trimmed text accumulated before the stream stopped.
    pub text: String,
    /// What stopped the read.
    #[source]
    pub error: ReadError,
}

impl PartialLine {
    pub fn into_parts(self) -> (String, ReadError) {
        (self.text, self.error)
    }
}
