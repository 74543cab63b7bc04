//! The shared readable stream and the low-level helpers all readers build on.
//!
//! Any [`BufRead`] is an input stream. Readers take the stream by value, and because
//! `&mut R` is a [`BufRead`] too, one stream can be lent to each strategy in turn:
//!
//! ```
//! use std::io::Cursor;
//! use termread::ReadStream;
//!
//! let mut input = Cursor::new("42 Ada\n  hello world  \nlast\n");
//! let age: i32 = input.next_token().unwrap();
//! let first: String = input.next_token().unwrap();
//! assert_eq!((age, first.as_str()), (42, "Ada"));
//! assert_eq!(input.next_line('\n').unwrap(), "hello world");
//! assert_eq!(input.next_scanned_line().unwrap().as_deref(), Some("last"));
//! ```

use crate::error::{PartialLine, ReadError};
use crate::line::LineReader;
use crate::scanner::LineScanner;
use crate::token::TokenReader;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::str::FromStr;

/// One entry point per reading strategy, available on every [`BufRead`].
///
/// Each call builds a fresh reader over `&mut self`, so the caller picks a strategy per
/// read and no strategy can hold the stream while another one reads.
pub trait ReadStream: BufRead {
    /// Read the next whitespace-delimited token as `T`. See [`TokenReader::read_token`].
    fn next_token<T>(&mut self) -> Result<T, ReadError>
    where
        T: FromStr,
        T::Err: Display,
    {
        TokenReader::new(self).read_token()
    }

    /// Read up to `delimiter` and trim the result. See [`LineReader::read_line`].
    fn next_line(&mut self, delimiter: char) -> Result<String, PartialLine> {
        LineReader::new(self).read_line(delimiter)
    }

    /// Scan exactly one line.
    ///
    /// `Ok(None)` is normal exhaustion; only genuine failures come back as `Err`.
    fn next_scanned_line(&mut self) -> Result<Option<String>, ReadError> {
        let mut scanner = LineScanner::new(self);
        if scanner.step() {
            return Ok(Some(scanner.current_line().to_string()));
        }
        match scanner.into_error() {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }

    /// A scanner that keeps stepping over this stream.
    fn line_scanner(&mut self) -> LineScanner<&mut Self> {
        LineScanner::new(self)
    }
}

impl<R: BufRead + ?Sized> ReadStream for R {}

/// Whitespace that separates tokens.
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Look at the next byte without consuming it; `None` at end of stream.
pub(crate) fn peek_byte<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<Option<u8>> {
    loop {
        match reader.fill_buf() {
            Ok(buf) => return Ok(buf.first().copied()),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

/// Input is a byte stream; invalid UTF-8 is replaced rather than rejected.
pub(crate) fn decode(raw: Vec<u8>) -> String {
    String::from_utf8(raw)
        .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
}
