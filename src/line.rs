use crate::error::{PartialLine, ReadError};
use crate::stream::decode;
use std::io::BufRead;

/// Reads everything up to a delimiter and hands back the trimmed text.
pub struct LineReader<R> {
    inner: R,
    position: u64,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed by this reader so far, delimiters included.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Accumulate input until `delimiter` (consumed) or the end of the stream.
    ///
    /// The delimiter is dropped and surrounding whitespace trimmed; whitespace inside the
    /// line is kept. When the stream stops first, the trimmed text gathered so far comes
    /// back inside the [`PartialLine`] together with the reason.
    pub fn read_line(&mut self, delimiter: char) -> Result<String, PartialLine> {
        let mut encoded = [0u8; 4];
        let delimiter = delimiter.encode_utf8(&mut encoded).as_bytes();
        let last = delimiter[delimiter.len() - 1];

        let mut raw = Vec::new();
        let status = loop {
            let before = raw.len();
            let result = self.inner.read_until(last, &mut raw);
            self.position += (raw.len() - before) as u64;
            match result {
                Ok(_) if raw.ends_with(delimiter) => break Ok(()),
                Ok(0) => break Err(ReadError::EndOfInput),
                // A continuation byte of a wider delimiter, keep reading.
                Ok(_) if raw.last() == Some(&last) => continue,
                Ok(_) => break Err(ReadError::EndOfInput),
                Err(e) => break Err(ReadError::Io(e)),
            }
        };

        if status.is_ok() {
            raw.truncate(raw.len() - delimiter.len());
        }
        let text = decode(raw).trim().to_string();
        tracing::trace!(position = self.position, complete = status.is_ok(), "line consumed");

        match status {
            Ok(()) => Ok(text),
            Err(error) => Err(PartialLine { text, error }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::FailingSource;
    use std::io::{BufReader, Cursor};

    #[test]
    fn test_trims_surrounding_whitespace_and_delimiter() {
        let mut reader = LineReader::new(Cursor::new("  hello world  \n"));
        assert_eq!(reader.read_line('\n').unwrap(), "hello world");
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn test_internal_whitespace_is_kept() {
        let mut reader = LineReader::new(Cursor::new("\tAda   King \u{a0}\r\nnext\n"));
        assert_eq!(reader.read_line('\n').unwrap(), "Ada   King");
        assert_eq!(reader.read_line('\n').unwrap(), "next");
    }

    #[test]
    fn test_missing_delimiter_returns_partial_text() {
        let mut reader = LineReader::new(Cursor::new("partial"));
        let partial = reader.read_line('\n').unwrap_err();
        assert_eq!(partial.text, "partial");
        assert!(partial.error.is_end_of_input());
    }

    #[test]
    fn test_empty_stream() {
        let mut reader = LineReader::new(Cursor::new(""));
        let (text, err) = reader.read_line('\n').unwrap_err().into_parts();
        assert_eq!(text, "");
        assert!(err.is_end_of_input());
    }

    #[test]
    fn test_non_whitespace_delimiter_is_stripped() {
        let mut reader = LineReader::new(Cursor::new(" red , green,blue"));
        assert_eq!(reader.read_line(',').unwrap(), "red");
        assert_eq!(reader.read_line(',').unwrap(), "green");
        assert_eq!(reader.read_line(',').unwrap_err().text, "blue");
    }

    #[test]
    fn test_multibyte_delimiter() {
        let mut reader = LineReader::new(Cursor::new("caf\u{e9} \u{b6} tail\u{b6}"));
        assert_eq!(reader.read_line('\u{b6}').unwrap(), "caf\u{e9}");
        assert_eq!(reader.read_line('\u{b6}').unwrap(), "tail");

        // '\u{a6}' ends in the same byte as '\u{e6}' without being the delimiter.
        let mut reader = LineReader::new(Cursor::new("x\u{a6}y\u{e6}z"));
        assert_eq!(reader.read_line('\u{e6}').unwrap(), "x\u{a6}y");
        assert_eq!(reader.position(), 6);
    }

    #[test]
    fn test_delimiter_across_small_buffer() {
        let source = BufReader::with_capacity(2, Cursor::new("one two\nthree\n"));
        let mut reader = LineReader::new(source);
        assert_eq!(reader.read_line('\n').unwrap(), "one two");
        assert_eq!(reader.read_line('\n').unwrap(), "three");
    }

    #[test]
    fn test_io_failure_keeps_text_read_so_far() {
        let mut reader = LineReader::new(FailingSource::new("  half a li", "cable pulled"));
        let partial = reader.read_line('\n').unwrap_err();
        assert_eq!(partial.text, "half a li");
        assert!(matches!(partial.error, ReadError::Io(_)));
        assert_eq!(reader.position(), 11);
    }
}
