use crate::error::ReadError;
use crate::stream::decode;
use std::io::{self, BufRead};

/// Longest line a [`LineScanner`] accepts unless told otherwise.
pub const DEFAULT_MAX_LINE_LEN: usize = 64 * 1024;

/// Steps through a stream one line at a time.
///
/// `step` answers only "is there another line". Running out of input and failing to
/// read look the same from there; [`last_error`](Self::last_error) tells them apart and
/// stays `None` for ordinary end of input. A failure is sticky: once recorded, every
/// later `step` returns `false` without touching the stream. Text read before an I/O
/// failure is still returned as a last line, with the error already recorded.
///
/// Lines come back without their `\n` (or `\r\n`) and are not trimmed otherwise.
///
/// ```
/// use std::io::Cursor;
/// use termread::LineScanner;
///
/// let mut scanner = LineScanner::new(Cursor::new("line1\nline2\n"));
/// assert!(scanner.step());
/// assert_eq!(scanner.current_line(), "line1");
/// assert!(scanner.step());
/// assert_eq!(scanner.current_line(), "line2");
/// assert!(!scanner.step());
/// assert!(scanner.last_error().is_none());
/// ```
pub struct LineScanner<R> {
    inner: R,
    line: String,
    error: Option<ReadError>,
    finished: bool,
    max_line_len: usize,
    position: u64,
}

impl<R: BufRead> LineScanner<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
            error: None,
            finished: false,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            position: 0,
        }
    }

    /// Change the longest accepted line, in bytes, terminator excluded.
    pub fn with_max_line_len(mut self, limit: usize) -> Self {
        self.max_line_len = limit;
        self
    }

    /// Read the next line. `false` means stop: either input ran out or reading failed.
    pub fn step(&mut self) -> bool {
        if self.finished || self.error.is_some() {
            return false;
        }

        let mut raw = Vec::new();
        match self.read_raw_line(&mut raw) {
            Ok(terminated) => {
                if !terminated {
                    self.finished = true;
                    if raw.is_empty() {
                        return false;
                    }
                }
                if terminated {
                    raw.pop();
                }
                self.accept(raw);
                true
            }
            // Bytes consumed before a failed read still make up a final line; the error
            // stops the next step.
            Err(err @ ReadError::Io(_)) if !raw.is_empty() => {
                self.error = Some(err);
                self.accept(raw);
                true
            }
            Err(err) => {
                self.error = Some(err);
                false
            }
        }
    }

    fn accept(&mut self, mut raw: Vec<u8>) {
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }
        self.line = decode(raw);
        tracing::trace!(position = self.position, "line scanned");
    }

    /// The line captured by the most recent successful [`step`](Self::step); empty before
    /// the first one.
    pub fn current_line(&self) -> &str {
        &self.line
    }

    /// The failure that stopped the scanner, if any. `None` after ordinary end of input.
    pub fn last_error(&self) -> Option<&ReadError> {
        self.error.as_ref()
    }

    pub fn into_error(self) -> Option<ReadError> {
        self.error
    }

    /// Bytes consumed by this scanner so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Returns whether the line ended with `\n` (`false` means end of stream).
    fn read_raw_line(&mut self, raw: &mut Vec<u8>) -> Result<bool, ReadError> {
        loop {
            let (found, used) = {
                let available = match self.inner.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                };
                if available.is_empty() {
                    return Ok(false);
                }
                match available.iter().position(|&b| b == b'\n') {
                    Some(i) => {
                        raw.extend_from_slice(&available[..=i]);
                        (true, i + 1)
                    }
                    None => {
                        raw.extend_from_slice(available);
                        (false, available.len())
                    }
                }
            };
            self.inner.consume(used);
            self.position += used as u64;

            if raw.len() - usize::from(found) > self.max_line_len {
                return Err(ReadError::LineTooLong {
                    limit: self.max_line_len,
                });
            }
            if found {
                return Ok(true);
            }
        }
    }
}

impl<R: BufRead> Iterator for LineScanner<R> {
    type Item = String;

    /// Yields lines until [`step`](LineScanner::step) would return `false`; check
    /// [`last_error`](LineScanner::last_error) afterwards.
    fn next(&mut self) -> Option<String> {
        if self.step() {
            Some(self.line.clone())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_adapters::FailingSource;
    use std::io::{BufReader, Cursor};

    #[test]
    fn test_two_lines_then_clean_exhaustion() {
        let mut scanner = LineScanner::new(Cursor::new("line1\nline2\n"));
        assert_eq!(scanner.current_line(), "");

        assert!(scanner.step());
        assert_eq!(scanner.current_line(), "line1");
        assert!(scanner.step());
        assert_eq!(scanner.current_line(), "line2");

        assert!(!scanner.step());
        assert!(scanner.last_error().is_none());
        assert!(!scanner.step());
        assert_eq!(scanner.current_line(), "line2");
        assert_eq!(scanner.position(), 12);
    }

    #[test]
    fn test_lines_are_not_trimmed() {
        let mut scanner = LineScanner::new(Cursor::new("  padded  \r\n\n\tlast  "));
        let lines: Vec<String> = scanner.by_ref().collect();
        assert_eq!(lines, vec!["  padded  ", "", "\tlast  "]);
        assert!(scanner.last_error().is_none());
    }

    #[test]
    fn test_empty_input() {
        let mut scanner = LineScanner::new(Cursor::new(""));
        assert!(!scanner.step());
        assert!(scanner.last_error().is_none());
    }

    #[test]
    fn test_failure_mid_stream_is_sticky() {
        let mut scanner = LineScanner::new(FailingSource::new("ok\nbro", "read error"));
        assert!(scanner.step());
        assert_eq!(scanner.current_line(), "ok");
        assert!(scanner.last_error().is_none());

        // The unterminated tail read before the failure is still handed out.
        assert!(scanner.step());
        assert_eq!(scanner.current_line(), "bro");
        assert_eq!(scanner.position(), 6);
        let err = scanner.last_error().expect("error should be recorded");
        assert!(matches!(err, ReadError::Io(_)));
        assert_eq!(err.to_string(), "read failed: read error");

        assert!(!scanner.step());
        assert!(!scanner.step());
        assert_eq!(scanner.current_line(), "bro");
        assert!(scanner.last_error().is_some());
    }

    #[test]
    fn test_failure_at_line_boundary_yields_no_extra_line() {
        let mut scanner = LineScanner::new(FailingSource::new("ok\n", "read error"));
        assert!(scanner.step());
        assert!(!scanner.step());
        assert_eq!(scanner.current_line(), "ok");
        assert!(matches!(scanner.last_error(), Some(ReadError::Io(_))));
    }

    #[test]
    fn test_iterator_keeps_partial_line_before_failure() {
        let mut scanner = LineScanner::new(FailingSource::new("a\r\nb\r", "gone"));
        let lines: Vec<String> = scanner.by_ref().collect();
        assert_eq!(lines, vec!["a", "b"]);
        assert!(scanner.last_error().is_some());
    }

    #[test]
    fn test_line_too_long_is_a_failure() {
        let mut scanner = LineScanner::new(Cursor::new("short\nmuch too long\nok\n"))
            .with_max_line_len(5);
        assert!(scanner.step());
        assert_eq!(scanner.current_line(), "short");
        assert!(!scanner.step());
        assert!(matches!(
            scanner.last_error(),
            Some(ReadError::LineTooLong { limit: 5 })
        ));
        assert!(!scanner.step());
    }

    #[test]
    fn test_long_line_over_small_buffer() {
        let text = "a".repeat(100) + "\nb\n";
        let source = BufReader::with_capacity(8, Cursor::new(text));
        let lines: Vec<String> = LineScanner::new(source).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].len(), 100);
        assert_eq!(lines[1], "b");
    }

    #[test]
    fn test_does_not_read_past_finish() {
        let mut input = Cursor::new("a\n");
        let mut scanner = LineScanner::new(&mut input);
        assert!(scanner.step());
        assert!(!scanner.step());
        assert!(!scanner.step());
        assert_eq!(input.position(), 2);
    }
}
