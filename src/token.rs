use crate::error::ReadError;
use crate::stream::{decode, is_space, peek_byte};
use std::any::type_name;
use std::fmt::Display;
use std::io::{self, BufRead};
use std::str::FromStr;

/// Reads whitespace-delimited tokens and converts them to scalar values.
///
/// Leading whitespace, newlines included, is skipped. After a token exactly one delimiting
/// whitespace character is consumed (`\r\n` counts as one), so a line read that follows a
/// token starts on the next line instead of returning the rest of the current one empty.
pub struct TokenReader<R> {
    inner: R,
    position: u64,
}

impl<R: BufRead> TokenReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, position: 0 }
    }

    /// Bytes consumed by this reader so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Consume the next token and parse it as `T`.
    ///
    /// The token is consumed even when it does not parse, so a caller that re-prompts
    /// after a [`ReadError::FormatMismatch`] moves on to fresh input.
    pub fn read_token<T>(&mut self) -> Result<T, ReadError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let token = decode(self.read_raw_token()?);
        token.parse::<T>().map_err(|err| ReadError::FormatMismatch {
            reason: err.to_string(),
            expected: type_name::<T>(),
            token,
        })
    }

    fn read_raw_token(&mut self) -> Result<Vec<u8>, ReadError> {
        self.skip_space()?;

        let mut token = Vec::new();
        loop {
            let (done, used) = {
                let available = match self.inner.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e.into()),
                };
                match available.iter().position(|&b| is_space(b)) {
                    Some(end) => {
                        token.extend_from_slice(&available[..end]);
                        (true, end)
                    }
                    None => {
                        token.extend_from_slice(available);
                        (available.is_empty(), available.len())
                    }
                }
            };
            self.advance(used);
            if done {
                break;
            }
        }

        if token.is_empty() {
            return Err(ReadError::EndOfInput);
        }
        self.skip_delimiter()?;
        tracing::trace!(len = token.len(), position = self.position, "token consumed");
        Ok(token)
    }

    fn skip_space(&mut self) -> io::Result<()> {
        loop {
            let (skipped, more) = {
                let available = match self.inner.fill_buf() {
                    Ok(buf) => buf,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                let skipped = available.iter().take_while(|&&b| is_space(b)).count();
                // Keep going only while the whole buffer was whitespace.
                (skipped, !available.is_empty() && skipped == available.len())
            };
            self.advance(skipped);
            if !more {
                return Ok(());
            }
        }
    }

    fn skip_delimiter(&mut self) -> io::Result<()> {
        match peek_byte(&mut self.inner)? {
            Some(b'\r') => {
                self.advance(1);
                if peek_byte(&mut self.inner)? == Some(b'\n') {
                    self.advance(1);
                }
            }
            Some(b) if is_space(b) => self.advance(1),
            _ => {}
        }
        Ok(())
    }

    fn advance(&mut self, n: usize) {
        self.inner.consume(n);
        self.position += n as u64;
    }
}
