use crate::error::{PartialLine, ReadError};
use crate::line::LineReader;
use crate::prompt::Prompt;
use crate::scanner::{DEFAULT_MAX_LINE_LEN, LineScanner};
use crate::token::TokenReader;
use anyhow::{Context, Result};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, warn};

/// What a single scanner step produced.
#[derive(Debug)]
pub enum Scanned {
    Line(String),
    /// Input ran out normally.
    Exhausted,
    Failed(ReadError),
}

/// An interactive exchange over one input stream and one prompt sink.
///
/// Every question picks exactly one reading strategy; the strategies share the stream, so
/// whatever one leaves buffered is what the next one sees.
///
/// Example
/// ```
/// use std::io::Cursor;
/// use termread::Session;
///
/// let mut session = Session::new(Cursor::new("30\n"), Vec::new());
/// let age: i32 = session.ask_token("Enter age: ").unwrap().unwrap();
/// assert_eq!(age, 30);
/// ```
pub struct Session<R: BufRead, W: Write> {
    input: R,
    prompt: Prompt<W>,
    max_line_len: usize,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            prompt: Prompt::new(out),
            max_line_len: DEFAULT_MAX_LINE_LEN,
        }
    }

    /// Limit for lines read with [`ask_scan`](Self::ask_scan).
    pub fn with_max_line_len(mut self, limit: usize) -> Self {
        self.max_line_len = limit;
        self
    }

    /// Prompt, then read one token as `T`.
    ///
    /// The outer error is the prompt sink failing; the inner one is the read itself and is
    /// left to the caller to act on.
    pub fn ask_token<T>(&mut self, message: &str) -> Result<Result<T, ReadError>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.prompt.ask(message).context("cannot write prompt")?;
        debug!(strategy = "token", "reading answer");
        Ok(TokenReader::new(&mut self.input).read_token())
    }

    /// Prompt, then read a trimmed line up to `delimiter`.
    pub fn ask_line(
        &mut self,
        message: &str,
        delimiter: char,
    ) -> Result<Result<String, PartialLine>> {
        self.prompt.ask(message).context("cannot write prompt")?;
        debug!(strategy = "line", ?delimiter, "reading answer");
        Ok(LineReader::new(&mut self.input).read_line(delimiter))
    }

    /// Prompt, then take a single scanner step.
    pub fn ask_scan(&mut self, message: &str) -> Result<Scanned> {
        self.prompt.ask(message).context("cannot write prompt")?;
        debug!(strategy = "scan", "reading answer");
        let mut scanner = LineScanner::new(&mut self.input).with_max_line_len(self.max_line_len);
        if scanner.step() {
            return Ok(Scanned::Line(scanner.current_line().to_string()));
        }
        Ok(match scanner.into_error() {
            Some(err) => Scanned::Failed(err),
            None => Scanned::Exhausted,
        })
    }

    /// Print one line of output.
    pub fn say(&mut self, line: &str) -> Result<()> {
        self.prompt.say(line).context("cannot write output")
    }

    /// Ask for an age and a name three times over, once per strategy.
    ///
    /// Read errors are reported and the walkthrough moves on to the next question; only a
    /// failing output sink stops it.
    pub fn walkthrough(&mut self, delimiter: char) -> Result<()> {
        match self.ask_token::<i32>("Enter age: ")? {
            Ok(age) => self.say(&format!("your age: {age}"))?,
            Err(err) => {
                warn!(%err, "age not read");
                self.say(&format!("could not read age: {err}"))?;
            }
        }

        match self.ask_token::<String>("Enter full name: ")? {
            Ok(first) => self.say(&format!("first word: {first}"))?,
            Err(err) => {
                warn!(%err, "name token not read");
                self.say(&format!("could not read name: {err}"))?;
            }
        }

        match self.ask_line("Enter full name: ", delimiter)? {
            Ok(name) => self.say(&format!("hello: {name}"))?,
            Err(partial) => {
                warn!(error = %partial.error, "line ended early");
                if !partial.text.is_empty() {
                    self.say(&format!("hello: {}", partial.text))?;
                }
                if !partial.error.is_end_of_input() {
                    self.say(&format!("could not read line: {}", partial.error))?;
                }
            }
        }

        match self.ask_scan("Enter full name: ")? {
            Scanned::Line(line) => self.say(&format!("you wrote {line:?}"))?,
            Scanned::Exhausted => debug!("no line left to scan"),
            Scanned::Failed(err) => {
                warn!(%err, "scanner stopped");
                self.say(&format!("there was an error: {err}"))?;
            }
        }
        Ok(())
    }

    pub fn into_parts(self) -> (R, W) {
        (self.input, self.prompt.into_inner())
    }
}
