//! Raw byte sources and output sinks the readers can run against.

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::io::{self, BufRead, Read, Result as IoResult, Write};
use std::rc::Rc;

/// A source that serves a fixed prefix and then fails on every read.
///
/// Stands in for a device that breaks mid-session.
pub struct FailingSource {
    data: Vec<u8>,
    pos: usize,
    message: String,
}

impl FailingSource {
    pub fn new(prefix: impl Into<Vec<u8>>, message: impl Into<String>) -> Self {
        Self {
            data: prefix.into(),
            pos: 0,
            message: message.into(),
        }
    }
}

impl Read for FailingSource {
    fn read(&mut self, out: &mut [u8]) -> IoResult<usize> {
        let n = {
            let available = self.fill_buf()?;
            let n = available.len().min(out.len());
            out[..n].copy_from_slice(&available[..n]);
            n
        };
        self.consume(n);
        Ok(n)
    }
}

impl BufRead for FailingSource {
    fn fill_buf(&mut self) -> IoResult<&[u8]> {
        if self.pos < self.data.len() {
            Ok(&self.data[self.pos..])
        } else {
            Err(io::Error::other(self.message.clone()))
        }
    }

    fn consume(&mut self, amt: usize) {
        self.pos = (self.pos + amt).min(self.data.len());
    }
}

/// Memory-backed writer for capturing prompts and answers.
pub struct MemWriter {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl MemWriter {
    pub fn new() -> Self {
        Self {
            buf: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: create writer and return (writer, rc_handle).
    pub fn with_handle() -> (Self, Rc<RefCell<Vec<u8>>>) {
        let mw = MemWriter::new();
        let rc = Rc::clone(&mw.buf);
        (mw, rc)
    }
}

impl Default for MemWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for MemWriter {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.buf.borrow_mut().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct PromptSlot {
    staged: Vec<u8>,
    pending: String,
}

/// Terminal input read through the `rustyline` line editor.
///
/// Each refill asks the editor for one line (history and cursor keys included) and serves
/// it with a trailing `\n`. End of input (Ctrl-D) reads as end of stream, Ctrl-C as an I/O
/// failure. Wrap it in a [`std::io::BufReader`] to use it with the readers.
pub struct EditorSource {
    editor: DefaultEditor,
    prompt: Rc<RefCell<PromptSlot>>,
    line: Vec<u8>,
    pos: usize,
}

impl EditorSource {
    pub fn new() -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            prompt: Rc::new(RefCell::new(PromptSlot::default())),
            line: Vec::new(),
            pos: 0,
        })
    }

    /// An output sink whose flushed text becomes the editor's next prompt.
    ///
    /// The editor redraws its line on every keystroke, so a prompt must go through it
    /// rather than straight to stdout. Complete lines are still printed to stdout.
    pub fn prompt_sink(&self) -> EditorPrompt {
        EditorPrompt {
            slot: Rc::clone(&self.prompt),
            echo: Box::new(io::stdout()),
        }
    }

    fn next_line(&mut self) -> IoResult<bool> {
        let prompt = std::mem::take(&mut self.prompt.borrow_mut().pending);
        match self.editor.readline(&prompt) {
            Ok(line) => {
                self.editor
                    .add_history_entry(line.as_str())
                    .map_err(|e| io::Error::other(e.to_string()))?;
                self.line = line.into_bytes();
                self.line.push(b'\n');
                self.pos = 0;
                Ok(true)
            }
            Err(ReadlineError::Eof) => Ok(false),
            Err(ReadlineError::Interrupted) => Err(io::Error::other("interrupted")),
            Err(ReadlineError::Io(e)) => Err(e),
            Err(err) => Err(io::Error::other(err.to_string())),
        }
    }
}

impl Read for EditorSource {
    fn read(&mut self, out: &mut [u8]) -> IoResult<usize> {
        if self.pos >= self.line.len() && !self.next_line()? {
            return Ok(0);
        }
        let n = (self.line.len() - self.pos).min(out.len());
        out[..n].copy_from_slice(&self.line[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

/// Prompt sink paired with an [`EditorSource`].
///
/// Written text is staged until `flush`. Then everything up to the last newline goes to
/// the echo writer and the rest replaces the pending prompt, dropping one that was never
/// shown because the answer was already buffered.
pub struct EditorPrompt {
    slot: Rc<RefCell<PromptSlot>>,
    echo: Box<dyn Write>,
}

impl EditorPrompt {
    /// The prompt the editor will show on its next read.
    pub fn pending(&self) -> String {
        self.slot.borrow().pending.clone()
    }
}

impl Write for EditorPrompt {
    fn write(&mut self, data: &[u8]) -> IoResult<usize> {
        self.slot.borrow_mut().staged.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> IoResult<()> {
        let mut slot = self.slot.borrow_mut();
        let staged = std::mem::take(&mut slot.staged);
        let split = staged.iter().rposition(|&b| b == b'\n').map_or(0, |i| i + 1);
        if split > 0 {
            self.echo.write_all(&staged[..split])?;
            self.echo.flush()?;
        }
        slot.pending = String::from_utf8_lossy(&staged[split..]).into_owned();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failing_source_serves_prefix_then_fails() {
        let mut src = FailingSource::new("xy", "boom");
        let mut buf = [0u8; 8];
        assert_eq!(src.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"xy");

        let err = src.read(&mut buf).unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(src.fill_buf().is_err());
    }

    #[test]
    fn test_mem_writer_collects_output() {
        let (mut w, handle) = MemWriter::with_handle();
        write!(w, "Enter age: ").unwrap();
        w.flush().unwrap();
        assert_eq!(handle.borrow().as_slice(), b"Enter age: ");
    }

    #[test]
    fn test_editor_prompt_flush_replaces_pending() {
        let slot = Rc::new(RefCell::new(PromptSlot::default()));
        let (echo, printed) = MemWriter::with_handle();
        let mut sink = EditorPrompt {
            slot: Rc::clone(&slot),
            echo: Box::new(echo),
        };

        write!(sink, "Enter age: ").unwrap();
        assert_eq!(sink.pending(), "");
        sink.flush().unwrap();
        assert_eq!(sink.pending(), "Enter age: ");
        assert!(printed.borrow().is_empty());

        write!(sink, "your age: 4\nEnter full name: ").unwrap();
        sink.flush().unwrap();
        assert_eq!(sink.pending(), "Enter full name: ");
        assert_eq!(printed.borrow().as_slice(), b"your age: 4\n");
        assert!(slot.borrow().staged.is_empty());
    }
}
