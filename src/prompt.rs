use std::io::{self, Write};

/// Output side of an interactive session: prompts before reads, answers after them.
///
/// Any writer works; prompts are flushed immediately so they show up before the read
/// blocks.
pub struct Prompt<W: Write> {
    out: W,
}

impl<W: Write> Prompt<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write `message` as-is (no newline) and flush it.
    pub fn ask(&mut self, message: &str) -> io::Result<()> {
        self.out.write_all(message.as_bytes())?;
        self.out.flush()
    }

    /// Write one full line of output.
    pub fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{}", line)?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_has_no_newline_and_say_has_one() {
        let mut prompt = Prompt::new(Vec::new());
        prompt.ask("Enter age: ").unwrap();
        prompt.say("your age: 30").unwrap();
        assert_eq!(
            String::from_utf8(prompt.into_inner()).unwrap(),
            "Enter age: your age: 30\n"
        );
    }
}
