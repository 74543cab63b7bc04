//! Small readers for text typed at a terminal.
//!
//! Three independent strategies work over any [`std::io::BufRead`]:
//!
//! - [`TokenReader`] takes the next whitespace-delimited token and parses it into a scalar
//!   type. Good for a number or a single word.
//! - [`LineReader`] reads up to a delimiter and trims the result. Good for free text with
//!   spaces in it.
//! - [`LineScanner`] steps through the input line by line. Running out of input is not an
//!   error; a failed read is, and it stays recorded.
//!
//! A caller picks one strategy per read. [`ReadStream`] puts all three on the stream
//! itself, and [`Session`] pairs a stream with a prompt sink for question-and-answer
//! programs such as the `termread` binary.

pub mod config;
pub mod error;
pub mod io_adapters;
mod line;
pub mod logging;
mod prompt;
mod scanner;
mod session;
mod stream;
mod token;

pub use error::{PartialLine, ReadError};
pub use line::LineReader;
pub use prompt::Prompt;
pub use scanner::{DEFAULT_MAX_LINE_LEN, LineScanner};
pub use session::{Scanned, Session};
pub use stream::ReadStream;
pub use token::TokenReader;
