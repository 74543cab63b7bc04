use crate::logging::LogFormat;
use crate::scanner::DEFAULT_MAX_LINE_LEN;
use argh::FromArgs;
use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::OsString;

/// Environment variable holding the log filter; wins over `RUST_LOG`.
pub const LOG_ENV: &str = "TERMREAD_LOG";

const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(FromArgs, Debug)]
/// Ask a few questions on the terminal, reading each answer with a different strategy.
pub struct Args {
    #[argh(option, from_str_fn(parse_delimiter))]
    /// character that ends a buffered line read; accepts escapes like \n, \t or \0. Defaults to a newline.
    pub delimiter: Option<char>,

    #[argh(switch)]
    /// read through a line editor with history instead of raw standard input.
    pub editor: bool,

    #[argh(option)]
    /// longest line the line scanner accepts, in bytes.
    pub max_line_len: Option<usize>,

    #[argh(option)]
    /// log filter, e.g. "debug" or "termread=trace". Overrides TERMREAD_LOG and RUST_LOG.
    pub log: Option<String>,

    #[argh(option, from_str_fn(parse_log_format), default = "LogFormat::Compact")]
    /// log layout: compact (default) or pretty.
    pub log_format: LogFormat,
}

fn parse_delimiter(value: &str) -> Result<char, String> {
    match value {
        "\\n" => Ok('\n'),
        "\\t" => Ok('\t'),
        "\\r" => Ok('\r'),
        "\\0" => Ok('\0'),
        _ => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(format!("delimiter must be a single character, got {value:?}")),
            }
        }
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, String> {
    LogFormat::parse(value)
}

/// Snapshot of the process environment taken once at startup.
///
/// Lookups only see the captured map, so tests can inject values without touching global
/// state. Variables whose name or value is not valid UTF-8 are skipped when capturing.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub vars: HashMap<String, String>,
}

impl Environment {
    /// Capture the current process environment.
    pub fn new() -> Self {
        Self::from_vars(stdenv::vars_os())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        let vars = vars
            .into_iter()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub delimiter: char,
    pub use_editor: bool,
    pub max_line_len: usize,
    pub log_filter: String,
    pub log_format: LogFormat,
}

impl Settings {
    /// Flags win over environment variables, which win over defaults.
    pub fn resolve(args: Args, env: &Environment) -> Self {
        let log_filter = args
            .log
            .or_else(|| env.get_var(LOG_ENV))
            .or_else(|| env.get_var("RUST_LOG"))
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Self {
            delimiter: args.delimiter.unwrap_or('\n'),
            use_editor: args.editor,
            max_line_len: args.max_line_len.unwrap_or(DEFAULT_MAX_LINE_LEN),
            log_filter,
            log_format: args.log_format,
        }
    }
}
