use anyhow::{Context, Result};
use std::io::{self, BufReader};
use termread::config::{Args, Environment, Settings};
use termread::io_adapters::EditorSource;
use termread::{Session, logging};

fn main() -> Result<()> {
    let args: Args = argh::from_env();
    let settings = Settings::resolve(args, &Environment::new());
    logging::init(&settings.log_filter, settings.log_format)?;
    tracing::debug!(?settings, "starting");

    if settings.use_editor {
        let source = EditorSource::new().context("cannot start line editor")?;
        let prompt = source.prompt_sink();
        Session::new(BufReader::new(source), prompt)
            .with_max_line_len(settings.max_line_len)
            .walkthrough(settings.delimiter)
    } else {
        Session::new(io::stdin().lock(), io::stdout())
            .with_max_line_len(settings.max_line_len)
            .walkthrough(settings.delimiter)
    }
}
