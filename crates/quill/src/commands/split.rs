//! `quill split` command implementation.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use quill_config::{CliSettings, Config};
use quill_segmenter::{Segment, SegmentConfig, segment};

use crate::error::CliError;
use crate::output::Output;
use crate::render::{render_segment, segment_header};
use crate::session::{SessionState, SessionStore};

/// Output format for segments.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// Headers followed by highlighted segment content.
    #[default]
    Plain,
    /// JSON array of segments.
    Json,
}

/// Arguments for the split command.
#[derive(Args)]
pub(crate) struct SplitArgs {
    /// Input file to split ("-" or omitted reads stdin).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover quill.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum segment length in characters (overrides config).
    #[arg(short = 'n', long)]
    max_length: Option<usize>,

    /// Prefix for every segment after the first (overrides config).
    #[arg(long, allow_hyphen_values = true)]
    prefix: Option<String>,

    /// Suffix for every segment before the last (overrides config).
    #[arg(long, allow_hyphen_values = true)]
    suffix: Option<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Plain)]
    format: Format,

    /// Split the input saved by the previous run.
    #[arg(long, conflicts_with = "input")]
    resume: bool,

    /// Do not save the input for later runs.
    #[arg(long, conflicts_with = "resume")]
    no_session: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output (segmentation debug logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SplitArgs {
    /// Execute the split command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the input cannot be read, or
    /// there is no saved session to resume.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            max_length: self.max_length,
            prefix: self.prefix,
            suffix: self.suffix,
            session_enabled: self.no_session.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let store = SessionStore::new(&config.session_resolved);

        let text = if self.resume {
            store
                .load()
                .map(|state| state.text)
                .filter(|text| !text.is_empty())
                .ok_or_else(|| CliError::Validation("No saved input to resume".to_owned()))?
        } else {
            read_input(self.input.as_deref())?
        };

        let segment_config = config.segment_config();
        let segments = segment(&text, &segment_config)?;

        if segments.is_empty() {
            output.warning("Input is empty, nothing to split");
        }

        match self.format {
            Format::Plain => {
                let colored = !self.no_color && console::colors_enabled();
                print_plain(&output, &segments, &segment_config, colored);
                if !segments.is_empty() {
                    output.info(&summary_line(
                        segments.len(),
                        text.chars().count(),
                        segment_config.max_length,
                    ));
                }
            }
            Format::Json => output.content(&serde_json::to_string_pretty(&segments)?),
        }

        if !self.resume {
            store.save(&SessionState { text });
        }

        Ok(())
    }
}

/// Read input text from a file, or stdin for `None` / `-`.
fn read_input(input: Option<&Path>) -> Result<String, CliError> {
    match input {
        Some(path) if path != Path::new("-") => Ok(std::fs::read_to_string(path)?),
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}

fn print_plain(output: &Output, segments: &[Segment], config: &SegmentConfig, colored: bool) {
    for (idx, s) in segments.iter().enumerate() {
        if idx > 0 {
            output.content("");
        }
        output.header(&segment_header(s));
        output.content(&render_segment(s, config, colored));
    }
}

/// Footer for plain output, e.g. `3 segment(s) from 612 chars, limit 256 chars`.
fn summary_line(segments: usize, input_chars: usize, max_length: usize) -> String {
    format!("{segments} segment(s) from {input_chars} chars, limit {max_length} chars")
}
