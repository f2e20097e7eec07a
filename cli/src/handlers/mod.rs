pub mod implementations;
pub mod printing;
pub mod utils;


use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use mviz_core::config::{OutputFormat, Settings};

/// What every command gets to work with.
#[derive(Debug, Clone)]
pub struct Context {
    pub settings: Settings,
    /// Where `settings` were loaded from.
    pub config_path: PathBuf,
}

pub trait CommandHandler {
    type Output;

    fn handle<W1: std::fmt::Write, W2: std::fmt::Write>(
        &self,
        ctx: &Context,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> Self::Output;
}

#[derive(Debug, Subcommand, PartialEq)]
pub enum Command {
    /// Turn a chromagram into the data for a bar visualization
    Bars(BarsArgs),
    /// Show the tempo category and color palette for a BPM value
    Tempo {
        /// The tempo, in beats per minute
        #[clap(allow_negative_numbers = true)]
        bpm: f64,
    },
    /// Print the path of the config file in use
    Config,
}

#[derive(Debug, Args, PartialEq)]
pub struct BarsArgs {
    /// The chromagram, either a `.npy` file or a JSON array of rows (pitch classes x frames)
    #[clap(value_hint = clap::ValueHint::FilePath)]
    pub input: PathBuf,
    /// How many bars to extract, defaults to `[bars] num_bars` from the config
    #[clap(long = "bars", short = 'n', allow_negative_numbers = true)]
    pub num_bars: Option<i64>,
    /// The estimated tempo of the song, in beats per minute
    #[clap(long)]
    pub tempo: Option<f64>,
    /// The duration of the song, in seconds
    #[clap(long)]
    pub duration: Option<f64>,
    /// Path or URI (`file://`, `data:`, ...) of a spectrogram image to show behind the bars
    #[clap(long)]
    pub spectrogram: Option<String>,
    /// Title of the song
    #[clap(long)]
    pub title: Option<String>,
    /// Artist of the song
    #[clap(long)]
    pub artist: Option<String>,
    /// The audio file the chromagram was computed from, the viewer plays it back
    #[clap(long, value_hint = clap::ValueHint::FilePath)]
    pub audio: Option<PathBuf>,
    /// Write the document here instead of to stdout
    #[clap(long, short, value_hint = clap::ValueHint::FilePath)]
    pub output: Option<PathBuf>,
    /// Output format, defaults to `[output] format` from the config
    #[clap(long, short)]
    pub format: Option<Format>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// A plain JSON document
    Json,
    /// A script defining `const audioData = ...;`
    Js,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Json => Self::Json,
            Format::Js => Self::Js,
        }
    }
}
