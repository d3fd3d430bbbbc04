use clap::{Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::path::PathBuf;

/// How results are written to stdout
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary per file
    Text,
    /// One JSON array with an entry per file
    Json,
}

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Trail Log - Distance, elevation gain and elevation profiles for logged trips
pub struct Settings {
    /// GPX files to analyze
    #[clap(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Keep one elevation profile sample every N track points (first and last are always kept)
    #[clap(short, long, default_value = "10")]
    pub stride: NonZeroUsize,

    /// Output format
    #[clap(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Skip the elevation profile and only print the summary
    #[clap(long, default_value = "false")]
    pub no_profile: bool,
}

impl Settings {
    /// Parse settings from the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match Settings::try_parse() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }
}
