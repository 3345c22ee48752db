use std::path::PathBuf;

use clap::Parser;

use crate::application::data::{ColorChoice, LogLevel};

/// Interactive shell over a filesystem that lives only in memory.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    /// Shell configuration file (YAML) with prompt, banner and color settings
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// When to color output; takes precedence over the configuration file
    #[clap(long, value_enum)]
    pub color: Option<ColorChoice>,
}
