use std::path::PathBuf;

use crate::application::data::ColorChoice;
use crate::cli::Cli;

#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub config_path: Option<PathBuf>,
    /// Overrides the colour setting of the shell config when present.
    pub color: Option<ColorChoice>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config_path: cli.config,
            color: cli.color,
        }
    }
}
