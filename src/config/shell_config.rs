use std::{fs, path::Path};

use clap::ValueEnum;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::application::data::ColorChoice;

const DEFAULT_PROMPT: &str = "$ ";

const PROMPT_KEY: &str = "prompt";
const BANNER_KEY: &str = "banner";
const COLOR_KEY: &str = "color";

/// Presentation settings for the interactive shell, optionally loaded from a YAML file:
///
/// ```yaml
/// prompt: "memfs> "
/// banner: false
/// color: never
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    pub banner: bool,
    pub color: ColorChoice,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            banner: true,
            color: ColorChoice::default(),
        }
    }
}

impl ShellConfig {
    pub fn read(path: &Path) -> Result<Self, ShellConfigError> {
        debug!("Reading shell config file: {}", path.display());
        let contents = fs::read_to_string(path).context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read shell config file: {} bytes", contents.len());
        contents.as_str().try_into()
    }

    fn apply(&mut self, key: &str, value: &Yaml) -> Result<(), ShellConfigError> {
        match key {
            PROMPT_KEY => {
                self.prompt = value
                    .as_str()
                    .context(InvalidValueSnafu {
                        key,
                        expected: "a string",
                    })?
                    .to_string();
            }
            BANNER_KEY => {
                self.banner = match value {
                    Yaml::Value(Scalar::Boolean(banner)) => *banner,
                    _ => {
                        return InvalidValueSnafu {
                            key,
                            expected: "a boolean",
                        }
                        .fail();
                    }
                };
            }
            COLOR_KEY => {
                self.color = value
                    .as_str()
                    .and_then(|choice| ColorChoice::from_str(choice, true).ok())
                    .context(InvalidValueSnafu {
                        key,
                        expected: "one of auto, always, never",
                    })?;
            }
            _ => debug!("Skipping unknown shell config key: {}", key),
        }
        Ok(())
    }
}

impl TryFrom<&str> for ShellConfig {
    type Error = ShellConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        let mut config = ShellConfig::default();
        for (key, value) in top_level {
            match key {
                Yaml::Value(Scalar::String(key)) => config.apply(key, value)?,
                _ => warn!("Skipping non-string shell config key: {:?}", key),
            }
        }
        debug!("Loaded shell config: {:?}", config);
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum ShellConfigError {
    #[snafu(display("Failed to read the shell config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Failed to parse the shell config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted shell config file"))]
    MalformedConfig,
    #[snafu(display("Top level of the shell config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Shell config key '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: &'static str },
}
