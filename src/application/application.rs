use std::io;

use snafu::prelude::*;
use supports_color::Stream;
use tracing::debug;

use crate::application::RuntimeConfig;
use crate::config::{ShellConfig, ShellConfigError};
use crate::shell::Session;

pub struct Application;

impl Application {
    pub fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let shell_config = Self::load_shell_config(&app_config)?;

        let color = app_config
            .color
            .unwrap_or(shell_config.color)
            .enabled_for(Stream::Stdout);
        colored::control::set_override(color);
        debug!("Colored output: {}", color);

        let mut session = Session::new(&shell_config, color);
        session
            .run(io::stdin().lock(), &mut io::stdout(), &mut io::stderr())
            .context(TerminalSnafu)?;

        Ok(())
    }

    fn load_shell_config(app_config: &RuntimeConfig) -> Result<ShellConfig, ApplicationError> {
        match &app_config.config_path {
            Some(path) => ShellConfig::read(path).context(ShellConfigSnafu),
            None => {
                debug!("No shell config given, using defaults");
                Ok(ShellConfig::default())
            }
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ShellConfigError { source: ShellConfigError },
    #[snafu(display("Lost access to the terminal"))]
    TerminalError { source: io::Error },
}
