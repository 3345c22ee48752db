use std::io::{self, BufRead, Write};

use colored::Colorize;
use tracing::{debug, info};

use crate::config::ShellConfig;
use crate::filesystem::{DirEntry, FileSystem, FileSystemError};

use super::command::{Command, CommandError};

const WELCOME: &str = "Welcome to the memfs in-memory file system!";
const EXIT_HINT: &str = "Type \"exit\" to quit";
const GOODBYE: &str = "Goodbye!";

/// What a successfully executed command wants printed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Nothing,
    Text(String),
    Listing(Vec<DirEntry>),
    Exit,
}

/// An interactive session over one private [`FileSystem`].
pub struct Session {
    fs: FileSystem,
    prompt: String,
    banner: bool,
    color: bool,
}

impl Session {
    pub fn new(config: &ShellConfig, color: bool) -> Self {
        Self {
            fs: FileSystem::new(),
            prompt: config.prompt.clone(),
            banner: config.banner,
            color,
        }
    }

    /// Applies `command` to the filesystem.
    pub fn execute(&mut self, command: Command) -> Result<Response, FileSystemError> {
        debug!("Executing {:?}", command);
        let response = match command {
            Command::Mkdir { path } => {
                self.fs.mkdir(&path)?;
                Response::Nothing
            }
            Command::Cd { path } => {
                self.fs.cd(&path)?;
                Response::Nothing
            }
            Command::Ls { path } => Response::Listing(self.fs.ls(path.as_deref())?),
            Command::Pwd => Response::Text(self.fs.pwd()),
            Command::Touch { name } => {
                self.fs.touch(&name)?;
                Response::Nothing
            }
            Command::Cat { name } => Response::Text(self.fs.cat(&name)?.to_owned()),
            Command::Echo { content, name } => {
                self.fs.echo(&content, &name)?;
                Response::Nothing
            }
            Command::Cp {
                source,
                destination,
            } => {
                self.fs.cp(&source, &destination)?;
                Response::Nothing
            }
            Command::Mv {
                source,
                destination,
            } => {
                self.fs.mv(&source, &destination)?;
                Response::Nothing
            }
            Command::Rm { path } => {
                self.fs.rm(&path)?;
                Response::Nothing
            }
            Command::Exit => Response::Exit,
        };
        Ok(response)
    }

    /// Reads commands from `input` until `exit` or end of input.
    ///
    /// Command output goes to `out`, failures to `err`. Only I/O errors on the streams
    /// themselves end the loop early.
    pub fn run<R, W, E>(&mut self, mut input: R, out: &mut W, err: &mut E) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        info!("Session started");
        if self.banner {
            writeln!(out, "{}", WELCOME)?;
            writeln!(out, "{}", EXIT_HINT)?;
            writeln!(out)?;
        }

        let mut line = String::new();
        loop {
            write!(out, "{}", self.prompt)?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                break;
            }
            if self.handle_line(line.trim(), out, err)? {
                break;
            }
        }

        writeln!(out, "{}", GOODBYE)?;
        info!("Session ended with {} nodes in the tree", self.fs.node_count());
        Ok(())
    }

    /// Parses, executes and prints one line. Returns `true` when the session should end.
    fn handle_line<W: Write, E: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        err: &mut E,
    ) -> io::Result<bool> {
        let command = match Command::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(false),
            Err(error @ CommandError::UnknownCommand { .. }) => {
                writeln!(out, "{}", error)?;
                return Ok(false);
            }
            Err(error) => {
                self.report(&error, err)?;
                return Ok(false);
            }
        };

        match self.execute(command) {
            Ok(Response::Exit) => return Ok(true),
            Ok(response) => self.print(response, out)?,
            Err(error) => {
                debug!("Command failed: {:?}", error);
                self.report(&error, err)?;
            }
        }
        Ok(false)
    }

    fn print<W: Write>(&self, response: Response, out: &mut W) -> io::Result<()> {
        match response {
            Response::Nothing | Response::Exit => {}
            Response::Text(text) => writeln!(out, "{}", text)?,
            Response::Listing(entries) => {
                for entry in entries {
                    if self.color && entry.is_directory() {
                        writeln!(out, "{}", entry.name.blue().bold())?;
                    } else {
                        writeln!(out, "{}", entry.name)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn report<E: Write>(&self, error: &dyn std::error::Error, err: &mut E) -> io::Result<()> {
        if self.color {
            writeln!(err, "{} {}", "Error:".red().bold(), error)
        } else {
            writeln!(err, "Error: {}", error)
        }
    }
}
