use snafu::{ResultExt, Snafu};

use super::tokenizer::{TokenizeError, tokenize};

const REDIRECT: &str = ">";

/// A parsed shell command, ready to be executed against a filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mkdir { path: String },
    Cd { path: String },
    Ls { path: Option<String> },
    Pwd,
    Touch { name: String },
    Cat { name: String },
    Echo { content: String, name: String },
    Cp { source: String, destination: String },
    Mv { source: String, destination: String },
    Rm { path: String },
    Exit,
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let mut tokens = tokenize(line).context(TokenizeSnafu)?;
        if tokens.is_empty() {
            return Ok(None);
        }
        let verb = tokens.remove(0);
        Self::from_tokens(&verb, tokens).map(Some)
    }

    fn from_tokens(verb: &str, args: Vec<String>) -> Result<Self, CommandError> {
        let usage = |usage: &'static str| -> Result<Self, CommandError> {
            UsageSnafu { usage }.fail()
        };

        match (verb, args.as_slice()) {
            ("pwd", []) => Ok(Command::Pwd),
            ("exit", []) => Ok(Command::Exit),
            ("ls", []) => Ok(Command::Ls { path: None }),
            ("ls", [path]) => Ok(Command::Ls {
                path: Some(path.clone()),
            }),
            ("mkdir", [path]) => Ok(Command::Mkdir { path: path.clone() }),
            ("cd", [path]) => Ok(Command::Cd { path: path.clone() }),
            ("touch", [name]) => Ok(Command::Touch { name: name.clone() }),
            ("cat", [name]) => Ok(Command::Cat { name: name.clone() }),
            ("rm", [path]) => Ok(Command::Rm { path: path.clone() }),
            ("cp", [source, destination]) => Ok(Command::Cp {
                source: source.clone(),
                destination: destination.clone(),
            }),
            ("mv", [source, destination]) => Ok(Command::Mv {
                source: source.clone(),
                destination: destination.clone(),
            }),
            ("echo", [words @ .., redirect, name])
                if redirect == REDIRECT && !words.is_empty() =>
            {
                Ok(Command::Echo {
                    content: words.join(" "),
                    name: name.clone(),
                })
            }
            ("pwd", _) => usage("pwd"),
            ("exit", _) => usage("exit"),
            ("ls", _) => usage("ls [path]"),
            ("mkdir", _) => usage("mkdir <path>"),
            ("cd", _) => usage("cd <path>"),
            ("touch", _) => usage("touch <name>"),
            ("cat", _) => usage("cat <name>"),
            ("rm", _) => usage("rm <path>"),
            ("cp", _) => usage("cp <source> <destination>"),
            ("mv", _) => usage("mv <source> <destination>"),
            ("echo", _) => usage("echo <words...> > <name>"),
            _ => UnknownCommandSnafu { command: verb }.fail(),
        }
    }
}

#[derive(Debug, Snafu, PartialEq, Eq)]
pub enum CommandError {
    #[snafu(display("Unknown command: {}", command))]
    UnknownCommand { command: String },
    #[snafu(display("usage: {}", usage))]
    Usage { usage: &'static str },
    #[snafu(display("Failed to parse the command line: {}", source))]
    Tokenize { source: TokenizeError },
}
