//! Line-oriented command shell over a [`FileSystem`](crate::filesystem::FileSystem).
//!
//! A line is tokenized (quotes group whitespace), parsed into a `Command`, executed by a
//! [`Session`], and its result printed. Failures are reported and the session carries on.

mod command;
mod session;
mod tokenizer;

pub use session::Session;
