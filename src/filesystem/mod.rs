//! In-memory filesystem tree.
//!
//! Nodes live in a slot arena and refer to each other by id: directories own their children
//! through insertion-ordered maps, and every node keeps a non-owning link to its parent for
//! `..` navigation and full-path reconstruction.

mod node;
mod tree;

pub use tree::{DirEntry, FileSystem, FileSystemError};
