//! Replays a recorded toy shell session into a real directory tree.
//!
//! A transcript is a list of `$ cd`, `$ ls`, `dir <name>` and `<size> <name>` lines, as
//! printed by a session against some filesystem. This crate parses such a transcript,
//! recreates the directories and size-only files it describes inside a private
//! temporary directory, and hands that directory to an interactive shell.
//!
//! The building blocks:
//! - [`parse_line`] and [`Transcript`] classify lines.
//! - [`Interpreter`] applies them to disk, holding the single cursor of a run.
//! - [`Session`] owns the temporary root and removes it when dropped.
//! - [`shell`] prepares the interactive shell and its prompt.

pub mod command;
pub mod config;
pub mod env;
mod error;
pub mod external;
mod interpreter;
pub mod logging;
mod parser;
mod session;
pub mod shell;

pub use error::ReplayError;
pub use interpreter::{Interpreter, Summary};
pub use parser::{Entry, Line, Transcript, parse_line};
pub use session::Session;

/// Transcript used when no input file is given.
pub const DEFAULT_TRANSCRIPT: &str = include_str!("../input/default_transcript.txt");
