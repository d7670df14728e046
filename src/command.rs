use crate::env::Environment;
use anyhow::Result;

/// Conventional process exit code type used by this crate.
///
/// A value of 0 indicates success; any non-zero value indicates failure.
pub type ExitCode = i32;

/// Object-safe trait for anything a session can hand control to once the tree is built.
///
/// The interactive shell is the usual implementor; tests plug in non-interactive
/// commands to inspect the tree and the environment they were given.
pub trait ExecutableCommand {
    /// Run the command to completion in the given environment.
    fn execute(self: Box<Self>, env: &Environment) -> Result<ExitCode>;
}
