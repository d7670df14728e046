use std::collections::HashMap;
use std::env as stdenv;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Snapshot of the process environment handed to spawned commands.
///
/// The environment contains:
/// - `vars`: the variables a spawned command will see, kept as raw OS strings so
///   values that are not valid UTF-8 pass through untouched.
/// - `current_dir`: the working directory the command starts in.
#[derive(Debug, Clone)]
pub struct Environment {
    /// Key-value store of environment variables (e.g., PATH, HOME, PS1).
    pub vars: HashMap<OsString, OsString>,
    /// Working directory for spawned commands.
    pub current_dir: PathBuf,
}

impl Environment {
    /// Capture the current process state.
    pub fn new() -> Self {
        let vars = stdenv::vars_os().collect();
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// Raw value of an environment variable from this snapshot.
    pub fn get_var_os(&self, key: &str) -> Option<&OsStr> {
        self.vars.get(OsStr::new(key)).map(OsString::as_os_str)
    }

    /// Value of an environment variable, if it is set and valid UTF-8.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.get_var_os(key)
            .and_then(OsStr::to_str)
            .map(str::to_string)
    }

    /// Set or override a variable in this snapshot.
    pub fn set_var(&mut self, key: impl Into<OsString>, val: impl Into<OsString>) {
        self.vars.insert(key.into(), val.into());
    }

    /// Same variables, different working directory.
    pub fn rooted_at(&self, dir: impl Into<PathBuf>) -> Self {
        Self {
            vars: self.vars.clone(),
            current_dir: dir.into(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
