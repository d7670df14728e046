//! Runtime settings, read from the environment the binary was started with.

use crate::env::Environment;

/// Variable naming the shell program to drop into.
pub const SHELL_VAR: &str = "TRANSCRIPT_REPLAY_SHELL";
/// Variable holding the log filter; `RUST_LOG` is consulted when it is unset.
pub const LOG_VAR: &str = "TRANSCRIPT_REPLAY_LOG";

const DEFAULT_SHELL: &str = "bash";
const DEFAULT_LOG_FILTER: &str = "warn";
const TEMP_PREFIX: &str = "transcript-replay-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Shell program, either a bare name looked up in PATH or a path.
    pub shell: String,
    /// Arguments passed to the shell.
    pub shell_args: Vec<String>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Prefix of the temporary directory name.
    pub temp_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            shell: DEFAULT_SHELL.to_string(),
            shell_args: vec!["-i".to_string()],
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            temp_prefix: TEMP_PREFIX.to_string(),
        }
    }
}

impl Settings {
    /// Defaults overridden by whatever the environment sets. Empty values are ignored.
    pub fn from_env(env: &Environment) -> Self {
        let non_empty = |key: &str| env.get_var(key).filter(|v| !v.trim().is_empty());

        let mut settings = Self::default();
        if let Some(shell) = non_empty(SHELL_VAR) {
            settings.shell = shell;
        }
        if let Some(filter) = non_empty(LOG_VAR).or_else(|| non_empty("RUST_LOG")) {
            settings.log_filter = filter;
        }
        settings
    }
}
