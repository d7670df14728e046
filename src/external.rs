use crate::command::{ExecutableCommand, ExitCode};
use crate::env::Environment;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tracing::debug;

/// A program launched as a child process with inherited stdio.
#[derive(Debug)]
pub struct ExternalCommand {
    name: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(name: impl Into<OsString>, args: Vec<OsString>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }

    /// Resolve `name` against the `PATH` of `env` and build a command for it.
    ///
    /// Returns `None` when no executable by that name can be found.
    pub fn resolve(env: &Environment, name: &str, args: &[&str]) -> Option<Self> {
        let search_paths = env.get_var_os("PATH").unwrap_or_default();
        let executable = find_command_path(search_paths, Path::new(name))?;
        Some(Self::new(
            executable.as_os_str().to_owned(),
            args.iter().map(|x| x.into()).collect(),
        ))
    }

    pub fn program(&self) -> &OsStr {
        &self.name
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }
}

impl ExecutableCommand for ExternalCommand {
    fn execute(self: Box<Self>, env: &Environment) -> Result<ExitCode> {
        debug!(program = ?self.name, args = ?self.args, cwd = %env.current_dir.display(), "spawning");
        let mut child = std::process::Command::new(&self.name)
            .args(&self.args)
            .env_clear()
            .envs(&env.vars)
            .current_dir(&env.current_dir)
            .spawn()
            .with_context(|| format!("failed to spawn {:?}", self.name))?;
        let exit_status = child
            .wait()
            .with_context(|| format!("failed to wait for {:?}", self.name))?;
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command path the way a typical shell would.
///
/// Behavior:
/// - Absolute path: returns it if it exists.
/// - `./foo` or any path with several components: returns it if it exists.
/// - Single path component (no separators): search each directory in `search_paths` (PATH)
///   and return the first existing match.
/// - Empty path: returns `None`.
pub fn find_command_path<'a>(search_paths: &OsStr, path: &'a Path) -> Option<Cow<'a, Path>> {
    if path.is_absolute() {
        return find_by_path(path).map(Cow::Borrowed);
    }

    let mut components = path.components();
    match (components.next(), components.next()) {
        (None, None) => None,
        (Some(x), None) => find_in_path(search_paths, x.as_os_str()).map(Cow::Owned),
        _ => find_by_path(path).map(Cow::Borrowed),
    }
}

fn find_in_path(search_paths: &OsStr, cmd: &OsStr) -> Option<PathBuf> {
    std::env::split_paths(search_paths)
        .map(|dir| dir.join(cmd))
        .find(|path| path.is_file())
}

fn find_by_path(path: &Path) -> Option<&Path> {
    if path.exists() { Some(path) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs::File;
    use tempfile::TempDir;

    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    #[cfg(unix)]
    fn test_absolute_existing() {
        let path = Path::new("/bin/sh");
        let found = find_command_path(osstr("/bin"), path).expect("Expected to find /bin/sh");
        assert_eq!(found.as_ref(), path);
    }

    #[test]
    #[cfg(unix)]
    fn test_absolute_nonexisting() {
        let res = find_command_path(osstr("/bin"), Path::new("/bin/nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_single_component_found_in_path() {
        let found = find_command_path(osstr("/nope:/bin"), Path::new("sh"))
            .expect("Expected to find 'sh' in /bin via PATH search");
        assert_eq!(found.as_ref(), Path::new("/bin/sh"));
    }

    #[test]
    fn test_single_component_not_found_in_path() {
        let tmp = TempDir::new().unwrap();
        let res = find_command_path(tmp.path().as_os_str(), Path::new("nonexisting"));
        assert!(res.is_none());
    }

    #[test]
    fn test_multiple_components_use_the_path_as_is() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("bin")).unwrap();
        let file_path = tmp.path().join("bin").join("tool");
        File::create(&file_path).unwrap();

        let found = find_command_path(osstr("/does/not/matter"), &file_path).unwrap();
        assert_eq!(found.as_ref(), file_path.as_path());
    }

    #[test]
    fn test_empty_path_is_none() {
        assert!(find_command_path(osstr("/bin"), Path::new("")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_uses_env_and_cwd() {
        let tmp = TempDir::new().unwrap();
        let mut vars: HashMap<OsString, OsString> = HashMap::new();
        vars.insert("PATH".into(), "/usr/bin:/bin".into());
        vars.insert("MARKER".into(), "yes".into());
        let env = Environment {
            vars,
            current_dir: tmp.path().to_path_buf(),
        };

        let cmd = ExternalCommand::resolve(
            &env,
            "sh",
            &["-c", "test \"$MARKER\" = yes && touch here"],
        )
        .unwrap();
        let code = Box::new(cmd).execute(&env).unwrap();

        assert_eq!(code, 0);
        assert!(tmp.path().join("here").exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_reports_exit_code() {
        let env = Environment::new();
        let cmd = ExternalCommand::resolve(&env, "sh", &["-c", "exit 3"]).unwrap();
        assert_eq!(Box::new(cmd).execute(&env).unwrap(), 3);
    }

    #[test]
    #[cfg(unix)]
    fn test_execute_passes_non_utf8_values_through() {
        use std::os::unix::ffi::OsStrExt;

        let tmp = TempDir::new().unwrap();
        let mut env = Environment {
            vars: HashMap::new(),
            current_dir: tmp.path().to_path_buf(),
        };
        env.set_var("PATH", "/usr/bin:/bin");
        env.set_var("BYTES", OsStr::from_bytes(b"caf\xe9"));

        let cmd = ExternalCommand::resolve(
            &env,
            "sh",
            &["-c", "printf '%s' \"$BYTES\" > out"],
        )
        .unwrap();
        assert_eq!(Box::new(cmd).execute(&env).unwrap(), 0);
        assert_eq!(std::fs::read(tmp.path().join("out")).unwrap(), b"caf\xe9");
    }
}
