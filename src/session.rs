use crate::command::{ExecutableCommand, ExitCode};
use crate::config::Settings;
use crate::env::Environment;
use crate::error::ReplayError;
use crate::interpreter::{Interpreter, Summary};
use crate::parser::Transcript;
use crate::shell;
use std::fs;
use std::io::{BufRead, ErrorKind};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// One replay run: a private temporary directory and the tree built inside it.
///
/// The directory is removed when the session is dropped, whichever way the run
/// ends. [`Session::close`] does the same but reports failures.
pub struct Session {
    dir: TempDir,
    root: PathBuf,
}

impl Session {
    /// Create an empty temporary root.
    pub fn create(settings: &Settings) -> Result<Self, ReplayError> {
        let dir = tempfile::Builder::new()
            .prefix(&settings.temp_prefix)
            .tempdir()
            .map_err(|e| ReplayError::io(std::env::temp_dir(), e))?;
        let root = fs::canonicalize(dir.path()).map_err(|e| ReplayError::io(dir.path(), e))?;
        info!(root = %root.display(), "created session root");
        Ok(Self { dir, root })
    }

    /// Canonical path of the temporary root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Parse `reader` as a transcript and replay it under the root.
    pub fn materialize<R: BufRead>(&self, reader: R) -> Result<Summary, ReplayError> {
        Interpreter::new(&self.root).run(Transcript::new(reader))
    }

    /// Hand control to `command`, started in the root with the replay prompt.
    pub fn launch(
        &self,
        command: Box<dyn ExecutableCommand>,
        base: &Environment,
    ) -> anyhow::Result<ExitCode> {
        let env = shell::shell_environment(base, &self.root);
        let code = command.execute(&env)?;
        info!(code, "shell exited");
        Ok(code)
    }

    /// Remove the temporary root now. A root that is already gone is not an error.
    pub fn close(self) -> Result<(), ReplayError> {
        let root = self.root.clone();
        match self.dir.close() {
            Ok(()) => {
                debug!(root = %root.display(), "removed session root");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(root = %root.display(), "session root already removed");
                Ok(())
            }
            Err(e) => Err(ReplayError::io(root, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::ffi::OsString;
    use std::io::Cursor;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Option<Environment>>>,
        code: ExitCode,
    }

    impl ExecutableCommand for Recorder {
        fn execute(self: Box<Self>, env: &Environment) -> anyhow::Result<ExitCode> {
            *self.seen.borrow_mut() = Some(env.clone());
            Ok(self.code)
        }
    }

    fn base_env() -> Environment {
        let mut vars = HashMap::new();
        vars.insert(OsString::from("KEEP"), OsString::from("me"));
        Environment {
            vars,
            current_dir: PathBuf::from("/"),
        }
    }

    #[test]
    fn test_root_is_canonical_and_empty() {
        let session = Session::create(&Settings::default()).unwrap();
        let root = session.root().to_path_buf();
        assert_eq!(fs::canonicalize(&root).unwrap(), root);
        assert!(
            root.file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("transcript-replay-")
        );
        assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    }

    #[test]
    fn test_drop_removes_root() {
        let session = Session::create(&Settings::default()).unwrap();
        session.materialize(Cursor::new("dir a\n10 b\n")).unwrap();
        let root = session.root().to_path_buf();
        assert!(root.join("a").is_dir());

        drop(session);
        assert!(!root.exists());
    }

    #[test]
    fn test_root_removed_after_failed_replay() {
        let root;
        {
            let session = Session::create(&Settings::default()).unwrap();
            root = session.root().to_path_buf();
            let err = session.materialize(Cursor::new("dir a\n$ cd ..\n"));
            assert!(err.is_err());
        }
        assert!(!root.exists());
    }

    #[test]
    fn test_close_tolerates_missing_root() {
        let session = Session::create(&Settings::default()).unwrap();
        let root = session.root().to_path_buf();
        fs::remove_dir_all(&root).unwrap();

        session.close().unwrap();
        assert!(!root.exists());
    }

    #[test]
    fn test_drop_tolerates_missing_root() {
        let session = Session::create(&Settings::default()).unwrap();
        fs::remove_dir_all(session.root()).unwrap();
        drop(session);
    }

    #[test]
    fn test_launch_runs_in_root_with_prompt() {
        let session = Session::create(&Settings::default()).unwrap();
        let seen = Rc::new(RefCell::new(None));
        let recorder = Recorder {
            seen: seen.clone(),
            code: 42,
        };

        let code = session.launch(Box::new(recorder), &base_env()).unwrap();
        assert_eq!(code, 42);

        let env = seen.borrow().clone().unwrap();
        assert_eq!(env.current_dir, session.root());
        assert_eq!(env.get_var("KEEP"), Some("me".to_string()));
        assert_eq!(env.get_var("PS1"), Some(shell::prompt(session.root())));
    }
}
