use crate::error::ReplayError;
use crate::parser::{Entry, Line};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a replay produced.
///
/// Directory sizes are recursive: every file counts towards each directory that
/// encloses it, up to and including the root. Keys are paths relative to the root,
/// the root itself being the empty path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub lines: usize,
    pub directories: usize,
    pub files: usize,
    pub total_bytes: u64,
    dir_sizes: BTreeMap<PathBuf, u64>,
}

impl Summary {
    /// Recursive size of every directory seen during the replay, ordered by path.
    pub fn dir_sizes(&self) -> impl Iterator<Item = (&Path, u64)> {
        self.dir_sizes.iter().map(|(p, s)| (p.as_path(), *s))
    }

    /// Recursive size of a single directory, relative to the root.
    pub fn dir_size(&self, dir: impl AsRef<Path>) -> Option<u64> {
        self.dir_sizes.get(dir.as_ref()).copied()
    }

    fn record_dir(&mut self, dir: &Path) {
        self.directories += 1;
        self.dir_sizes.entry(dir.to_path_buf()).or_insert(0);
    }

    fn record_file(&mut self, parent: &Path, size: u64) {
        self.files += 1;
        self.total_bytes += size;
        for dir in parent.ancestors() {
            *self.dir_sizes.entry(dir.to_path_buf()).or_insert(0) += size;
        }
    }
}

/// Replays transcript lines against a real directory.
///
/// The interpreter owns the only cursor of a run. It starts at `root` and every
/// mutation it performs happens under `root`.
///
/// Example
/// ```
/// use transcript_replay::{Interpreter, parse_line};
/// let root = tempfile::tempdir().unwrap();
/// let mut interp = Interpreter::new(root.path());
/// let line = parse_line("dir a", 1).unwrap().unwrap();
/// interp.apply(1, &line).unwrap();
/// assert!(root.path().join("a").is_dir());
/// ```
pub struct Interpreter {
    root: PathBuf,
    cursor: PathBuf,
    summary: Summary,
}

impl Interpreter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mut summary = Summary::default();
        summary.dir_sizes.insert(PathBuf::new(), 0);
        Self {
            cursor: root.clone(),
            root,
            summary,
        }
    }

    /// Absolute path of the current directory.
    pub fn cursor(&self) -> &Path {
        &self.cursor
    }

    fn relative_cursor(&self) -> &Path {
        self.cursor
            .strip_prefix(&self.root)
            .unwrap_or_else(|_| Path::new(""))
    }

    /// Apply one classified line.
    pub fn apply(&mut self, line_no: usize, line: &Line) -> Result<(), ReplayError> {
        debug!(line_no, ?line, cursor = %self.cursor.display(), "apply");
        match line {
            Line::CdRoot => self.cursor = self.root.clone(),
            Line::Ls => {}
            Line::CdUp => {
                if self.cursor == self.root {
                    return Err(ReplayError::AboveRoot { line_no });
                }
                self.cursor.pop();
            }
            Line::Cd(name) => {
                let target = self.cursor.join(name);
                if !target.is_dir() {
                    return Err(ReplayError::NoSuchDirectory {
                        line_no,
                        path: target,
                    });
                }
                self.cursor = target;
            }
            Line::Dir(name) => {
                let path = self.cursor.join(name);
                fs::create_dir(&path).map_err(|e| ReplayError::io(&path, e))?;
                let rel = self.relative_cursor().join(name);
                self.summary.record_dir(&rel);
            }
            Line::File { size, name } => {
                let path = self.cursor.join(name);
                let file = fs::File::create(&path).map_err(|e| ReplayError::io(&path, e))?;
                file.set_len(*size).map_err(|e| ReplayError::io(&path, e))?;
                let parent = self.relative_cursor().to_path_buf();
                self.summary.record_file(&parent, *size);
            }
        }
        self.summary.lines += 1;
        Ok(())
    }

    /// Replay every entry in order and stop at the first error.
    pub fn run<I>(mut self, entries: I) -> Result<Summary, ReplayError>
    where
        I: IntoIterator<Item = Result<Entry, ReplayError>>,
    {
        for entry in entries {
            let entry = entry?;
            self.apply(entry.line_no, &entry.line)?;
        }
        info!(
            lines = self.summary.lines,
            directories = self.summary.directories,
            files = self.summary.files,
            total_bytes = self.summary.total_bytes,
            "transcript replayed"
        );
        for (dir, size) in self.summary.dir_sizes() {
            let shown = Path::new("/").join(dir);
            debug!(dir = %shown.display(), size, "directory size");
        }
        Ok(self.summary)
    }
}
