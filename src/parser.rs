use crate::error::ReplayError;
use regex::Regex;
use std::io::BufRead;
use std::path::{Component, Path};
use std::sync::OnceLock;

/// A single classified transcript line.
///
/// Every line of a transcript maps to exactly one variant. Classification is done on
/// the trimmed line, by exact match first and prefix match second, with anything left
/// over treated as a file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// `$ cd /`: move the cursor back to the root.
    CdRoot,
    /// `$ ls`: informational only, changes nothing.
    Ls,
    /// `$ cd ..`: move the cursor to its parent.
    CdUp,
    /// `$ cd <name>`: move the cursor into an existing subdirectory.
    Cd(String),
    /// `dir <name>`: a subdirectory of the cursor.
    Dir(String),
    /// `<size> <name>`: a file of the cursor with the given length in bytes.
    File {
        /// Length of the file in bytes.
        size: u64,
        /// File name, relative to the cursor.
        name: String,
    },
}

/// A parsed line together with its 1-based position in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub line_no: usize,
    pub line: Line,
}

fn size_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // size, first whitespace run, then the rest of the line as the name
    RE.get_or_init(|| Regex::new(r"^(\S+)\s+(.+)$").expect("static regex"))
}

/// Classify one transcript line.
///
/// Returns `Ok(None)` for blank lines. Names must be a single plain path component so
/// that nothing a transcript says can reach outside the replay root.
pub fn parse_line(raw: &str, line_no: usize) -> Result<Option<Line>, ReplayError> {
    let line = raw.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let malformed = || ReplayError::MalformedLine {
        line_no,
        line: line.to_string(),
    };

    let parsed = match line {
        "$ cd /" => Line::CdRoot,
        "$ ls" => Line::Ls,
        "$ cd .." => Line::CdUp,
        _ => {
            if let Some(name) = line.strip_prefix("dir ") {
                Line::Dir(plain_name(name).ok_or_else(malformed)?)
            } else if let Some(name) = line.strip_prefix("$ cd ") {
                Line::Cd(plain_name(name).ok_or_else(malformed)?)
            } else {
                let caps = size_line().captures(line).ok_or_else(malformed)?;
                let size = &caps[1];
                let size = size.parse::<u64>().map_err(|_| ReplayError::InvalidSize {
                    line_no,
                    size: size.to_string(),
                })?;
                Line::File {
                    size,
                    name: plain_name(&caps[2]).ok_or_else(malformed)?,
                }
            }
        }
    };
    Ok(Some(parsed))
}

fn plain_name(name: &str) -> Option<String> {
    if name.contains('/') {
        return None;
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) => part.to_str().map(str::to_string),
        _ => None,
    }
}

/// Streaming parser over a line-oriented reader.
///
/// Yields one [`Entry`] per non-blank line, in input order. Read errors and parse
/// errors are yielded as `Err` and the caller decides whether to stop.
pub struct Transcript<R> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> Transcript<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> Iterator for Transcript<R> {
    type Item = Result<Entry, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_no += 1;
                    match parse_line(&self.buf, self.line_no) {
                        Ok(Some(line)) => {
                            return Some(Ok(Entry {
                                line_no: self.line_no,
                                line,
                            }));
                        }
                        Ok(None) => continue,
                        Err(e) => return Some(Err(e)),
                    }
                }
                Err(e) => return Some(Err(ReplayError::io("<transcript>", e))),
            }
        }
    }
}
