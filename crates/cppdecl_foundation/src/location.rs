//! Source locations of declarations.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a declaration was found by the compiler front-end.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Header or source file path as reported by the front-end.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// Returns the file path with separators normalized to `/`.
    #[must_use]
    pub fn normalized_file(&self) -> String {
        normalize_path(&self.file)
    }

    /// Returns the directory part of the normalized file path.
    #[must_use]
    pub fn directory(&self) -> String {
        let file = self.normalized_file();
        match file.rfind('/') {
            Some(0) => "/".to_string(),
            Some(pos) => file[..pos].to_string(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// Normalizes a path string: `\` becomes `/`, duplicate and trailing
/// separators are dropped, and `.` segments are removed.
///
/// This is purely textual; the filesystem is never consulted.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let unified = path.replace('\\', "/");
    let absolute = unified.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in unified.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.last().is_some_and(|s| *s != "..") {
                    segments.pop();
                } else if !absolute {
                    segments.push("..");
                }
            }
            other => segments.push(other),
        }
    }
    let joined = segments.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}

/// Returns true if the path is absolute, either POSIX style or with a
/// Windows drive prefix.
#[must_use]
pub fn is_absolute_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    path.starts_with('/')
        || path.starts_with('\\')
        || (bytes.len() > 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
}
