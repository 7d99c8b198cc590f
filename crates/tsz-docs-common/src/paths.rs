//! Lexically normalized, forward-slash paths.
//!
//! The documentation model never touches the file system. Paths are compared
//! and de-duplicated purely by their normalized text, which keeps serialized
//! output identical across platforms.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute path with `/` separators and no `.` or `..` segments.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedPath(String);

impl NormalizedPath {
    /// Normalize `path`. Relative paths are kept relative but still cleaned.
    pub fn new(path: &str) -> Self {
        Self(normalize(path))
    }

    /// Resolve `path` against `base` (a directory), like `path.resolve`.
    pub fn resolve(base: &str, path: &str) -> Self {
        let path = path.replace('\\', "/");
        if is_absolute(&path) {
            Self::new(&path)
        } else {
            Self::new(&format!("{}/{}", base.replace('\\', "/"), path))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_absolute(&self) -> bool {
        is_absolute(&self.0)
    }

    /// Directory portion, `/` for a root-level file.
    pub fn dirname(&self) -> &str {
        match self.0.rfind('/') {
            Some(0) => "/",
            Some(idx) => &self.0[..idx],
            None => ".",
        }
    }

    /// Final segment.
    pub fn basename(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Path of `self` relative to the directory `from`.
    ///
    /// Both paths are expected to be absolute; if they do not share a root the
    /// absolute path is returned unchanged.
    pub fn relative_to(&self, from: &str) -> String {
        let from = normalize(from);
        if !is_absolute(&from) || !self.is_absolute() || root_of(&from) != root_of(&self.0) {
            return self.0.clone();
        }
        let from_parts: Vec<&str> = segments(&from).collect();
        let to_parts: Vec<&str> = segments(&self.0).collect();
        let common = from_parts
            .iter()
            .zip(&to_parts)
            .take_while(|(a, b)| a == b)
            .count();
        let mut out: Vec<&str> = Vec::new();
        out.extend(std::iter::repeat_n("..", from_parts.len() - common));
        out.extend(&to_parts[common..]);
        if out.is_empty() {
            ".".to_string()
        } else {
            out.join("/")
        }
    }
}

impl fmt::Debug for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NormalizedPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Split a file name into stem and extension (extension includes the dot).
pub fn split_extension(file: &str) -> (&str, &str) {
    match file.rfind('.') {
        Some(0) | None => (file, ""),
        Some(idx) => (&file[..idx], &file[idx..]),
    }
}

fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || has_drive_prefix(path)
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn root_of(path: &str) -> &str {
    if has_drive_prefix(path) { &path[..2] } else { "/" }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    let body = if has_drive_prefix(path) { &path[2..] } else { path };
    body.split('/').filter(|s| !s.is_empty())
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    let (prefix, absolute) = if has_drive_prefix(&path) {
        (path[..2].to_ascii_uppercase(), true)
    } else {
        (String::new(), path.starts_with('/'))
    };

    let mut stack: Vec<&str> = Vec::new();
    for seg in segments(&path) {
        match seg {
            "." => {}
            ".." => {
                if matches!(stack.last(), Some(last) if *last != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            _ => stack.push(seg),
        }
    }

    let joined = stack.join("/");
    if absolute {
        format!("{prefix}/{joined}")
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
#[path = "../tests/paths_tests.rs"]
mod tests;
