//! `key=value` env files parsed into a local map.
//!
//! Nothing here touches the process environment: values are handed to the
//! configuration resolver, which decides precedence.

#![allow(missing_docs)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::errors::{Result, ShnError};

/// A non-empty line that was neither a comment nor a `key=value` pair.
/// Whitespace-only lines land here too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub content: String,
}

/// Parsed contents of an env file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    pub path: PathBuf,
    vars: BTreeMap<String, String>,
    skipped: Vec<SkippedLine>,
}

impl EnvFile {
    /// Read and parse the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ShnError::io(path, source))?;
        Self::parse(path, &raw)
    }

    /// Parse env-file text. Later duplicates of a key win.
    pub fn parse(path: &Path, contents: &str) -> Result<Self> {
        let mut file = Self {
            path: path.to_path_buf(),
            ..Self::default()
        };

        for (idx, line) in contents.lines().enumerate() {
            let line_no = idx + 1;
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                file.skipped.push(SkippedLine {
                    line: line_no,
                    content: line.to_string(),
                });
                continue;
            };

            let key = key.trim();
            let value = value.trim();
            if key.is_empty() {
                return Err(ShnError::EnvFile {
                    path: file.path,
                    line: line_no,
                    details: "empty variable name".to_string(),
                });
            }
            if key.contains('\0') || value.contains('\0') {
                return Err(ShnError::EnvFile {
                    path: file.path,
                    line: line_no,
                    details: format!("variable {key:?} contains a NUL byte"),
                });
            }
            file.vars.insert(key.to_string(), value.to_string());
        }

        Ok(file)
    }

    /// Value for `key`, if the file set it.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Malformed lines, in file order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}
