use std::path::{Path, PathBuf};
use thiserror::Error;

/// Reference-data load failure. Every variant is fatal for the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} is not valid UTF-8: {source}", .path.display())]
    Decode {
        path: PathBuf,
        source: std::string::FromUtf8Error,
    },

    #[error("malformed CSV in {}: {source}", .path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("{} is missing required column(s): {}", .path.display(), .missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },

    #[error("{}, line {line}: {message}", .path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("inconsistent reference data:\n  - {}", .0.join("\n  - "))]
    Inconsistent(Vec<String>),
}

impl LoadError {
    /// Short error kind shown alongside the message
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::Unreadable { .. } => "Unreadable",
            LoadError::Decode { .. } => "Decode",
            LoadError::Csv { .. } => "Csv",
            LoadError::MissingColumns { .. } => "MissingColumns",
            LoadError::InvalidRow { .. } => "InvalidRow",
            LoadError::Inconsistent(_) => "Inconsistent",
        }
    }

    /// The file that was being read, if the failure is tied to one
    pub fn path(&self) -> Option<&Path> {
        match self {
            LoadError::Unreadable { path, .. }
            | LoadError::Decode { path, .. }
            | LoadError::Csv { path, .. }
            | LoadError::MissingColumns { path, .. }
            | LoadError::InvalidRow { path, .. } => Some(path),
            LoadError::Inconsistent(_) => None,
        }
    }
}
