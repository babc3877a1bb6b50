//! Error types for the normalization pipeline

use std::path::PathBuf;

/// Errors that abort a normalization run
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed BibTeX at line {line}: {message}")]
    Parse { line: u32, message: String },

    #[error("malformed BibTeX: {0}")]
    Syntax(#[from] crate::parser::ParseError),

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("invalid venue keyword {keyword:?}: {source}")]
    Rule {
        keyword: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
