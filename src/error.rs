//! Library error type.
//!
//! The inference engine itself never fails; these errors come from the
//! surrounding input/output plumbing (reading samples, jq, persisted schemas).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON ({origin}) at JSON path {path}: {message}")]
    Json {
        origin: String,
        path: String,
        message: String,
    },

    #[error("invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("failed to expand glob: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("glob pattern matched no files: {0}")]
    NoMatches(String),

    #[error("stdin ('-') given more than once as input")]
    RepeatedStdin,

    #[error("JSON pointer {pointer} not found in {origin}")]
    PointerNotFound { pointer: String, origin: String },

    #[error("jq filter failed on {origin}: {message}")]
    Jq { origin: String, message: String },

    #[error("invalid schema at {path}: {message}")]
    Schema { path: String, message: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
