// src/error.rs

//! Error type for the index statistics pipeline.
//!
//! The first three variants are the conditions the tool reports and then
//! finishes normally on. The rest are failures the caller should surface
//! with a non-zero exit status.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The base URL cannot be turned into a request at all.
    #[error("invalid URL \"{url}\": {reason}")]
    InvalidSource { url: String, reason: String },

    /// The bytes are not gzip, or decompression failed midstream.
    #[error("could not read index file: {0}")]
    CorruptIndex(String),

    /// SIGINT was received.
    #[error("canceled by user")]
    Cancelled,

    #[error("server returned HTTP {status} for \"{url}\"")]
    HttpStatus { url: String, status: u16 },

    #[error("request to \"{url}\" failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("I/O error during {operation} on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write result to '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn io(path: impl Into<PathBuf>, operation: &'static str, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            operation,
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    /// Whether this is one of the conditions that ends the run without a
    /// failure exit status.
    pub fn is_handled(&self) -> bool {
        matches!(
            self,
            Error::InvalidSource { .. } | Error::CorruptIndex(_) | Error::Cancelled
        )
    }
}
