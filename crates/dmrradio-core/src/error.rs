//! Error types for dmrradio-core

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::codeplug::Format;
use crate::progress::ProgressError;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    // File errors
    /// Opening, reading or writing a named file failed
    #[error("{}: {}", .path.display(), .source)]
    Io {
        /// File the operation was performed on
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },
    /// I/O error on an unnamed stream
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),

    // Model resolution errors
    /// The codeplug does not declare any model known to the catalog
    #[error("unknown model in codeplug")]
    UnknownModel,
    /// The resolved model declares no frequency range known to the catalog
    #[error("unknown frequency range in codeplug")]
    UnknownFrequencyRange,
    /// The codeplug does not support the requested model/frequency pair
    #[error("codeplug does not support model {model} with frequency range \"{frequency_range}\"")]
    UnsupportedPair {
        /// Requested model
        model: String,
        /// Requested frequency range
        frequency_range: String,
    },
    /// The model name is not in the catalog
    #[error("bad model name: {0}")]
    BadModelName(String),
    /// The frequency range is not one of the model's ranges
    #[error("bad frequency range \"{frequency_range}\" for model {model}")]
    BadFrequencyRange {
        /// Model the range was requested for
        model: String,
        /// Requested frequency range
        frequency_range: String,
    },
    /// A new codeplug was requested without a model and frequency range
    #[error("a new codeplug needs an explicit model and frequency range")]
    ExplicitModelRequired,

    // Content errors
    /// Input is not valid for the stated format
    #[error("malformed {format} codeplug: {detail}")]
    Malformed {
        /// Format the content was parsed as
        format: Format,
        /// What was wrong
        detail: String,
    },
    /// A name or value cannot be written in the requested format
    #[error("cannot write {format} codeplug: {detail}")]
    Unrepresentable {
        /// Format being written
        format: Format,
        /// What could not be written
        detail: String,
    },
    /// The codeplug holds more records of a kind than the model allows
    #[error("{model} holds at most {limit} {kind} records, codeplug has {count}")]
    Capacity {
        /// Model whose limit was exceeded
        model: String,
        /// Record kind
        kind: &'static str,
        /// Model limit
        limit: usize,
        /// Records present
        count: usize,
    },
    /// The model catalog is invalid
    #[error("model catalog: {0}")]
    Catalog(String),
    /// A users file line could not be parsed
    #[error("malformed users file, line {line}: {detail}")]
    MalformedUsers {
        /// 1-based line number
        line: usize,
        /// What was wrong
        detail: String,
    },
    /// JSON encoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Spreadsheet encoding failed
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),

    // Operation errors
    /// The progress reporter asked the operation to stop
    #[error(transparent)]
    Progress(#[from] ProgressError),
    /// Radio backend error
    #[error("radio error: {0}")]
    Radio(String),
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Build a [`Error::Malformed`] for `format`
    pub fn malformed(format: Format, detail: impl Into<String>) -> Self {
        Error::Malformed {
            format,
            detail: detail.into(),
        }
    }
}

/// Result type alias using the core Error type
pub type Result<T> = std::result::Result<T, Error>;
