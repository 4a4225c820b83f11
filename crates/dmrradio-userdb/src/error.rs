//! Error types for dmrradio-userdb

use dmrradio_core::progress::ProgressError;
use thiserror::Error;

/// User database errors
#[derive(Debug, Error)]
pub enum UserDbError {
    /// Reading or writing a users file failed
    #[error(transparent)]
    Core(#[from] dmrradio_core::Error),

    /// The progress reporter asked the download to stop
    #[error(transparent)]
    Progress(#[from] ProgressError),

    /// HTTP request failed
    #[error("{url}: {source}")]
    Http {
        /// Requested URL
        url: String,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },

    /// A local source could not be read
    #[error("{path}: {source}")]
    Read {
        /// Source path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Downloaded data is not in the expected format
    #[error("{url}: unexpected user data: {detail}")]
    Format {
        /// Source the data came from
        url: String,
        /// What was wrong
        detail: String,
    },
}

/// Result type alias for user database operations
pub type Result<T> = std::result::Result<T, UserDbError>;
