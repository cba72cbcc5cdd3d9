use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can stop an import. All variants are terminal.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Usage: recipe-import <path-to-csv>")]
    Usage,

    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// Server answered with a non-2xx status. `body` is the raw response text.
    #[error("{}", status.as_u16())]
    Http { status: StatusCode, body: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

pub type Result<T, E = ImportError> = std::result::Result<T, E>;
