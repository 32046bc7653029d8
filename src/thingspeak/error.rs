use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ThingSpeakError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read feed payload from {0}")]
    BodyRead(String, #[source] reqwest::Error),

    #[error("Failed to decode feed payload from {url}")]
    FeedDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Cannot merge into an empty dataset")]
    EmptyDataset,

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
