use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuoyDataError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    // Errors during CSV reading (inside blocking task)
    #[error("I/O error processing CSV data for file '{file}'")]
    CsvReadIo {
        file: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error processing CSV data for file '{file}'")]
    CsvReadPolars {
        file: String,
        #[source]
        source: PolarsError,
    },

    #[error("Column '{column}' not found in historical data for file '{file}'")]
    MissingColumn { file: String, column: String },

    #[error("Failed to normalize timestamps for file '{file}'")]
    TimestampParse {
        file: String,
        #[source]
        source: PolarsError,
    },

    #[error("No row with a parseable timestamp in historical data for file '{file}'")]
    EmptyDataset { file: String },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrame(#[from] PolarsError),
}
