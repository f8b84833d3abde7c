use std::path::PathBuf;
use std::result;

use thiserror::Error;

/// Error types for the paper fetching pipeline
#[derive(Error, Debug)]
pub enum PaperFetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// XML parsing error with detailed message
    #[error("XML parsing error: {message}")]
    XmlParseError { message: String },

    /// Generic API error with HTTP status code
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    /// The search returned no article identifiers
    #[error("No papers found for query: {query}")]
    EmptyResult { query: String },

    /// Invalid query structure or parameters
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// Search limit exceeded
    /// ESearch refuses to return more than 10,000 identifiers per request.
    #[error("Search limit exceeded: requested {requested}, maximum is {maximum}")]
    SearchLimitExceeded { requested: usize, maximum: usize },

    /// Keyword configuration could not be loaded
    #[error("Invalid keyword configuration {}: {message}", path.display())]
    KeywordConfig { path: PathBuf, message: String },

    /// CSV writing failed
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// IO error for file operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PaperFetchError {
    /// Whether this error came from the network layer (either upstream call)
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PaperFetchError::RequestError(_) | PaperFetchError::ApiError { .. }
        )
    }
}

pub type Result<T> = result::Result<T, PaperFetchError>;
