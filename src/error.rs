use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgroError {
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Nothing to export")]
    EmptyExport,
}

impl AgroError {
    /// Errors caused by the caller's input rather than the system or provider.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AgroError::InvalidLocation(_) | AgroError::EmptyExport)
    }
}

pub type Result<T> = std::result::Result<T, AgroError>;
