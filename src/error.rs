use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Feed returned HTTP {status} for {url}")]
    TransportStatus { status: u16, url: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed record at index {index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Insufficient sample: {0}")]
    InsufficientSample(String),

    #[error("Degenerate parameters: {0}")]
    DegenerateParameters(String),

    #[error("Notification error: {0}")]
    Notify(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
