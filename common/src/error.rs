use thiserror::Error;

// Core internal errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IoError: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Source data error: {0}")]
    SourceData(String),
    #[error("Contract violation: {0}")]
    Contract(String),
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("Tokenizer error: {0}")]
    Tokenizer(String),
}
