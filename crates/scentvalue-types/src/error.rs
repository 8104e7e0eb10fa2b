//! Error types for scentvalue

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("No API key configured (set GEMINI_API_KEY or api_key in config)")]
    MissingApiKey,

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Camera acquisition errors
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Camera permission denied: {0}")]
    PermissionDenied(String),

    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("Camera session already released")]
    Released,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("AI service error: {0}")]
    Ai(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),

    #[error("Invalid weight: {0}")]
    InvalidWeight(String),

    #[error("Ledger entry not found: {0}")]
    EntryNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid image format: {0}")]
    InvalidImageFormat(String),

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("PDF export error: {0}")]
    Pdf(String),

    #[error("Ledger store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, Error>;
