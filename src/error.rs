use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScannerError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("rate limited by remote API (HTTP 429)")]
    RateLimited,

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("fetch failed after {attempts} attempt(s): {message}")]
    FetchFailed { attempts: u32, message: String },

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),

    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, ScannerError>;
