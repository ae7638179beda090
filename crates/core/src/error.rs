use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubekitError {
    #[error("Please provide the video script or summary")]
    EmptyContent,

    #[error("No content to export")]
    NothingToExport,

    #[error("Title #{index} does not exist (have {available})")]
    NoSuchTitle { index: usize, available: usize },

    #[error("Missing API key: set {env_var} in {secrets_path} or as an environment variable")]
    MissingApiKey {
        env_var: String,
        secrets_path: PathBuf,
    },

    #[error("Invalid secrets file {path}: {reason}")]
    InvalidSecrets { path: PathBuf, reason: String },

    #[error("HTTP client setup failed: {0}")]
    ClientSetup(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TubekitError>;
