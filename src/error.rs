use thiserror::Error;

#[derive(Debug, Error)]
pub enum MixError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Degenerate result: every decoded proportion is zero")]
    DegenerateResult,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, MixError>;
