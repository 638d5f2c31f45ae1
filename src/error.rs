use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Unsupported weight unit: {0}")]
    UnsupportedUnit(String),

    #[error("Invalid data for '{item}': {reason}")]
    InvalidData { item: String, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No items to plan with")]
    EmptyItemSet,

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FeedError {
    pub fn invalid_data(item: &str, reason: impl Into<String>) -> Self {
        FeedError::InvalidData {
            item: item.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FeedError>;
