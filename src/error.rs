use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Storage backend unavailable: {0}")]
    Unavailable(String),

    #[error("Browser storage error: {0}")]
    Web(String),
}

#[derive(Error, Debug)]
pub enum CurriculumError {
    #[error("Could not fetch curriculum: {0}")]
    Fetch(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid activity content in {context}: {reason}")]
    InvalidContent { context: String, reason: String },
}
