use thiserror::Error;

#[derive(Error, Debug)]
pub enum CastPlanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal planner error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, CastPlanError>;
