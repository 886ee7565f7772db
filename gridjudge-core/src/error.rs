use thiserror::Error;

/// Raised synchronously while preparing a trial, before anything is displayed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("missing required parameter `{0}`")]
    Missing(&'static str),
    #[error("slider range is empty: min={min} max={max}")]
    EmptyRange { min: i64, max: i64 },
    #[error("slider step must be positive, got {0}")]
    NonPositiveStep(i64),
    #[error("slider needs zero or at least two labels, got one")]
    SingleLabel,
    #[error("slider width must be positive")]
    ZeroWidth,
    #[error("trial id `{0}` cannot be used in an asset path")]
    InvalidTrialId(String),
    #[error("invalid parameters for `{plugin}`: {reason}")]
    InvalidParameters { plugin: String, reason: String },
    #[error("unknown trial type `{0}`")]
    UnknownTrialType(String),
}
