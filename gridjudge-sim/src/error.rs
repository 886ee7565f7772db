use crate::world::Location;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("grid line {line}: {reason}")]
    Grid { line: usize, reason: String },
    #[error("invalid trial list: {0}")]
    Trials(#[from] serde_json::Error),
    #[error("grid has no goal")]
    NoGoal,
    #[error("no path from {from:?} to {to:?}")]
    NoPath { from: Location, to: Location },
    #[error("`{name}` must be a probability, got {value}")]
    Probability { name: &'static str, value: f64 },
    #[error("at least one simulation is needed for a success rate")]
    NoSimulations,
}
