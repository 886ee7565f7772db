//! Grid-world rounds behind the judgment trials.
//!
//! A round is an agent walking one of two paths to a goal past doors that
//! open and close. Recorded rounds are replayed to get their outcome; the
//! [`Model`]s then estimate how often the other path would have won, either
//! in a fresh round (hypothetical) or under the doors as they actually
//! behaved (counterfactual).

pub mod environment;
pub mod error;
pub mod model;
pub mod trials;
pub mod world;

pub use environment::{Agent, DoorChanges, Environment, Outcome, RunSummary};
pub use error::SimError;
pub use model::{Model, ModelKind};
pub use trials::{
    Predictions, SimParams, TrialRecord, TrialSpec, read_trials, simulate_trial, simulate_trials,
};
pub use world::{Action, Door, GridWorld, Location, PathColor, Tile};
