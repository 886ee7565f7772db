use crate::environment::{DoorChanges, Environment, Outcome};
use crate::error::SimError;
use crate::world::PathColor;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Hypothetical,
    Counterfactual,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModelKind::Hypothetical => "hypothetical",
            ModelKind::Counterfactual => "counterfactual",
        })
    }
}

/// Estimates how often the path the agent did not take would have reached
/// the goal in time.
#[derive(Debug, Clone)]
pub struct Model {
    env: Environment,
    kind: ModelKind,
    original_runtime: u32,
    door_changes: DoorChanges,
}

impl Model {
    /// Fresh stochastic rounds on the other path
    pub fn hypothetical(env: &Environment) -> Self {
        Self::new(env, ModelKind::Hypothetical, 0, DoorChanges::new())
    }

    /// Rounds on the other path in which the doors behave as recorded for
    /// the first `original_runtime` timesteps
    pub fn counterfactual(
        env: &Environment,
        original_runtime: u32,
        door_changes: DoorChanges,
    ) -> Self {
        Self::new(env, ModelKind::Counterfactual, original_runtime, door_changes)
    }

    fn new(
        env: &Environment,
        kind: ModelKind,
        original_runtime: u32,
        door_changes: DoorChanges,
    ) -> Self {
        let mut env = env.clone();
        env.set_replay(false);
        env.switch_path();
        env.reset();
        Self {
            env,
            kind,
            original_runtime,
            door_changes,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    /// The path being simulated
    pub fn path(&self) -> PathColor {
        self.env.agent().path
    }

    pub fn simulate_once<R: Rng>(&mut self, rng: &mut R) -> Result<bool, SimError> {
        self.env.reset();
        let summary = self
            .env
            .run(rng, &self.door_changes, self.original_runtime)?;
        Ok(summary.outcome == Outcome::Won)
    }

    /// Success rate over `simulations` rounds as a whole percentage, rounded
    /// down
    pub fn simulate_all<R: Rng>(
        &mut self,
        simulations: u32,
        rng: &mut R,
    ) -> Result<u32, SimError> {
        if simulations == 0 {
            return Err(SimError::NoSimulations);
        }
        info!(model = %self.kind, path = %self.path(), simulations, "running model");

        let mut successes = 0u64;
        for i in 0..simulations {
            if i > 0 && i % 100 == 0 {
                debug!(done = i, "simulations done");
            }
            if self.simulate_once(rng)? {
                successes += 1;
            }
        }

        let rate = (successes * 100 / u64::from(simulations)) as u32;
        info!(model = %self.kind, path = %self.path(), success_rate = rate, "model finished");
        Ok(rate)
    }
}
