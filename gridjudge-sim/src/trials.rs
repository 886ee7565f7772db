use crate::environment::{Agent, DoorChanges, Environment, Outcome};
use crate::error::SimError;
use crate::model::Model;
use crate::world::{GridWorld, PathColor};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::info;

/// One recorded round from the trial list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialSpec {
    pub num: u32,
    /// Path the player took
    pub path: PathColor,
    #[serde(default)]
    pub door_changes: DoorChanges,
}

pub fn read_trials(reader: impl Read) -> Result<Vec<TrialSpec>, SimError> {
    Ok(serde_json::from_reader(reader)?)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimParams {
    pub prob_stall: f64,
    pub prob_door: f64,
    pub time_limit: u32,
    pub n_simulations: u32,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            prob_stall: 0.12,
            prob_door: 0.19,
            time_limit: 10,
            n_simulations: 1000,
        }
    }
}

impl SimParams {
    pub fn validate(&self) -> Result<(), SimError> {
        for (name, value) in [("prob_stall", self.prob_stall), ("prob_door", self.prob_door)] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SimError::Probability { name, value });
            }
        }
        Ok(())
    }
}

/// Which model predictions to add to each record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Predictions {
    pub counterfactual: bool,
    pub hypothetical: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: u32,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cf_success_rate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hyp_success_rate: Option<u32>,
}

/// Replay one recorded round in `world`, then run the requested models on
/// the other path. The random stream is seeded with the trial number, so a
/// trial always yields the same record.
pub fn simulate_trial(
    spec: &TrialSpec,
    world: GridWorld,
    params: &SimParams,
    predictions: Predictions,
) -> Result<TrialRecord, SimError> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(u64::from(spec.num));

    let mut env = Environment::replaying(world, Agent::new(spec.path, params.prob_stall));
    let baseline = env.run(&mut rng, &spec.door_changes, 0)?;
    info!(
        trial = spec.num,
        path = %spec.path,
        outcome = ?baseline.outcome,
        timesteps = baseline.timesteps,
        "replayed trial"
    );

    let mut record = TrialRecord {
        trial: spec.num,
        outcome: baseline.outcome,
        cf_success_rate: None,
        hyp_success_rate: None,
    };
    if predictions.counterfactual {
        let mut cf = Model::counterfactual(&env, baseline.timesteps, spec.door_changes.clone());
        record.cf_success_rate = Some(cf.simulate_all(params.n_simulations, &mut rng)?);
    }
    if predictions.hypothetical {
        let mut hyp = Model::hypothetical(&env);
        record.hyp_success_rate = Some(hyp.simulate_all(params.n_simulations, &mut rng)?);
    }
    Ok(record)
}

/// Simulate every trial in `specs`, or only trial `only`, reading each grid
/// from `<grid_dir>/<num>.txt`
pub fn simulate_trials(
    specs: &[TrialSpec],
    grid_dir: &Path,
    params: &SimParams,
    predictions: Predictions,
    only: Option<u32>,
) -> Result<Vec<TrialRecord>, SimError> {
    params.validate()?;
    specs
        .iter()
        .filter(|spec| only.is_none_or(|num| num == spec.num))
        .map(|spec| {
            let world = GridWorld::read_world(
                grid_dir,
                &spec.num.to_string(),
                params.prob_door,
                params.time_limit,
            )?;
            simulate_trial(spec, world, params, predictions)
        })
        .collect()
}
