use anyhow::{Context, Result};
use gridjudge_core::{
    Completion, ConfigError, DisplayTarget, EventOutcome, ResponseRecord, TrialEvent,
};
use gridjudge_plugins::{PluginRegistry, SliderTrial};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::{Read, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{info, warn};

/// One entry of a trial list: the trial type plus that plugin's parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialStep {
    #[serde(rename = "type")]
    pub trial_type: String,
    #[serde(flatten)]
    pub params: Map<String, Value>,
}

impl TrialStep {
    /// `params` must be a JSON object, as in a trial list entry
    pub fn new(trial_type: impl Into<String>, params: Value) -> Result<Self, ConfigError> {
        let trial_type = trial_type.into();
        match params {
            Value::Object(params) => Ok(Self { trial_type, params }),
            other => Err(ConfigError::InvalidParameters {
                plugin: trial_type,
                reason: format!("expected a JSON object of parameters, got `{other}`"),
            }),
        }
    }
}

/// Parse a JSON array of trial steps
pub fn load_trial_steps(reader: impl Read) -> Result<Vec<TrialStep>> {
    serde_json::from_reader(reader).context("failed to parse trial list")
}

/// A step that failed validation and was never shown
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedStep {
    pub index: usize,
    pub trial_type: String,
    pub error: ConfigError,
}

/// Runs a list of trial steps one after another on a single display target
#[derive(Debug)]
pub struct Session {
    registry: PluginRegistry,
    steps: Vec<TrialStep>,
    next: usize,
    active: Option<(usize, SliderTrial)>,
    results: Vec<ResponseRecord>,
    skipped: Vec<SkippedStep>,
    tx: Sender<ResponseRecord>,
    rx: Receiver<ResponseRecord>,
}

impl Session {
    pub fn new(registry: PluginRegistry, steps: Vec<TrialStep>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            registry,
            steps,
            next: 0,
            active: None,
            results: Vec::new(),
            skipped: Vec::new(),
            tx,
            rx,
        }
    }

    /// Start the next step that validates. Steps with bad configuration are
    /// logged and skipped. Returns the index of the started step, or `None`
    /// once the list is exhausted.
    pub fn advance(&mut self, target: &mut dyn DisplayTarget) -> Option<usize> {
        if let Some((index, _)) = &self.active {
            return Some(*index);
        }

        while self.next < self.steps.len() {
            let index = self.next;
            self.next += 1;
            let step = &self.steps[index];

            let tx = self.tx.clone();
            let completion = Completion::new(move |record| {
                let _ = tx.send(record);
            });
            let params = Value::Object(step.params.clone());

            match self
                .registry
                .start(&step.trial_type, target, &params, completion)
            {
                Ok(trial) => {
                    info!(index, trial_type = %step.trial_type, "trial started");
                    self.active = Some((index, trial));
                    return Some(index);
                }
                Err(error) => {
                    warn!(index, trial_type = %step.trial_type, %error, "skipping trial");
                    self.skipped.push(SkippedStep {
                        index,
                        trial_type: step.trial_type.clone(),
                        error,
                    });
                }
            }
        }

        info!(
            completed = self.results.len(),
            skipped = self.skipped.len(),
            "session finished"
        );
        None
    }

    /// Forward a participant event to the running trial. A completed trial's
    /// record is collected and the next step is started.
    pub fn handle_event(
        &mut self,
        target: &mut dyn DisplayTarget,
        event: TrialEvent,
    ) -> EventOutcome {
        let Some((_, trial)) = self.active.as_mut() else {
            return EventOutcome::Ignored;
        };

        let outcome = trial.handle_event(target, event);
        if outcome == EventOutcome::Completed {
            self.results.extend(self.rx.try_iter());
            self.active = None;
            self.advance(target);
        }
        outcome
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|(index, _)| *index)
    }

    pub fn active_trial(&self) -> Option<&SliderTrial> {
        self.active.as_ref().map(|(_, trial)| trial)
    }

    pub fn is_finished(&self) -> bool {
        self.active.is_none() && self.next >= self.steps.len()
    }

    pub fn results(&self) -> &[ResponseRecord] {
        &self.results
    }

    pub fn skipped(&self) -> &[SkippedStep] {
        &self.skipped
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn write_results(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, &self.results).context("failed to write results")
    }
}
