use serde::{Deserialize, Serialize};

/// Trial lifecycle. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrialState {
    #[default]
    Idle,
    AwaitingInteraction,
    Interacted,
    Submitted,
}

impl TrialState {
    pub fn submit_enabled(&self) -> bool {
        matches!(self, Self::Interacted)
    }

    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::AwaitingInteraction | Self::Interacted)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted)
    }

    pub fn next(&self) -> Option<Self> {
        use TrialState::*;
        Some(match self {
            Idle => AwaitingInteraction,
            AwaitingInteraction => Interacted,
            Interacted => Submitted,
            Submitted => return None,
        })
    }
}

/// Participant input delivered by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrialEvent {
    /// Slider dragged to a raw position, in slider units
    SliderMoved(f64),
    SubmitClicked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Updated,
    Completed,
    /// Not applicable in the current state
    Ignored,
    /// Delivered through a display target the trial no longer owns
    Stale,
}

/// Configuration identifier echoed back alongside the response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseEcho {
    Stimulus(String),
    Trial(String),
}

/// The single record a trial hands back to the runner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRecord {
    #[serde(flatten)]
    pub echo: ResponseEcho,
    pub response: i64,
}

impl ResponseRecord {
    pub fn for_stimulus(stimulus: impl Into<String>, response: i64) -> Self {
        Self {
            echo: ResponseEcho::Stimulus(stimulus.into()),
            response,
        }
    }

    pub fn for_trial(trial: impl Into<String>, response: i64) -> Self {
        Self {
            echo: ResponseEcho::Trial(trial.into()),
            response,
        }
    }
}
