//! Slider-response trials and onboarding content for the grid-world
//! hypothetical-judgment experiment.
//!
//! A host owns a [`DisplayTarget`], starts trials through a
//! [`PluginRegistry`] (or a plugin directly), forwards participant input as
//! [`TrialEvent`]s, and receives exactly one [`ResponseRecord`] per trial
//! through its [`Completion`].
//!
//! The [`sim`] crate replays the recorded grid-world rounds the judgment
//! trials show and estimates the model success rates they are compared with.

pub mod session;

pub use gridjudge_core::{
    Completion, ConfigError, Container, DisplayTarget, Element, EventOutcome, MountToken, Node,
    ResponseEcho, ResponseRecord, TrialEvent, TrialState,
};
pub use gridjudge_plugins::{
    GridworldInstructions, HypotheticalJudgmentPlugin, InstructionPage, InstructionPageSet,
    JudgmentConfig, PluginInfo, PluginRegistry, SliderConfig, SliderRange, SliderScreen,
    SliderTrial, SliderTrialPlugin, TrialPlugin, gridworld, judge, label_placements, slider,
};
pub use gridjudge_sim as sim;
pub use session::{Session, SkippedStep, TrialStep, load_trial_steps};
