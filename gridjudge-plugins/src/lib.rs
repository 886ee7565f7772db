pub mod config;
pub mod instructions;
pub mod judge;
pub mod plugin;
pub mod registry;
pub mod slider;

pub use config::{JudgmentConfig, SliderConfig, SliderRange};
pub use instructions::{GridworldInstructions, InstructionPage, InstructionPageSet, gridworld};
pub use plugin::{
    HypotheticalJudgmentPlugin, JUDGMENT_TRIAL_TYPE, ParameterInfo, ParameterKind, PluginInfo,
    SLIDER_TRIAL_TYPE, SliderTrialPlugin, TrialPlugin,
};
pub use registry::PluginRegistry;
pub use slider::{LabelPlacement, SliderScreen, SliderTrial, label_placements};
