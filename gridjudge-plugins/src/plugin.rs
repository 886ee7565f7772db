use crate::config::{JudgmentConfig, SliderConfig};
use crate::judge::start_judgment;
use crate::slider::{SliderScreen, SliderTrial};
use gridjudge_core::{Completion, ConfigError, DisplayTarget, ResponseEcho};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterKind {
    Int,
    String,
    HtmlString,
}

/// Describes one parameter a plugin reads from its trial configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    pub name: &'static str,
    pub pretty_name: &'static str,
    pub kind: ParameterKind,
    pub array: bool,
    /// `None` marks a required parameter
    pub default: Option<&'static str>,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PluginInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: &'static [ParameterInfo],
}

impl PluginInfo {
    pub fn parameter(&self, name: &str) -> Option<&ParameterInfo> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// A trial type the runner can start by name
pub trait TrialPlugin {
    fn info(&self) -> &'static PluginInfo;

    /// Parse `params`, validate them, then take over `target`
    fn start(
        &self,
        target: &mut dyn DisplayTarget,
        params: &Value,
        completion: Completion,
    ) -> Result<SliderTrial, ConfigError>;

    fn trial_type(&self) -> &'static str {
        self.info().name
    }
}

pub(crate) fn parse_params<T: DeserializeOwned>(
    plugin: &str,
    params: &Value,
) -> Result<T, ConfigError> {
    serde_json::from_value(params.clone()).map_err(|e| ConfigError::InvalidParameters {
        plugin: plugin.to_string(),
        reason: e.to_string(),
    })
}

pub const SLIDER_TRIAL_TYPE: &str = "html-slider-response";
pub const JUDGMENT_TRIAL_TYPE: &str = "judge-hyp";

static SLIDER_INFO: PluginInfo = PluginInfo {
    name: SLIDER_TRIAL_TYPE,
    description: "Stimulus with a labelled slider and a submit button",
    parameters: &[
        ParameterInfo {
            name: "stimulus",
            pretty_name: "Stimulus",
            kind: ParameterKind::HtmlString,
            array: false,
            default: None,
            description: "The HTML string to be displayed",
        },
        ParameterInfo {
            name: "min",
            pretty_name: "Min slider",
            kind: ParameterKind::Int,
            array: false,
            default: Some("0"),
            description: "Sets the minimum value of the slider.",
        },
        ParameterInfo {
            name: "max",
            pretty_name: "Max slider",
            kind: ParameterKind::Int,
            array: false,
            default: Some("100"),
            description: "Sets the maximum value of the slider",
        },
        ParameterInfo {
            name: "step",
            pretty_name: "Step",
            kind: ParameterKind::Int,
            array: false,
            default: Some("1"),
            description: "Sets the step of the slider",
        },
        ParameterInfo {
            name: "labels",
            pretty_name: "Labels",
            kind: ParameterKind::String,
            array: true,
            default: Some("[]"),
            description: "Labels of the slider.",
        },
        ParameterInfo {
            name: "slider_width",
            pretty_name: "Slider width",
            kind: ParameterKind::Int,
            array: false,
            default: Some("null"),
            description: "Width of the slider in pixels.",
        },
        ParameterInfo {
            name: "button_label",
            pretty_name: "Button label",
            kind: ParameterKind::String,
            array: false,
            default: Some("Continue"),
            description: "Label of the button to advance.",
        },
        ParameterInfo {
            name: "prompt",
            pretty_name: "Prompt",
            kind: ParameterKind::HtmlString,
            array: false,
            default: Some("null"),
            description: "Any content here will be displayed below the slider.",
        },
    ],
};

static JUDGMENT_INFO: PluginInfo = PluginInfo {
    name: JUDGMENT_TRIAL_TYPE,
    description: "Hypothetical judgment about a recorded grid-world round",
    parameters: &[
        ParameterInfo {
            name: "trial",
            pretty_name: "Trial",
            kind: ParameterKind::String,
            array: false,
            default: None,
            description: "Trial number",
        },
        ParameterInfo {
            name: "title",
            pretty_name: "Title",
            kind: ParameterKind::String,
            array: false,
            default: Some(" "),
            description: "Heading shown above the grid",
        },
        ParameterInfo {
            name: "path",
            pretty_name: "Path",
            kind: ParameterKind::String,
            array: false,
            default: Some(" "),
            description: "Path named in the judgment statement",
        },
    ],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SliderTrialPlugin;

impl SliderTrialPlugin {
    pub fn render(
        &self,
        target: &mut dyn DisplayTarget,
        config: &SliderConfig,
        completion: Completion,
    ) -> Result<SliderTrial, ConfigError> {
        config.validate()?;
        SliderTrial::mount(
            &SliderScreen::from_config(config),
            ResponseEcho::Stimulus(config.stimulus.clone()),
            target,
            completion,
        )
    }
}

impl TrialPlugin for SliderTrialPlugin {
    fn info(&self) -> &'static PluginInfo {
        &SLIDER_INFO
    }

    fn start(
        &self,
        target: &mut dyn DisplayTarget,
        params: &Value,
        completion: Completion,
    ) -> Result<SliderTrial, ConfigError> {
        let config: SliderConfig = parse_params(SLIDER_TRIAL_TYPE, params)?;
        debug!(labels = config.labels.len(), "starting slider trial");
        self.render(target, &config, completion)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HypotheticalJudgmentPlugin;

impl HypotheticalJudgmentPlugin {
    pub fn render(
        &self,
        target: &mut dyn DisplayTarget,
        config: &JudgmentConfig,
        completion: Completion,
    ) -> Result<SliderTrial, ConfigError> {
        start_judgment(config, target, completion)
    }
}

impl TrialPlugin for HypotheticalJudgmentPlugin {
    fn info(&self) -> &'static PluginInfo {
        &JUDGMENT_INFO
    }

    fn start(
        &self,
        target: &mut dyn DisplayTarget,
        params: &Value,
        completion: Completion,
    ) -> Result<SliderTrial, ConfigError> {
        let config: JudgmentConfig = parse_params(JUDGMENT_TRIAL_TYPE, params)?;
        debug!(trial = %config.trial, path = %config.path, "starting judgment trial");
        self.render(target, &config, completion)
    }
}
