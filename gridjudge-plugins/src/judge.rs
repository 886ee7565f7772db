use crate::config::{JudgmentConfig, SliderRange};
use crate::slider::{SliderScreen, SliderTrial};
use gridjudge_cache::AssetManifest;
use gridjudge_core::{Completion, ConfigError, DisplayTarget, Element, Node, ResponseEcho};

pub const JUDGMENT_LABELS: [&str; 2] = ["not at all", "very much"];
pub const JUDGMENT_SLIDER_WIDTH_PX: u32 = 500;
pub const JUDGMENT_BUTTON_LABEL: &str = "Continue";
pub const JUDGMENT_QUESTION: &str = "To what extent do you agree with the following statement?";

/// First frame of a trial's recorded play-through
pub fn trial_image(trial: &str) -> String {
    format!("trials/{trial}/00.png")
}

pub fn judgment_statement(path: &str) -> String {
    format!("The player would win if they took the {path} path this time.")
}

/// Images to preload for a list of judgment trials
pub fn trial_assets<'a>(trials: impl IntoIterator<Item = &'a str>) -> AssetManifest {
    trials.into_iter().map(trial_image).collect()
}

/// Judgment screens are the shared slider layout with a fixed question
pub fn judgment_screen(config: &JudgmentConfig) -> SliderScreen {
    SliderScreen {
        stimulus: vec![
            Element::new("h2").text(&config.title).into(),
            Element::new("img").attr("src", trial_image(&config.trial)).into(),
        ],
        lead: vec![
            Element::new("p").text(JUDGMENT_QUESTION).into(),
            Node::Element(
                Element::new("p").child(Element::new("q").text(&judgment_statement(&config.path))),
            ),
        ],
        range: SliderRange::default(),
        labels: JUDGMENT_LABELS.iter().map(|l| l.to_string()).collect(),
        width_px: Some(JUDGMENT_SLIDER_WIDTH_PX),
        prompt: None,
        button_label: JUDGMENT_BUTTON_LABEL.to_string(),
    }
}

pub fn start_judgment(
    config: &JudgmentConfig,
    target: &mut dyn DisplayTarget,
    completion: Completion,
) -> Result<SliderTrial, ConfigError> {
    config.validate()?;
    SliderTrial::mount(
        &judgment_screen(config),
        ResponseEcho::Trial(config.trial.clone()),
        target,
        completion,
    )
}
