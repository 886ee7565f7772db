use crate::config::{SliderConfig, SliderRange};
use gridjudge_core::{
    Completion, ConfigError, DisplayTarget, Element, EventOutcome, MountToken, Node,
    ResponseEcho, ResponseRecord, TrialEvent, TrialState,
};
use tracing::{debug, info, warn};

pub const WRAPPER_ID: &str = "slider-response-wrapper";
pub const STIMULUS_ID: &str = "slider-response-stimulus";
pub const CONTAINER_CLASS: &str = "slider-response-container";
pub const SLIDER_ID: &str = "slider-response-response";
pub const SUBMIT_ID: &str = "slider-response-next";

/// Horizontal placement of one slider label, in percent of the slider width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    pub left_percent: f64,
    pub width_percent: f64,
}

/// Evenly spaced label slots: label `j` of `n` is centred on `j/(n-1)` of the
/// axis. Fewer than two labels have no placement.
pub fn label_placements(count: usize) -> Vec<LabelPlacement> {
    if count < 2 {
        return Vec::new();
    }
    let width = 100.0 / (count - 1) as f64;
    (0..count)
        .map(|j| LabelPlacement {
            left_percent: j as f64 * width - width / 2.0,
            width_percent: width,
        })
        .collect()
}

/// Layout shared by every slider trial: stimulus, optional lead-in content,
/// the slider with its labels, an optional trailing prompt and the submit
/// control.
#[derive(Debug, Clone, PartialEq)]
pub struct SliderScreen {
    pub stimulus: Vec<Node>,
    pub lead: Vec<Node>,
    pub range: SliderRange,
    pub labels: Vec<String>,
    pub width_px: Option<u32>,
    pub prompt: Option<Node>,
    pub button_label: String,
}

impl SliderScreen {
    pub fn from_config(config: &SliderConfig) -> Self {
        Self {
            stimulus: vec![Node::Markup(config.stimulus.clone())],
            lead: Vec::new(),
            range: config.range(),
            labels: config.labels.clone(),
            width_px: config.slider_width,
            prompt: config.prompt.as_ref().map(|p| Node::Markup(p.clone())),
            button_label: config.button_label.clone(),
        }
    }

    pub fn build(&self) -> Element {
        let mut container = Element::new("div")
            .class(CONTAINER_CLASS)
            .style("position", "relative")
            .style("margin", "0 auto 2em auto");
        if let Some(px) = self.width_px {
            container = container.style("width", format!("{px}px"));
        }

        let slider = Element::new("input")
            .id(SLIDER_ID)
            .attr("type", "range")
            .attr("min", self.range.min)
            .attr("max", self.range.max)
            .attr("step", self.range.step)
            .style("width", "100%");

        let labels = self
            .labels
            .iter()
            .zip(label_placements(self.labels.len()))
            .map(|(label, place)| {
                Element::new("div")
                    .style("display", "inline-block")
                    .style("position", "absolute")
                    .style("left", format!("{}%", place.left_percent))
                    .style("text-align", "center")
                    .style("width", format!("{}%", place.width_percent))
                    .child(
                        Element::new("span")
                            .style("text-align", "center")
                            .style("font-size", "80%")
                            .text(label),
                    )
            });

        let container = container
            .child(slider)
            .child(Element::new("div").children(labels));

        let wrapper = Element::new("div")
            .id(WRAPPER_ID)
            .child(
                Element::new("div")
                    .id(STIMULUS_ID)
                    .children(self.stimulus.iter().cloned()),
            )
            .children(self.lead.iter().cloned())
            .child(container);

        let mut screen = Element::new("div").child(wrapper);
        if let Some(prompt) = &self.prompt {
            screen = screen.child(prompt.clone());
        }
        screen.child(
            Element::new("button")
                .id(SUBMIT_ID)
                .class("slider-response-btn")
                .flag("disabled")
                .text(&self.button_label),
        )
    }
}

/// One running slider trial. Owns the in-flight response and the completion
/// handle; the host forwards participant events through `handle_event`.
#[derive(Debug)]
pub struct SliderTrial {
    state: TrialState,
    range: SliderRange,
    value: Option<i64>,
    echo: ResponseEcho,
    completion: Option<Completion>,
    token: MountToken,
}

impl SliderTrial {
    /// Replace the target's content with `screen` and wait for interaction
    pub fn mount(
        screen: &SliderScreen,
        echo: ResponseEcho,
        target: &mut dyn DisplayTarget,
        completion: Completion,
    ) -> Result<Self, ConfigError> {
        screen.range.validate()?;
        crate::config::validate_labels(&screen.labels)?;

        let token = target.mount(screen.build());
        debug!(?echo, ?token, "slider trial mounted");

        let mut trial = Self {
            state: TrialState::default(),
            range: screen.range,
            value: None,
            echo,
            completion: Some(completion),
            token,
        };
        trial.advance_state();
        Ok(trial)
    }

    fn advance_state(&mut self) {
        if let Some(next) = self.state.next() {
            self.state = next;
        }
    }

    pub fn handle_event(
        &mut self,
        target: &mut dyn DisplayTarget,
        event: TrialEvent,
    ) -> EventOutcome {
        if self.state.is_terminal() {
            debug!(?event, "event after submission ignored");
            return EventOutcome::Ignored;
        }
        if target.token() != self.token {
            warn!(?event, "event delivered through a target this trial no longer owns");
            return EventOutcome::Stale;
        }

        match event {
            TrialEvent::SliderMoved(raw) => self.on_move(target, raw),
            TrialEvent::SubmitClicked => self.on_submit(target),
        }
    }

    fn on_move(&mut self, target: &mut dyn DisplayTarget, raw: f64) -> EventOutcome {
        let Some(value) = self.range.snap(raw) else {
            return EventOutcome::Ignored;
        };
        self.value = Some(value);

        if let Some(view) = target.current_mut() {
            if let Some(slider) = view.find_by_id_mut(SLIDER_ID) {
                slider.set_attr("value", value);
            }
            if self.state == TrialState::AwaitingInteraction {
                if let Some(submit) = view.find_by_id_mut(SUBMIT_ID) {
                    submit.remove_attr("disabled");
                }
            }
        }
        if self.state == TrialState::AwaitingInteraction {
            self.advance_state();
        }

        debug!(value, "slider moved");
        EventOutcome::Updated
    }

    fn on_submit(&mut self, target: &mut dyn DisplayTarget) -> EventOutcome {
        let (Some(value), true) = (self.value, self.state.submit_enabled()) else {
            return EventOutcome::Ignored;
        };
        let Some(completion) = self.completion.take() else {
            return EventOutcome::Ignored;
        };

        self.advance_state();
        target.clear();

        let record = ResponseRecord {
            echo: self.echo.clone(),
            response: value,
        };
        info!(?record, "trial completed");
        completion.finish(record);
        EventOutcome::Completed
    }

    pub fn state(&self) -> TrialState {
        self.state
    }

    /// Last snapped slider value, `None` until the first move
    pub fn value(&self) -> Option<i64> {
        self.value
    }

    pub fn echo(&self) -> &ResponseEcho {
        &self.echo
    }

    pub fn is_complete(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridjudge_core::Container;

    fn screen() -> SliderScreen {
        SliderScreen::from_config(
            &SliderConfig::new("<p>X</p>")
                .with_range(0, 10, 1)
                .with_labels(["low", "high"])
                .with_button_label("Go"),
        )
    }

    fn submit_disabled(c: &Container) -> bool {
        c.current()
            .and_then(|v| v.find_by_id(SUBMIT_ID))
            .map(|b| b.has_attr("disabled"))
            .unwrap()
    }

    #[test]
    fn placements_for_two_and_three_labels() {
        assert_eq!(
            label_placements(2),
            vec![
                LabelPlacement { left_percent: -50.0, width_percent: 100.0 },
                LabelPlacement { left_percent: 50.0, width_percent: 100.0 },
            ]
        );
        let three: Vec<f64> = label_placements(3).iter().map(|p| p.left_percent).collect();
        assert_eq!(three, vec![-25.0, 25.0, 75.0]);
        assert!(label_placements(0).is_empty());
        assert!(label_placements(1).is_empty());
    }

    #[test]
    fn build_lays_out_one_disabled_submit_control() {
        let view = screen().build();
        let buttons = view.find_all("button");
        assert_eq!(buttons.len(), 1);
        assert!(buttons[0].has_attr("disabled"));
        assert_eq!(buttons[0].text_content(), "Go");

        let slider = view.find_by_id(SLIDER_ID).unwrap();
        assert_eq!(slider.attr_value("type"), Some("range"));
        assert_eq!(slider.attr_value("max"), Some("10"));
        assert_eq!(slider.attr_value("value"), None);

        let stim = view.find_by_id(STIMULUS_ID).unwrap();
        assert_eq!(stim.to_markup(), format!("<div id=\"{STIMULUS_ID}\"><p>X</p></div>"));
    }

    #[test]
    fn width_is_only_set_when_configured() {
        let container = |s: &SliderScreen| {
            s.build()
                .descendants()
                .into_iter()
                .find(|e| e.attr_value("class") == Some(CONTAINER_CLASS))
                .map(|e| e.style_value("width").map(str::to_string))
                .unwrap()
        };
        let mut s = screen();
        assert_eq!(container(&s), None);
        s.width_px = Some(500);
        assert_eq!(container(&s), Some("500px".to_string()));
    }

    #[test]
    fn prompt_follows_the_slider() {
        let mut cfg = SliderConfig::new("<p>X</p>").with_prompt("<p>after</p>");
        cfg.button_label = "Next".into();
        let markup = SliderScreen::from_config(&cfg).build().to_markup();
        let slider_at = markup.find(SLIDER_ID).unwrap();
        let prompt_at = markup.find("<p>after</p>").unwrap();
        let button_at = markup.find("<button").unwrap();
        assert!(slider_at < prompt_at && prompt_at < button_at);
    }

    #[test]
    fn submit_before_any_move_is_ignored() {
        let mut c = Container::new();
        let (done, rx) = Completion::channel();
        let mut trial =
            SliderTrial::mount(&screen(), ResponseEcho::Stimulus("<p>X</p>".into()), &mut c, done)
                .unwrap();

        assert_eq!(trial.state(), TrialState::AwaitingInteraction);
        assert!(submit_disabled(&c));
        assert_eq!(trial.handle_event(&mut c, TrialEvent::SubmitClicked), EventOutcome::Ignored);
        assert!(rx.try_recv().is_err());
        assert!(!c.is_empty());
    }

    #[test]
    fn first_move_enables_submit_for_good() {
        let mut c = Container::new();
        let (done, _rx) = Completion::channel();
        let mut trial =
            SliderTrial::mount(&screen(), ResponseEcho::Stimulus("<p>X</p>".into()), &mut c, done)
                .unwrap();

        for raw in [3.0, 0.0, 10.0, 5.2] {
            assert_eq!(
                trial.handle_event(&mut c, TrialEvent::SliderMoved(raw)),
                EventOutcome::Updated
            );
            assert!(!submit_disabled(&c));
            assert_eq!(trial.state(), TrialState::Interacted);
        }
        assert_eq!(trial.value(), Some(5));
        let slider = c.current().and_then(|v| v.find_by_id(SLIDER_ID)).unwrap();
        assert_eq!(slider.attr_value("value"), Some("5"));
    }

    #[test]
    fn non_finite_move_does_not_count_as_interaction() {
        let mut c = Container::new();
        let (done, _rx) = Completion::channel();
        let mut trial =
            SliderTrial::mount(&screen(), ResponseEcho::Stimulus("s".into()), &mut c, done)
                .unwrap();
        assert_eq!(
            trial.handle_event(&mut c, TrialEvent::SliderMoved(f64::NAN)),
            EventOutcome::Ignored
        );
        assert_eq!(trial.state(), TrialState::AwaitingInteraction);
        assert!(submit_disabled(&c));
    }

    #[test]
    fn submit_reports_last_value_clears_and_completes_once() {
        let mut c = Container::new();
        let (done, rx) = Completion::channel();
        let mut trial =
            SliderTrial::mount(&screen(), ResponseEcho::Stimulus("<p>X</p>".into()), &mut c, done)
                .unwrap();

        trial.handle_event(&mut c, TrialEvent::SliderMoved(7.0));
        assert_eq!(trial.handle_event(&mut c, TrialEvent::SubmitClicked), EventOutcome::Completed);
        assert!(c.is_empty());
        assert_eq!(rx.try_recv().ok(), Some(ResponseRecord::for_stimulus("<p>X</p>", 7)));

        assert_eq!(trial.handle_event(&mut c, TrialEvent::SliderMoved(2.0)), EventOutcome::Ignored);
        assert_eq!(trial.handle_event(&mut c, TrialEvent::SubmitClicked), EventOutcome::Ignored);
        assert!(rx.try_recv().is_err());
        assert!(trial.is_complete());
    }

    #[test]
    fn lifecycle_walks_every_state_in_order() {
        let mut c = Container::new();
        let (done, _rx) = Completion::channel();
        let mut seen = Vec::new();

        let mut trial =
            SliderTrial::mount(&screen(), ResponseEcho::Trial("001".into()), &mut c, done).unwrap();
        seen.push(trial.state());
        trial.handle_event(&mut c, TrialEvent::SliderMoved(4.0));
        seen.push(trial.state());
        trial.handle_event(&mut c, TrialEvent::SliderMoved(6.0));
        seen.push(trial.state());
        trial.handle_event(&mut c, TrialEvent::SubmitClicked);
        seen.push(trial.state());

        let mut expected = Vec::new();
        let mut state = TrialState::Idle;
        while let Some(next) = state.next() {
            expected.push(next);
            if next == TrialState::Interacted {
                expected.push(next);
            }
            state = next;
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn events_after_remount_are_stale() {
        let mut c = Container::new();
        let (first_done, first_rx) = Completion::channel();
        let mut first =
            SliderTrial::mount(&screen(), ResponseEcho::Stimulus("a".into()), &mut c, first_done)
                .unwrap();
        let (second_done, _second_rx) = Completion::channel();
        let _second =
            SliderTrial::mount(&screen(), ResponseEcho::Stimulus("b".into()), &mut c, second_done)
                .unwrap();

        assert_eq!(first.handle_event(&mut c, TrialEvent::SliderMoved(4.0)), EventOutcome::Stale);
        assert_eq!(first.handle_event(&mut c, TrialEvent::SubmitClicked), EventOutcome::Stale);
        assert!(first_rx.try_recv().is_err());
        assert!(submit_disabled(&c));
    }

    #[test]
    fn mount_rejects_invalid_layout_without_touching_target() {
        let mut c = Container::new();
        let before = c.token();
        let mut s = screen();
        s.labels = vec!["lonely".into()];
        let (done, _rx) = Completion::channel();
        let err =
            SliderTrial::mount(&s, ResponseEcho::Trial("t".into()), &mut c, done).unwrap_err();
        assert_eq!(err, ConfigError::SingleLabel);
        assert_eq!(c.token(), before);
        assert!(c.is_empty());
    }
}
