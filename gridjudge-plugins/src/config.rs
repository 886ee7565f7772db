use gridjudge_core::ConfigError;
use serde::{Deserialize, Deserializer, Serialize};

/// Integer slider bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliderRange {
    pub min: i64,
    pub max: i64,
    pub step: i64,
}

impl Default for SliderRange {
    fn default() -> Self {
        Self {
            min: 0,
            max: 100,
            step: 1,
        }
    }
}

impl SliderRange {
    pub fn new(min: i64, max: i64, step: i64) -> Self {
        Self { min, max, step }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min >= self.max {
            return Err(ConfigError::EmptyRange {
                min: self.min,
                max: self.max,
            });
        }
        if self.step <= 0 {
            return Err(ConfigError::NonPositiveStep(self.step));
        }
        Ok(())
    }

    /// Clamp a raw slider position into range and snap it onto the step grid
    /// anchored at `min`. Non-finite positions yield `None`.
    ///
    /// Grid arithmetic runs in `i128` so ranges spanning all of `i64` neither
    /// overflow nor wrap.
    pub fn snap(&self, raw: f64) -> Option<i64> {
        if !raw.is_finite() {
            return None;
        }
        let (min, max, step) = (self.min as i128, self.max as i128, self.step as i128);
        let clamped = raw.clamp(self.min as f64, self.max as f64);
        let steps = ((clamped - self.min as f64) / self.step as f64).round() as i128;

        // highest grid point not above max
        let top = min + (max - min) / step * step;
        let value = steps
            .checked_mul(step)
            .and_then(|offset| offset.checked_add(min))
            .map_or(top, |v| v.min(top))
            .max(min);
        i64::try_from(value).ok()
    }
}

/// Parameters of the generic slider trial
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Trusted markup shown above the slider
    pub stimulus: String,
    pub min: i64,
    pub max: i64,
    pub step: i64,
    pub labels: Vec<String>,
    /// Fills the container when unset
    pub slider_width: Option<u32>,
    pub button_label: String,
    /// Trusted markup shown below the slider
    pub prompt: Option<String>,
}

impl Default for SliderConfig {
    fn default() -> Self {
        let range = SliderRange::default();
        Self {
            stimulus: String::new(),
            min: range.min,
            max: range.max,
            step: range.step,
            labels: Vec::new(),
            slider_width: None,
            button_label: "Continue".to_string(),
            prompt: None,
        }
    }
}

impl SliderConfig {
    pub fn new(stimulus: impl Into<String>) -> Self {
        Self {
            stimulus: stimulus.into(),
            ..Self::default()
        }
    }

    pub fn with_range(mut self, min: i64, max: i64, step: i64) -> Self {
        self.min = min;
        self.max = max;
        self.step = step;
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_slider_width(mut self, px: u32) -> Self {
        self.slider_width = Some(px);
        self
    }

    pub fn with_button_label(mut self, label: impl Into<String>) -> Self {
        self.button_label = label.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn range(&self) -> SliderRange {
        SliderRange::new(self.min, self.max, self.step)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stimulus.trim().is_empty() {
            return Err(ConfigError::Missing("stimulus"));
        }
        self.range().validate()?;
        validate_labels(&self.labels)?;
        if self.slider_width == Some(0) {
            return Err(ConfigError::ZeroWidth);
        }
        Ok(())
    }
}

pub(crate) fn validate_labels(labels: &[String]) -> Result<(), ConfigError> {
    if labels.len() == 1 {
        return Err(ConfigError::SingleLabel);
    }
    Ok(())
}

/// Parameters of the hypothetical judgment trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JudgmentConfig {
    /// Trial identifier, also the directory holding the trial's images.
    /// Timelines may give it as a JSON number.
    #[serde(deserialize_with = "trial_id")]
    pub trial: String,
    pub title: String,
    /// Path named in the judgment statement, e.g. `red` or `blue`
    pub path: String,
}

impl Default for JudgmentConfig {
    fn default() -> Self {
        Self {
            trial: String::new(),
            title: " ".to_string(),
            path: " ".to_string(),
        }
    }
}

impl JudgmentConfig {
    pub fn new(
        trial: impl Into<String>,
        title: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            trial: trial.into(),
            title: title.into(),
            path: path.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.trial.trim().is_empty() {
            return Err(ConfigError::Missing("trial"));
        }
        if self.trial.contains('/') || self.trial.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidTrialId(self.trial.clone()));
        }
        if self.path.trim().is_empty() {
            return Err(ConfigError::Missing("path"));
        }
        Ok(())
    }
}

fn trial_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TrialId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TrialId::deserialize(deserializer)? {
        TrialId::Text(text) => text,
        TrialId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn slider_defaults_follow_plugin_parameters() {
        let cfg: SliderConfig = serde_json::from_value(json!({"stimulus": "<p>X</p>"})).unwrap();
        assert_eq!(cfg.range(), SliderRange::new(0, 100, 1));
        assert!(cfg.labels.is_empty());
        assert_eq!(cfg.slider_width, None);
        assert_eq!(cfg.button_label, "Continue");
        assert_eq!(cfg.prompt, None);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn slider_validation_rejects_malformed_configs() {
        assert_eq!(
            SliderConfig::default().validate(),
            Err(ConfigError::Missing("stimulus"))
        );
        assert_eq!(
            SliderConfig::new("x").with_range(5, 5, 1).validate(),
            Err(ConfigError::EmptyRange { min: 5, max: 5 })
        );
        assert_eq!(
            SliderConfig::new("x").with_range(0, 10, 0).validate(),
            Err(ConfigError::NonPositiveStep(0))
        );
        assert_eq!(
            SliderConfig::new("x").with_labels(["only"]).validate(),
            Err(ConfigError::SingleLabel)
        );
        assert_eq!(
            SliderConfig::new("x").with_slider_width(0).validate(),
            Err(ConfigError::ZeroWidth)
        );
        assert!(SliderConfig::new("x").with_labels(["a", "b", "c"]).validate().is_ok());
    }

    #[test]
    fn snap_clamps_and_rounds_to_step_grid() {
        let r = SliderRange::new(0, 10, 3);
        assert_eq!(r.snap(-4.0), Some(0));
        assert_eq!(r.snap(4.4), Some(3));
        assert_eq!(r.snap(4.6), Some(6));
        assert_eq!(r.snap(10.0), Some(9));
        assert_eq!(r.snap(42.0), Some(9));
        assert_eq!(r.snap(f64::NAN), None);

        let r = SliderRange::new(-50, 50, 5);
        assert_eq!(r.snap(-12.0), Some(-10));
        assert_eq!(r.snap(50.0), Some(50));
    }

    #[test]
    fn snap_handles_ranges_spanning_all_of_i64() {
        let full = SliderConfig::new("<p>X</p>").with_range(i64::MIN, i64::MAX, 1);
        assert!(full.validate().is_ok());
        let r = full.range();
        assert_eq!(r.snap(i64::MAX as f64), Some(i64::MAX));
        assert_eq!(r.snap(i64::MIN as f64), Some(i64::MIN));
        assert_eq!(r.snap(-1e30), Some(i64::MIN));

        let r = SliderRange::new(i64::MIN, i64::MAX, 2);
        assert_eq!(r.snap(1e30), Some(i64::MAX - 1));
        assert_eq!(r.snap(i64::MIN as f64), Some(i64::MIN));

        let r = SliderRange::new(i64::MAX - 10, i64::MAX, 4);
        let v = r.snap(f64::MAX).unwrap();
        assert!(v <= i64::MAX && (v - r.min) % 4 == 0);
    }

    #[test]
    fn judgment_validation() {
        assert!(JudgmentConfig::new("003", "Round 4", "red").validate().is_ok());
        assert_eq!(
            JudgmentConfig::default().validate(),
            Err(ConfigError::Missing("trial"))
        );
        assert_eq!(
            JudgmentConfig::new("../x", "t", "red").validate(),
            Err(ConfigError::InvalidTrialId("../x".into()))
        );
        assert_eq!(
            JudgmentConfig::new("004", "t", " ").validate(),
            Err(ConfigError::Missing("path"))
        );
    }

    #[test]
    fn judgment_params_use_original_field_names() {
        let cfg: JudgmentConfig =
            serde_json::from_value(json!({"trial": "003", "title": "Round 4", "path": "red"}))
                .unwrap();
        assert_eq!(cfg, JudgmentConfig::new("003", "Round 4", "red"));
    }

    #[test]
    fn numeric_trial_ids_are_read_as_text() {
        let cfg: JudgmentConfig =
            serde_json::from_value(json!({"trial": 12, "path": "blue"})).unwrap();
        assert_eq!(cfg.trial, "12");
        assert_eq!(cfg.title, " ");
        assert!(cfg.validate().is_ok());

        let missing: JudgmentConfig = serde_json::from_value(json!({"path": "blue"})).unwrap();
        assert_eq!(missing.validate(), Err(ConfigError::Missing("trial")));

        assert!(serde_json::from_value::<JudgmentConfig>(json!({"trial": ["1"]})).is_err());
    }
}
