use crate::plugin::{HypotheticalJudgmentPlugin, SliderTrialPlugin, TrialPlugin};
use crate::slider::SliderTrial;
use gridjudge_core::{Completion, ConfigError, DisplayTarget};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Trial types available to a runner, keyed by their trial-type name.
/// Owned by the runner and passed where needed; there is no global instance.
#[derive(Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<&'static str, Box<dyn TrialPlugin>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the slider and judgment plugins
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SliderTrialPlugin);
        registry.register(HypotheticalJudgmentPlugin);
        registry
    }

    /// Add a plugin, returning the one previously registered under its name
    pub fn register<P>(&mut self, plugin: P) -> Option<Box<dyn TrialPlugin>>
    where
        P: TrialPlugin + 'static,
    {
        let name = plugin.trial_type();
        debug!(trial_type = name, "registering plugin");
        self.plugins.insert(name, Box::new(plugin))
    }

    pub fn get(&self, trial_type: &str) -> Option<&dyn TrialPlugin> {
        self.plugins.get(trial_type).map(|p| p.as_ref())
    }

    pub fn contains(&self, trial_type: &str) -> bool {
        self.plugins.contains_key(trial_type)
    }

    pub fn trial_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.plugins.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn start(
        &self,
        trial_type: &str,
        target: &mut dyn DisplayTarget,
        params: &Value,
        completion: Completion,
    ) -> Result<SliderTrial, ConfigError> {
        let Some(plugin) = self.get(trial_type) else {
            warn!(trial_type, "no plugin registered");
            return Err(ConfigError::UnknownTrialType(trial_type.to_string()));
        };
        plugin.start(target, params, completion)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.plugins.keys()).finish()
    }
}
