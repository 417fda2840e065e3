use std::fmt;
use crate::infrastructure::config::PluginConfig;

/// Activation state of a plugin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PluginState {
    #[default]
    Inactive,
    Active,
}

impl PluginState {
    pub fn as_str(&self) -> &str {
        match self {
            PluginState::Inactive => "inactive",
            PluginState::Active => "active",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, PluginState::Active)
    }
}

impl fmt::Display for PluginState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frozen descriptor of a plugin, built from its config entry
#[derive(Debug, Clone)]
pub struct PluginDescriptor {
    config: PluginConfig,
}

impl PluginDescriptor {
    pub fn new(config: PluginConfig) -> Self {
        Self { config }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn description(&self) -> &str {
        &self.config.description
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn path(&self) -> &str {
        &self.config.path
    }

    /// Whether the bot activates this plugin on startup
    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &serde_json::Value {
        &self.config.config
    }
}

impl From<PluginConfig> for PluginDescriptor {
    fn from(config: PluginConfig) -> Self {
        Self::new(config)
    }
}
