//! Configuration management

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use crate::application::errors::ConfigError;
use crate::domain::entities::Permissions;

/// Environment variable that overrides the connection token
pub const TOKEN_ENV: &str = "OP_BOT_TOKEN";

/// Bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BotConfig {
    pub name: String,
    pub version: String,
    #[serde(alias = "loglevel", alias = "log_level")]
    pub log_level: String,
    /// Platform permissions requested when generating the invite
    pub permissions: Permissions,
    #[serde(deserialize_with = "ids")]
    pub admins: Vec<String>,
    pub plugins: Vec<PluginConfig>,
    pub commands: Vec<CommandConfig>,
    /// Base directory relative module paths are resolved against
    #[serde(rename = "path", skip_serializing_if = "Option::is_none")]
    pub module_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Per-guild access rule for a command
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GuildSecurity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Permissions>,
}

impl GuildSecurity {
    pub fn roles<I, S>(roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            roles: Some(roles.into_iter().map(Into::into).collect()),
            permissions: None,
        }
    }

    pub fn permissions(permissions: Permissions) -> Self {
        Self {
            roles: None,
            permissions: Some(permissions),
        }
    }

    /// True when the entry names neither roles nor permissions.
    pub fn is_open(&self) -> bool {
        self.roles.as_ref().map_or(true, Vec::is_empty)
            && self.permissions.map_or(true, Permissions::is_empty)
    }
}

/// Security descriptor: guild id to access rule
pub type SecurityMap = BTreeMap<String, GuildSecurity>;

/// Configuration of a single command module
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CommandConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    pub help: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityMap>,
    #[serde(default = "empty_object")]
    pub config: serde_json::Value,
}

/// Configuration of a single plugin module
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PluginConfig {
    pub name: String,
    pub description: String,
    pub version: String,
    pub path: String,
    pub enabled: bool,
    #[serde(default = "empty_object")]
    pub config: serde_json::Value,
}

/// Shared shape of command and plugin entries, as seen by the module loader
pub trait ModuleConfig {
    fn name(&self) -> &str;
    fn path(&self) -> &str;
}

impl ModuleConfig for CommandConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }
}

impl ModuleConfig for PluginConfig {
    fn name(&self) -> &str {
        &self.name
    }

    fn path(&self) -> &str {
        &self.path
    }
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

const DEFAULT_VERSION: &str = "0.0.0";

/// Accept user ids written either as strings or as bare integers.
fn ids<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    let raw = Vec::<Id>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|id| match id {
            Id::Text(s) => s,
            Id::Number(n) => n.to_string(),
        })
        .collect())
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: "op".to_string(),
            version: DEFAULT_VERSION.to_string(),
            log_level: "info".to_string(),
            permissions: Permissions::NONE,
            admins: Vec::new(),
            plugins: Vec::new(),
            commands: Vec::new(),
            module_path: None,
            token: None,
        }
    }
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: DEFAULT_VERSION.to_string(),
            help: String::new(),
            path: String::new(),
            security: None,
            config: empty_object(),
        }
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            version: DEFAULT_VERSION.to_string(),
            path: String::new(),
            enabled: false,
            config: empty_object(),
        }
    }
}

impl CommandConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = help.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_security(mut self, security: SecurityMap) -> Self {
        self.security = Some(security);
        self
    }

    /// Add (or replace) the rule for one guild.
    pub fn with_guild_security(mut self, guild_id: impl Into<String>, rule: GuildSecurity) -> Self {
        self.security
            .get_or_insert_with(SecurityMap::new)
            .insert(guild_id.into(), rule);
        self
    }
}

impl PluginConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_config(mut self, config: serde_json::Value) -> Self {
        self.config = config;
        self
    }
}

impl BotConfig {
    /// Load a YAML (or JSON) config file.
    ///
    /// Modules resolve relative to the directory containing the config file;
    /// a relative `path` in the file is taken relative to that directory too.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_yaml(&content)?;
        let dir = path.parent().unwrap_or_else(|| Path::new(""));
        config.module_path = Some(match config.module_path.take() {
            Some(base) if base.is_absolute() => base,
            Some(base) => dir.join(base),
            None => dir.to_path_buf(),
        });
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            self.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(cmd) = self.commands.iter().find(|c| c.name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(format!(
                "command with path '{}' has no name",
                cmd.path
            )));
        }
        if let Some(plugin) = self.plugins.iter().find(|p| p.name.trim().is_empty()) {
            return Err(ConfigError::InvalidValue(format!(
                "plugin with path '{}' has no name",
                plugin.path
            )));
        }
        Ok(())
    }

    /// Directory relative module paths are resolved against.
    pub fn module_base(&self) -> PathBuf {
        self.module_path.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
