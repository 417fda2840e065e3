//! Static module table - factories registered under a module path

use std::collections::HashMap;
use crate::commands::{EchoCommand, FetchUserCommand};
use crate::domain::traits::{Command, Plugin};
use crate::infrastructure::config::{CommandConfig, PluginConfig};
use crate::plugins::ManagementPlugin;

/// Builds a command from its config entry
pub type CommandFactory = fn(&CommandConfig) -> Box<dyn Command>;

/// Builds a plugin from its config entry
pub type PluginFactory = fn(&PluginConfig) -> Box<dyn Plugin>;

/// Explicitly registered module constructors, keyed by the `path` a config
/// entry uses to name them.
#[derive(Clone, Default)]
pub struct ModuleTable {
    commands: HashMap<String, CommandFactory>,
    plugins: HashMap<String, PluginFactory>,
}

impl ModuleTable {
    /// An empty table: every config path must resolve to a shared library.
    pub fn new() -> Self {
        Self::default()
    }

    /// The modules shipped with this crate, under `builtin:<name>`.
    pub fn with_builtins() -> Self {
        Self::new()
            .with_command("builtin:echo", EchoCommand::create)
            .with_command("builtin:fetch-user", FetchUserCommand::create)
            .with_plugin("builtin:management", ManagementPlugin::create)
    }

    pub fn with_command(mut self, path: impl Into<String>, factory: CommandFactory) -> Self {
        self.commands.insert(path.into(), factory);
        self
    }

    pub fn with_plugin(mut self, path: impl Into<String>, factory: PluginFactory) -> Self {
        self.plugins.insert(path.into(), factory);
        self
    }

    pub fn command(&self, path: &str) -> Option<CommandFactory> {
        self.commands.get(path).copied()
    }

    pub fn plugin(&self, path: &str) -> Option<PluginFactory> {
        self.plugins.get(path).copied()
    }
}
