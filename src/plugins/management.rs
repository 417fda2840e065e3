//! Management plugin - chat commands for inspecting and toggling modules

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;
use crate::application::errors::{CommandError, PluginError};
use crate::application::services::{Bot, WeakBot};
use crate::domain::entities::{CommandDescriptor, PluginDescriptor};
use crate::domain::traits::{Command, CommandResult, Context, PlatformClient, Plugin};
use crate::infrastructure::config::{CommandConfig, PluginConfig, SecurityMap};

/// Registers `list-plugins`, `activate-plugin`, `deactivate-plugin`,
/// `list-commands` and `describe`.
///
/// The plugin's `config.security` gates the first three (admins only when
/// unset); the listing commands are open to everyone.
pub struct ManagementPlugin {
    descriptor: PluginDescriptor,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
struct Settings {
    security: Option<SecurityMap>,
}

impl ManagementPlugin {
    pub fn new(config: PluginConfig) -> Self {
        Self {
            descriptor: PluginDescriptor::new(config),
        }
    }

    pub fn create(config: &PluginConfig) -> Box<dyn Plugin> {
        Box::new(Self::new(config.clone()))
    }

    fn settings(&self) -> Result<Settings, PluginError> {
        Settings::deserialize(self.descriptor.config()).map_err(|e| PluginError::Config {
            plugin: self.name().to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl Plugin for ManagementPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, bot: &Bot, _client: &dyn PlatformClient) -> Result<(), PluginError> {
        let settings = self.settings()?;
        let restricted = settings.security;
        let open = Some(SecurityMap::new());

        let commands = [
            (Action::ListPlugins, "Lists all plugins and their state.", "USAGE: list-plugins", restricted.clone()),
            (Action::ActivatePlugin, "Activates a plugin.", "USAGE: activate-plugin <PLUGIN>", restricted.clone()),
            (Action::DeactivatePlugin, "Deactivates a plugin.", "USAGE: deactivate-plugin <PLUGIN>", restricted),
            (Action::ListCommands, "List all loaded commands.", "USAGE: list-commands", open.clone()),
            (Action::Describe, "Provides explanations of commands and plugins.", "USAGE: describe <COMMAND|PLUGIN>", open),
        ];

        for (action, description, help, security) in commands {
            let mut config = CommandConfig::new(action.name())
                .with_description(description)
                .with_version("1.0.0")
                .with_help(help);
            config.security = security;

            let command = ManagementCommand {
                descriptor: CommandDescriptor::new(config),
                bot: bot.downgrade(),
                action,
            };
            bot.commands().insert(action.name(), Arc::new(command))?;
            debug!("{} registered {}", self.name(), action.name());
        }
        Ok(())
    }

    // Commands stay registered: activate-plugin must stay reachable.
    async fn deinitialize(&self, _bot: &Bot, _client: &dyn PlatformClient) -> Result<(), PluginError> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ListPlugins,
    ActivatePlugin,
    DeactivatePlugin,
    ListCommands,
    Describe,
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Action::ListPlugins => "list-plugins",
            Action::ActivatePlugin => "activate-plugin",
            Action::DeactivatePlugin => "deactivate-plugin",
            Action::ListCommands => "list-commands",
            Action::Describe => "describe",
        }
    }
}

struct ManagementCommand {
    descriptor: CommandDescriptor,
    bot: WeakBot,
    action: Action,
}

fn code_block(lines: impl IntoIterator<Item = String>) -> String {
    let mut out = String::from("```\n");
    for line in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out.push_str("```\n");
    out
}

async fn required_arg<'a>(argv: &'a [String], ctx: &Context) -> Result<&'a str, CommandError> {
    match argv.get(1) {
        Some(arg) => Ok(arg.as_str()),
        None => Err(ctx.reply_err(CommandError::InvalidArgs("Insufficient arguments.".to_string())).await),
    }
}

impl ManagementCommand {
    async fn toggle(&self, bot: &Bot, argv: &[String], ctx: &Context) -> CommandResult {
        let name = required_arg(argv, ctx).await?;
        let result = match self.action {
            Action::ActivatePlugin => bot.activate_plugin(name).await,
            _ => bot.deactivate_plugin(name).await,
        };
        if let Err(e) = result {
            return Err(ctx.reply_err(e.into()).await);
        }

        let verb = if self.action == Action::ActivatePlugin { "activated" } else { "deactivated" };
        Ok(Some(ctx.reply(format!("{} {}.", name, verb)).await?))
    }

    async fn describe(&self, bot: &Bot, argv: &[String], ctx: &Context) -> CommandResult {
        let name = required_arg(argv, ctx).await?;
        let lines = if let Some(command) = bot.commands().get(name) {
            let d = command.descriptor();
            vec![
                format!("{} - {}", d.name(), d.version()),
                d.description().to_string(),
                d.help().to_string(),
            ]
        } else if let Some(plugin) = bot.plugins().get(name) {
            let info = plugin.info();
            vec![format!("{} - {} - {}", info.name, info.version, info.state), info.description]
        } else {
            let err = CommandError::InvalidArgs(format!("No command or plugin with name {}.", name));
            return Err(ctx.reply_err(err).await);
        };
        Ok(Some(ctx.reply(code_block(lines)).await?))
    }
}

#[async_trait]
impl Command for ManagementCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    async fn exec(&self, argv: &[String], ctx: &Context) -> CommandResult {
        let bot = self.bot.upgrade().ok_or(CommandError::BotUnavailable)?;

        match self.action {
            Action::ListPlugins => {
                let lines = bot.plugins().entries().into_iter().map(|(name, plugin)| {
                    format!("{} - {}", name, plugin.state())
                });
                Ok(Some(ctx.reply(code_block(lines)).await?))
            }
            Action::ListCommands => {
                Ok(Some(ctx.reply(code_block(bot.commands().names())).await?))
            }
            Action::ActivatePlugin | Action::DeactivatePlugin => self.toggle(&bot, argv, ctx).await,
            Action::Describe => self.describe(&bot, argv, ctx).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_block() {
        let block = code_block(vec!["a - active".to_string(), "b - inactive".to_string()]);
        assert_eq!(block, "```\na - active\nb - inactive\n```\n");
        assert_eq!(code_block(Vec::new()), "```\n```\n");
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let plugin = ManagementPlugin::new(
            PluginConfig::new("management").with_config(serde_json::json!({ "security": 5 })),
        );
        assert!(matches!(plugin.settings(), Err(PluginError::Config { .. })));
    }

    #[test]
    fn test_settings_default_to_admin_only() {
        let plugin = ManagementPlugin::new(PluginConfig::new("management"));
        assert!(plugin.settings().unwrap().security.is_none());
    }
}
