//! op-bot - a command/plugin framework for chat bots
//!
//! Commands and plugins are declared in the bot config and resolved by the
//! module loader. Plugins follow an Inactive/Active lifecycle and may add
//! commands; addressed messages are routed to commands by the dispatcher.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod commands;
pub mod plugins;

pub use application::errors::{BotError, ClientError, CommandError, ConfigError, DispatchError, PluginError, RegistryError};
pub use application::messaging::{Dispatch, IgnoreReason, MessageDispatcher};
pub use application::services::{Bot, BotBuilder, WeakBot};
pub use domain::entities::{
    CommandDescriptor, Guild, Member, Message, Permissions, PluginDescriptor, PluginState, Registry, Role, User,
    UserProfile,
};
pub use domain::traits::{Command, CommandRegistry, CommandResult, Context, EventStream, GatewayEvent, PlatformClient, Plugin};
pub use infrastructure::config::{BotConfig, CommandConfig, GuildSecurity, PluginConfig, SecurityMap};
pub use infrastructure::modules::{ModuleLoader, ModuleTable};
pub use plugins::{ManagedPlugin, PluginRegistry};
