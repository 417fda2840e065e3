//! Application layer errors

use std::path::PathBuf;
use thiserror::Error;

/// General bot errors
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),
}

/// Configuration errors. All of these abort startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Failed to load module '{name}' from {path}: {reason}")]
    ModuleLoad {
        name: String,
        path: PathBuf,
        reason: String,
    },

    #[error("Module '{0}' is defined more than once")]
    DuplicateModule(String),
}

/// Errors raised while routing a message to a command
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Command {0} not found.")]
    CommandNotFound(String),

    #[error("Command {command} failed: {source}")]
    Execution {
        command: String,
        #[source]
        source: CommandError,
    },

    #[error("Command lookup failed: {0}")]
    Registry(#[from] RegistryError),
}

/// Command execution errors
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Command {0} does not implement exec")]
    NotImplemented(String),

    #[error("{0}")]
    InvalidArgs(String),

    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error("Bot is no longer running")]
    BotUnavailable,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Plugin(#[from] PluginError),
}

/// Plugin lifecycle errors
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Plugin {0} not found")]
    NotFound(String),

    #[error("Plugin {plugin} does not implement {hook}")]
    NotImplemented { plugin: String, hook: &'static str },

    #[error("Plugin {plugin} failed to {hook}: {reason}")]
    Hook {
        plugin: String,
        hook: &'static str,
        reason: String,
    },

    #[error("Invalid config for plugin {plugin}: {reason}")]
    Config { plugin: String, reason: String },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Registry errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("'{0}' is already registered")]
    Duplicate(String),

    #[error("Registry lock poisoned")]
    Poisoned,
}

/// Errors surfaced by the chat-platform client.
///
/// `Auth` and `Send` are for adapters that speak a real platform protocol;
/// the console adapter only produces `Connection`, `NotFound` and `Io`.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Failed to send message: {0}")]
    Send(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
