//! Domain traits - Abstractions implemented by modules and platform adapters

pub mod client;
pub mod command;
pub mod plugin;

pub use client::{EventStream, GatewayEvent, PlatformClient};
pub use command::{Command, CommandRegistry, CommandResult, Context};
pub use plugin::Plugin;
