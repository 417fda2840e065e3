//! Domain entities - Core objects of the command framework

pub mod user;
pub mod message;
pub mod permissions;
pub mod command;
pub mod plugin;
pub mod registry;

pub use user::{User, UserProfile};
pub use message::{Message, Guild, Member, Role};
pub use permissions::Permissions;
pub use command::CommandDescriptor;
pub use plugin::{PluginDescriptor, PluginState};
pub use registry::Registry;
