//! Plugin system
//!
//! Plugin lifecycle management and the built-in management plugin.

pub mod manager;
pub mod management;

pub use manager::{ManagedPlugin, PluginInfo, PluginRegistry};
pub use management::ManagementPlugin;
