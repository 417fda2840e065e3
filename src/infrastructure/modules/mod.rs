//! Module system
//!
//! Commands and plugins are named in the config by a module `path`. Paths are
//! looked up in a static [`ModuleTable`] first and fall back to shared
//! libraries loaded from disk.

pub mod loader;
pub mod table;

pub use loader::{Loadable, ModuleLoader};
pub use table::{CommandFactory, ModuleTable, PluginFactory};
