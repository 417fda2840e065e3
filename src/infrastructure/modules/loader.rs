//! Module loader - turns config entries into command and plugin objects
//!
//! A module is found by its `path`: first in the [`ModuleTable`], then as a
//! shared library on disk. Shared libraries must export a constructor named
//! `op_command_create` or `op_plugin_create`; see [`export_command!`] and
//! [`export_plugin!`]. Such libraries must be built with the same compiler
//! and the same version of this crate as the host.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use libloading::Library;
use tracing::{debug, info};
use crate::application::errors::ConfigError;
use crate::domain::traits::{Command, Plugin};
use crate::infrastructure::config::{CommandConfig, ModuleConfig, PluginConfig};
use super::table::ModuleTable;

/// A config entry kind the loader knows how to instantiate
pub trait Loadable: ModuleConfig + Sized {
    type Object: ?Sized;

    /// Exported constructor symbol in a module library
    const SYMBOL: &'static [u8];

    fn factory(table: &ModuleTable, path: &str) -> Option<fn(&Self) -> Box<Self::Object>>;
}

impl Loadable for CommandConfig {
    type Object = dyn Command;

    const SYMBOL: &'static [u8] = b"op_command_create";

    fn factory(table: &ModuleTable, path: &str) -> Option<fn(&Self) -> Box<dyn Command>> {
        table.command(path)
    }
}

impl Loadable for PluginConfig {
    type Object = dyn Plugin;

    const SYMBOL: &'static [u8] = b"op_plugin_create";

    fn factory(table: &ModuleTable, path: &str) -> Option<fn(&Self) -> Box<dyn Plugin>> {
        table.plugin(path)
    }
}

/// Loads modules relative to a base directory.
///
/// Libraries opened while loading are kept by the loader; whoever owns the
/// loaded objects must also own the libraries (see [`into_libraries`](Self::into_libraries))
/// and drop them last.
pub struct ModuleLoader<'a> {
    base: PathBuf,
    table: &'a ModuleTable,
    libraries: Vec<Library>,
}

impl<'a> ModuleLoader<'a> {
    pub fn new(base: impl Into<PathBuf>, table: &'a ModuleTable) -> Self {
        Self {
            base: base.into(),
            table,
            libraries: Vec::new(),
        }
    }

    /// Instantiate every entry of `configs` and merge the results into
    /// `initial`.
    ///
    /// Entries with an empty path are placeholders for modules registered in
    /// code and are skipped. Any failure aborts the whole load.
    pub fn load<C: Loadable>(
        &mut self,
        configs: &[C],
        initial: HashMap<String, Arc<C::Object>>,
    ) -> Result<HashMap<String, Arc<C::Object>>, ConfigError> {
        let mut modules = initial;

        for config in configs {
            if config.path().trim().is_empty() {
                debug!("Skipping {}: no module path", config.name());
                continue;
            }
            if modules.contains_key(config.name()) {
                return Err(ConfigError::DuplicateModule(config.name().to_string()));
            }

            let object = self.instantiate(config)?;
            modules.insert(config.name().to_string(), Arc::from(object));
        }

        Ok(modules)
    }

    /// Libraries opened so far
    pub fn into_libraries(self) -> Vec<Library> {
        self.libraries
    }

    fn instantiate<C: Loadable>(&mut self, config: &C) -> Result<Box<C::Object>, ConfigError> {
        if let Some(factory) = C::factory(self.table, config.path()) {
            debug!("Loading {} from module table ({})", config.name(), config.path());
            return Ok(factory(config));
        }

        let resolved = self.resolve(config.path());
        if let Some(factory) = C::factory(self.table, &resolved.to_string_lossy()) {
            debug!("Loading {} from module table ({})", config.name(), resolved.display());
            return Ok(factory(config));
        }

        self.load_library(config, resolved)
    }

    /// Absolute paths are used as-is; anything else is joined onto the base.
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base.join(path)
        }
    }

    fn load_library<C: Loadable>(&mut self, config: &C, path: PathBuf) -> Result<Box<C::Object>, ConfigError> {
        let path = if path.extension().is_none() {
            path.with_extension(std::env::consts::DLL_EXTENSION)
        } else {
            path
        };

        let fail = |reason: String| ConfigError::ModuleLoad {
            name: config.name().to_string(),
            path: path.clone(),
            reason,
        };

        if !path.is_file() {
            return Err(fail("no such module".to_string()));
        }

        // SAFETY: loading runs the library's initialisers; module libraries are trusted configuration.
        let library = unsafe { Library::new(&path) }
            .map_err(|e| fail(format!("Failed to load library: {}", e)))?;

        // SAFETY: the symbol type matches what export_command!/export_plugin! generate.
        let create: fn(&C) -> Box<C::Object> = unsafe {
            *library
                .get::<fn(&C) -> Box<C::Object>>(C::SYMBOL)
                .map_err(|e| fail(format!("Failed to find constructor: {}", e)))?
        };

        let object = create(config);
        self.libraries.push(library);
        info!("Loaded {} from {}", config.name(), path.display());
        Ok(object)
    }
}

/// Export a command constructor from a module library.
///
/// ```ignore
/// op_bot::export_command!(MyCommand::create);
/// ```
#[macro_export]
macro_rules! export_command {
    ($factory:expr) => {
        #[no_mangle]
        pub fn op_command_create(
            config: &$crate::infrastructure::config::CommandConfig,
        ) -> Box<dyn $crate::domain::traits::Command> {
            let factory: $crate::infrastructure::modules::CommandFactory = $factory;
            factory(config)
        }
    };
}

/// Export a plugin constructor from a module library.
#[macro_export]
macro_rules! export_plugin {
    ($factory:expr) => {
        #[no_mangle]
        pub fn op_plugin_create(
            config: &$crate::infrastructure::config::PluginConfig,
        ) -> Box<dyn $crate::domain::traits::Plugin> {
            let factory: $crate::infrastructure::modules::PluginFactory = $factory;
            factory(config)
        }
    };
}
