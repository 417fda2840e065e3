//! Plugin manager - owns each plugin's activation state

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use crate::application::errors::PluginError;
use crate::application::services::Bot;
use crate::domain::entities::{PluginDescriptor, PluginState, Registry};
use crate::domain::traits::{PlatformClient, Plugin};

/// Registry of loaded plugins, keyed by name
pub type PluginRegistry = Registry<ManagedPlugin>;

/// A plugin together with its Inactive/Active state.
///
/// The state only changes through [`activate`](Self::activate) and
/// [`deactivate`](Self::deactivate). A transition holds an async lock across
/// the hook, so concurrent calls collapse into one hook invocation. A failed
/// hook leaves the state untouched.
pub struct ManagedPlugin {
    plugin: Arc<dyn Plugin>,
    transition: Mutex<PluginState>,
    active: AtomicBool,
}

impl ManagedPlugin {
    pub fn new(plugin: Arc<dyn Plugin>) -> Self {
        Self {
            plugin,
            transition: Mutex::new(PluginState::Inactive),
            active: AtomicBool::new(false),
        }
    }

    pub fn name(&self) -> &str {
        self.plugin.name()
    }

    pub fn descriptor(&self) -> &PluginDescriptor {
        self.plugin.descriptor()
    }

    pub fn plugin(&self) -> &Arc<dyn Plugin> {
        &self.plugin
    }

    pub fn state(&self) -> PluginState {
        if self.active.load(Ordering::Acquire) {
            PluginState::Active
        } else {
            PluginState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Activate the plugin if it is inactive.
    ///
    /// Returns `Ok(true)` if `initialize` ran, `Ok(false)` if the plugin was
    /// already active.
    pub async fn activate(&self, bot: &Bot, client: &dyn PlatformClient) -> Result<bool, PluginError> {
        let mut state = self.transition.lock().await;
        if state.is_active() {
            return Ok(false);
        }

        self.plugin.initialize(bot, client).await?;
        *state = PluginState::Active;
        self.active.store(true, Ordering::Release);
        debug!("{} - initialized", self.name());
        Ok(true)
    }

    /// Deactivate the plugin if it is active.
    ///
    /// Returns `Ok(true)` if `deinitialize` ran, `Ok(false)` if the plugin was
    /// already inactive.
    pub async fn deactivate(&self, bot: &Bot, client: &dyn PlatformClient) -> Result<bool, PluginError> {
        let mut state = self.transition.lock().await;
        if !state.is_active() {
            return Ok(false);
        }

        self.plugin.deinitialize(bot, client).await?;
        *state = PluginState::Inactive;
        self.active.store(false, Ordering::Release);
        debug!("{} - deinitialized", self.name());
        Ok(true)
    }

    pub fn info(&self) -> PluginInfo {
        let descriptor = self.descriptor();
        PluginInfo {
            name: descriptor.name().to_string(),
            description: descriptor.description().to_string(),
            version: descriptor.version().to_string(),
            enabled: descriptor.enabled(),
            state: self.state().to_string(),
        }
    }
}

/// Plugin information for listing
#[derive(Debug, Clone)]
pub struct PluginInfo {
    pub name: String,
    pub description: String,
    pub version: String,
    pub enabled: bool,
    pub state: String,
}
