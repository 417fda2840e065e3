use async_trait::async_trait;
use crate::application::errors::PluginError;
use crate::application::services::Bot;
use crate::domain::entities::PluginDescriptor;
use super::PlatformClient;

/// A behavioral extension with an activate/deactivate lifecycle.
///
/// Hooks are only ever called through `ManagedPlugin`, which guarantees that
/// `initialize` runs once per Inactive→Active transition and `deinitialize`
/// once per Active→Inactive transition. Hooks run inside the bot's tracing
/// span.
#[async_trait]
pub trait Plugin: Send + Sync {
    fn descriptor(&self) -> &PluginDescriptor;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    /// Set the plugin up, typically by registering commands on `bot`.
    async fn initialize(&self, bot: &Bot, client: &dyn PlatformClient) -> Result<(), PluginError> {
        let _ = (bot, client);
        Err(PluginError::NotImplemented {
            plugin: self.name().to_string(),
            hook: "initialize",
        })
    }

    /// Undo whatever `initialize` did.
    async fn deinitialize(&self, bot: &Bot, client: &dyn PlatformClient) -> Result<(), PluginError> {
        let _ = (bot, client);
        Err(PluginError::NotImplemented {
            plugin: self.name().to_string(),
            hook: "deinitialize",
        })
    }
}
