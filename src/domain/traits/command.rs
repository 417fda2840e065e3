use async_trait::async_trait;
use std::sync::Arc;
use crate::application::errors::{ClientError, CommandError};
use crate::domain::entities::{CommandDescriptor, Message, Registry};
use super::PlatformClient;

/// Registry of loaded commands, keyed by name
pub type CommandRegistry = Registry<dyn Command>;

/// What a command did: the text it replied with, if any
pub type CommandResult = Result<Option<String>, CommandError>;

/// Everything a running command may touch besides its arguments
#[derive(Clone)]
pub struct Context {
    message: Message,
    client: Arc<dyn PlatformClient>,
}

impl Context {
    pub fn new(message: Message, client: Arc<dyn PlatformClient>) -> Self {
        Self { message, client }
    }

    /// The message that invoked the command
    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn client(&self) -> &dyn PlatformClient {
        self.client.as_ref()
    }

    /// Send `text` to the channel the command was invoked from.
    pub async fn reply(&self, text: impl Into<String>) -> Result<String, ClientError> {
        let text = text.into();
        self.client.send_message(&self.message.channel_id, &text).await?;
        Ok(text)
    }

    /// Report `err` to the invoking channel and hand it back to be returned.
    pub async fn reply_err(&self, err: CommandError) -> CommandError {
        if let Err(e) = self.reply(err.to_string()).await {
            tracing::warn!("Failed to report error to channel {}: {}", self.message.channel_id, e);
        }
        err
    }
}

/// A unit of bot functionality invoked by an addressed chat message.
///
/// Implementors provide a descriptor and `exec`; authorization comes from the
/// descriptor's security settings.
#[async_trait]
pub trait Command: Send + Sync {
    fn descriptor(&self) -> &CommandDescriptor;

    fn name(&self) -> &str {
        self.descriptor().name()
    }

    fn is_permitted(&self, message: &Message, admins: &[String]) -> bool {
        self.descriptor().is_permitted(message, admins)
    }

    /// Run the command. `argv[0]` is the command name.
    async fn exec(&self, argv: &[String], ctx: &Context) -> CommandResult {
        let _ = (argv, ctx);
        Err(CommandError::NotImplemented(self.name().to_string()))
    }
}
