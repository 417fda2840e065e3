//! Message dispatcher - Routes addressed messages to commands

use std::fmt;
use std::sync::Arc;
use tracing::debug;
use crate::application::errors::DispatchError;
use crate::domain::entities::Message;
use crate::domain::traits::{CommandRegistry, Context, PlatformClient};
use super::parser::MessageParser;

/// Why a message was dropped without looking up a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Authored by a bot account
    FromBot,
    /// Authored by this bot
    FromSelf,
    /// Does not open with the bot's mention
    NotAddressed,
    /// A bare mention with no command name
    NoCommand,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            IgnoreReason::FromBot => "authored by a bot",
            IgnoreReason::FromSelf => "authored by self",
            IgnoreReason::NotAddressed => "not addressed",
            IgnoreReason::NoCommand => "no command given",
        };
        f.write_str(reason)
    }
}

/// What happened to a dispatched message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Ignored(IgnoreReason),
    /// The author may not run the command; nothing was sent
    Unauthorized { command: String },
    Executed { command: String, output: Option<String> },
}

/// Filters, parses, authorizes and executes one message at a time.
///
/// Holds no state of its own between messages.
pub struct MessageDispatcher<'a> {
    commands: &'a CommandRegistry,
    admins: &'a [String],
    client: Arc<dyn PlatformClient>,
}

impl<'a> MessageDispatcher<'a> {
    pub fn new(commands: &'a CommandRegistry, admins: &'a [String], client: Arc<dyn PlatformClient>) -> Self {
        Self {
            commands,
            admins,
            client,
        }
    }

    /// Route a message to its command.
    ///
    /// Unknown commands are an error; unauthorized ones are silently dropped.
    /// Errors from the command itself are passed back to the caller.
    pub async fn dispatch(&self, message: Message) -> Result<Dispatch, DispatchError> {
        let identity = self.client.user();
        if message.author.is_bot {
            return Ok(Dispatch::Ignored(IgnoreReason::FromBot));
        }
        if message.author.id == identity.id {
            return Ok(Dispatch::Ignored(IgnoreReason::FromSelf));
        }

        let argv = match MessageParser::new(&identity).parse(&message.content) {
            None => return Ok(Dispatch::Ignored(IgnoreReason::NotAddressed)),
            Some(argv) if argv.is_empty() => return Ok(Dispatch::Ignored(IgnoreReason::NoCommand)),
            Some(argv) => argv,
        };

        let name = argv[0].clone();
        let command = self.commands
            .lookup(&name)?
            .ok_or_else(|| DispatchError::CommandNotFound(name.clone()))?;

        let is_admin = self.admins.iter().any(|id| *id == message.author.id);
        if !(is_admin || command.is_permitted(&message, self.admins)) {
            debug!("{} may not run {}, ignoring", message.author.id, name);
            return Ok(Dispatch::Unauthorized { command: name });
        }

        debug!("Running command {} with args: {:?}", name, argv);
        let ctx = Context::new(message, Arc::clone(&self.client));
        let output = command.exec(&argv, &ctx).await.map_err(|source| DispatchError::Execution {
            command: name.clone(),
            source,
        })?;
        debug!("Command {} succeeded.", name);

        Ok(Dispatch::Executed { command: name, output })
    }
}
