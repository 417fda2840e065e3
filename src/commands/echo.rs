use async_trait::async_trait;
use crate::application::errors::CommandError;
use crate::domain::entities::CommandDescriptor;
use crate::domain::traits::{Command, CommandResult, Context};
use crate::infrastructure::config::CommandConfig;

/// Repeats whatever follows the command name
pub struct EchoCommand {
    descriptor: CommandDescriptor,
}

impl EchoCommand {
    pub fn new(config: CommandConfig) -> Self {
        Self {
            descriptor: CommandDescriptor::new(config),
        }
    }

    pub fn create(config: &CommandConfig) -> Box<dyn Command> {
        Box::new(Self::new(config.clone()))
    }
}

/// The content after the mention and the command name, spacing preserved.
fn echo_text<'a>(content: &'a str, name: &str) -> &'a str {
    let rest = content
        .split_once(char::is_whitespace)
        .map_or("", |(_, rest)| rest)
        .trim_start();
    rest.strip_prefix(name).unwrap_or(rest).trim()
}

#[async_trait]
impl Command for EchoCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    async fn exec(&self, argv: &[String], ctx: &Context) -> CommandResult {
        let name = argv.first().map(String::as_str).unwrap_or_else(|| self.name());
        let text = echo_text(&ctx.message().content, name);
        if text.is_empty() {
            return Err(CommandError::InvalidArgs("Nothing to echo.".to_string()));
        }
        Ok(Some(ctx.reply(text).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_echo_text() {
        assert_eq!(echo_text("<@1> echo hello", "echo"), "hello");
        assert_eq!(echo_text("<@1>   echo  hello   world ", "echo"), "hello   world");
        assert_eq!(echo_text("<@1> echo", "echo"), "");
        assert_eq!(echo_text("<@1>", "echo"), "");
    }
}
