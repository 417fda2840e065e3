//! Message parser - Recognises addressed messages and splits them into argv

use crate::domain::entities::User;

/// Parses commands addressed to a particular bot account
pub struct MessageParser<'a> {
    identity: &'a User,
}

impl<'a> MessageParser<'a> {
    pub fn new(identity: &'a User) -> Self {
        Self { identity }
    }

    /// Whether `content` starts with the opening mention of the bot.
    ///
    /// The mention must be the very first token, with nothing before it.
    pub fn is_opening_mention(&self, content: &str) -> bool {
        content
            .split(char::is_whitespace)
            .next()
            .is_some_and(|first| self.identity.is_mentioned_by(first))
    }

    /// Split an addressed message into argv (the mention itself excluded).
    ///
    /// Returns `None` when the message is not addressed to the bot. The
    /// returned vector is empty for a bare mention.
    pub fn parse(&self, content: &str) -> Option<Vec<String>> {
        if !self.is_opening_mention(content) {
            return None;
        }

        Some(
            content
                .split_whitespace()
                .skip(1)
                .map(str::to_string)
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_addressed_message() {
        let bot = User::new("42");
        let parser = MessageParser::new(&bot);
        assert_eq!(
            parser.parse("<@42> echo   hello\tworld"),
            Some(vec!["echo".to_string(), "hello".to_string(), "world".to_string()])
        );
        assert_eq!(parser.parse("<@!42> ping"), Some(vec!["ping".to_string()]));
    }

    #[test]
    fn test_bare_mention_has_empty_argv() {
        let bot = User::new("42");
        let parser = MessageParser::new(&bot);
        assert_eq!(parser.parse("<@42>"), Some(vec![]));
        assert_eq!(parser.parse("<@42>   "), Some(vec![]));
    }

    #[test]
    fn test_mention_must_open_the_message() {
        let bot = User::new("42");
        let parser = MessageParser::new(&bot);
        assert_eq!(parser.parse("hey <@42> echo"), None);
        assert_eq!(parser.parse(" <@42> echo"), None);
        assert_eq!(parser.parse("<@43> echo"), None);
        assert_eq!(parser.parse("<@42>echo"), None);
        assert_eq!(parser.parse("echo"), None);
        assert_eq!(parser.parse(""), None);
    }
}
