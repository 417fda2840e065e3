//! Console client for development/testing
//!
//! Reads lines from stdin and delivers them as messages from a local user.
//! A leading `@<bot name>` is rewritten into the bot's mention token, so
//! `@op echo hi` addresses the bot.

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use crate::application::errors::ClientError;
use crate::domain::entities::{Message, Permissions, User, UserProfile};
use crate::domain::traits::{EventStream, GatewayEvent, PlatformClient};

const CHANNEL: &str = "console";
const EVENT_BUFFER: usize = 64;

/// Console platform client for local development
pub struct ConsoleClient {
    user: User,
    author: User,
}

impl ConsoleClient {
    pub fn new(bot_name: impl Into<String>) -> Self {
        Self {
            user: User::new("0").with_username(bot_name).bot(),
            author: User::new("console").with_username("console"),
        }
    }

    /// Turn a typed line into a message, expanding a leading `@name`.
    pub fn to_message(&self, line: &str) -> Message {
        let content = match line.split_once(char::is_whitespace) {
            Some((first, rest)) if self.is_alias(first) => format!("{} {}", self.user.mention(), rest),
            None if self.is_alias(line) => self.user.mention(),
            _ => line.to_string(),
        };
        Message::new(CHANNEL, self.author.clone(), content)
    }

    fn is_alias(&self, token: &str) -> bool {
        token
            .strip_prefix('@')
            .is_some_and(|name| name == self.user.display_name() || name == self.user.id)
    }
}

impl Default for ConsoleClient {
    fn default() -> Self {
        Self::new("op")
    }
}

#[async_trait]
impl PlatformClient for ConsoleClient {
    fn user(&self) -> User {
        self.user.clone()
    }

    async fn login(&self, _token: Option<&str>) -> Result<EventStream, ClientError> {
        tracing::info!("Starting console client (dev mode)");
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        tx.send(GatewayEvent::Ready)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        let client = ConsoleClient {
            user: self.user.clone(),
            author: self.author.clone(),
        };
        tokio::spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        let event = GatewayEvent::Message(client.to_message(line));
                        if tx.send(event).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!("Failed to read stdin: {}", e);
                        break;
                    }
                }
            }
        });

        Ok(rx)
    }

    async fn send_message(&self, _channel_id: &str, content: &str) -> Result<(), ClientError> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(format!("[{}] {}\n", self.user, content).as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<UserProfile, ClientError> {
        let user = [&self.user, &self.author]
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ClientError::NotFound(format!("user {}", user_id)))?;

        Ok(UserProfile {
            id: user.id.clone(),
            tag: format!("{}#0000", user.display_name()),
            avatar_url: None,
            created_at: Utc::now(),
            presence: "online".to_string(),
        })
    }

    async fn generate_invite(&self, permissions: Permissions) -> Result<String, ClientError> {
        Ok(format!(
            "console://invite?client_id={}&permissions={}",
            self.user.id,
            permissions.bits()
        ))
    }
}
