use async_trait::async_trait;
use tokio::sync::mpsc;
use crate::application::errors::ClientError;
use crate::domain::entities::{Message, Permissions, User, UserProfile};

/// Notifications delivered by the platform client
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    /// The session is established. Delivered once per login.
    Ready,
    /// A message was posted somewhere the bot can see.
    Message(Message),
}

/// Stream of gateway events, in delivery order
pub type EventStream = mpsc::Receiver<GatewayEvent>;

/// Capability set the framework needs from a chat-platform client.
///
/// The framework never speaks a platform protocol itself; adapters implement
/// this trait.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// The bot's own account
    fn user(&self) -> User;

    /// Connect and authenticate, returning the event stream
    async fn login(&self, token: Option<&str>) -> Result<EventStream, ClientError>;

    /// Send a text message to a channel
    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), ClientError>;

    /// Look up a user by id
    async fn fetch_user(&self, user_id: &str) -> Result<UserProfile, ClientError>;

    /// Build an invite link requesting `permissions`
    async fn generate_invite(&self, permissions: Permissions) -> Result<String, ClientError>;
}
