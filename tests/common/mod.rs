//! Shared test doubles: a recording platform client, commands and plugins

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::sync::mpsc;

use op_bot::{
    Bot, BotConfig, ClientError, Command, CommandConfig, CommandDescriptor, CommandError, CommandResult, Context,
    EventStream, GatewayEvent, Message, PlatformClient, Permissions, Plugin, PluginConfig, PluginDescriptor,
    PluginError, User, UserProfile,
};

pub const BOT_ID: &str = "1000";
pub const ADMIN_ID: &str = "1";

static INIT: Once = Once::new();

pub fn ensure_init() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Platform client that records everything sent through it
pub struct MockClient {
    user: User,
    events: Mutex<Vec<GatewayEvent>>,
    sent: Mutex<Vec<(String, String)>>,
    invites: Mutex<Vec<Permissions>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self {
            user: User::new(BOT_ID).with_username("op").bot(),
            events: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            invites: Mutex::new(Vec::new()),
        }
    }

    /// Events delivered by the next login, after which the stream closes
    pub fn with_events(self, events: Vec<GatewayEvent>) -> Self {
        *self.events.lock().unwrap() = events;
        self
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }

    pub fn invites(&self) -> Vec<Permissions> {
        self.invites.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlatformClient for MockClient {
    fn user(&self) -> User {
        self.user.clone()
    }

    async fn login(&self, _token: Option<&str>) -> Result<EventStream, ClientError> {
        let events = std::mem::take(&mut *self.events.lock().unwrap());
        let (tx, rx) = mpsc::channel(events.len() + 1);
        for event in events {
            tx.send(event).await.map_err(|e| ClientError::Connection(e.to_string()))?;
        }
        Ok(rx)
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> Result<(), ClientError> {
        self.sent.lock().unwrap().push((channel_id.to_string(), content.to_string()));
        Ok(())
    }

    async fn fetch_user(&self, user_id: &str) -> Result<UserProfile, ClientError> {
        if user_id != ADMIN_ID {
            return Err(ClientError::NotFound(format!("user {}", user_id)));
        }
        Ok(UserProfile {
            id: user_id.to_string(),
            tag: "admin#0001".to_string(),
            avatar_url: None,
            created_at: Utc::now(),
            presence: "online".to_string(),
        })
    }

    async fn generate_invite(&self, permissions: Permissions) -> Result<String, ClientError> {
        self.invites.lock().unwrap().push(permissions);
        Ok(format!("https://invite.example/{}?p={}", BOT_ID, permissions.bits()))
    }
}

/// Command that counts invocations and remembers the last argv
pub struct RecordingCommand {
    descriptor: CommandDescriptor,
    pub calls: AtomicUsize,
    pub last_argv: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingCommand {
    pub fn new(config: CommandConfig) -> Arc<Self> {
        Arc::new(Self {
            descriptor: CommandDescriptor::new(config),
            calls: AtomicUsize::new(0),
            last_argv: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    pub fn failing(config: CommandConfig) -> Arc<Self> {
        Arc::new(Self {
            descriptor: CommandDescriptor::new(config),
            calls: AtomicUsize::new(0),
            last_argv: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Command for RecordingCommand {
    fn descriptor(&self) -> &CommandDescriptor {
        &self.descriptor
    }

    async fn exec(&self, argv: &[String], _ctx: &Context) -> CommandResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_argv.lock().unwrap() = argv.to_vec();
        if self.fail {
            return Err(CommandError::ExecutionFailed("boom".to_string()));
        }
        Ok(None)
    }
}

/// Plugin that registers fixed commands and counts hook calls
pub struct CountingPlugin {
    descriptor: PluginDescriptor,
    commands: Vec<String>,
    pub inits: AtomicUsize,
    pub deinits: AtomicUsize,
    fail_init: bool,
}

impl CountingPlugin {
    pub fn new(config: PluginConfig, commands: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            descriptor: PluginDescriptor::new(config),
            commands: commands.iter().map(|c| c.to_string()).collect(),
            inits: AtomicUsize::new(0),
            deinits: AtomicUsize::new(0),
            fail_init: false,
        })
    }

    pub fn failing(config: PluginConfig) -> Arc<Self> {
        Arc::new(Self {
            descriptor: PluginDescriptor::new(config),
            commands: Vec::new(),
            inits: AtomicUsize::new(0),
            deinits: AtomicUsize::new(0),
            fail_init: true,
        })
    }

    pub fn inits(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub fn deinits(&self) -> usize {
        self.deinits.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Plugin for CountingPlugin {
    fn descriptor(&self) -> &PluginDescriptor {
        &self.descriptor
    }

    async fn initialize(&self, bot: &Bot, _client: &dyn PlatformClient) -> Result<(), PluginError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        // Yield so concurrent activations overlap.
        tokio::task::yield_now().await;
        if self.fail_init {
            return Err(PluginError::Hook {
                plugin: self.name().to_string(),
                hook: "initialize",
                reason: "refused".to_string(),
            });
        }
        for name in &self.commands {
            let command: Arc<dyn Command> = RecordingCommand::new(CommandConfig::new(name.as_str()));
            bot.commands().insert(name.as_str(), command)?;
        }
        Ok(())
    }

    async fn deinitialize(&self, bot: &Bot, _client: &dyn PlatformClient) -> Result<(), PluginError> {
        self.deinits.fetch_add(1, Ordering::SeqCst);
        for name in &self.commands {
            bot.commands().remove(name)?;
        }
        Ok(())
    }
}

pub fn admin_config() -> BotConfig {
    BotConfig {
        admins: vec![ADMIN_ID.to_string()],
        ..BotConfig::default()
    }
}

/// A message from `author` addressed to the bot
pub fn addressed(author: &str, rest: &str) -> Message {
    Message::new("chan", User::new(author), format!("<@{}> {}", BOT_ID, rest))
}
