//! Bot orchestrator - wires config, registries and the platform client

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use libloading::Library;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, info_span, warn, Instrument, Span};
use crate::application::errors::{BotError, DispatchError, PluginError};
use crate::application::messaging::{Dispatch, MessageDispatcher};
use crate::domain::entities::Message;
use crate::domain::traits::{Command, CommandRegistry, GatewayEvent, PlatformClient, Plugin};
use crate::infrastructure::config::BotConfig;
use crate::infrastructure::modules::{ModuleLoader, ModuleTable};
use crate::plugins::{ManagedPlugin, PluginRegistry};

/// The running bot.
///
/// Cheap to clone; clones share the same registries and client.
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

/// Non-owning handle to a [`Bot`], for modules that must not keep it alive
#[derive(Clone)]
pub struct WeakBot(Weak<BotInner>);

struct BotInner {
    config: Arc<BotConfig>,
    commands: CommandRegistry,
    plugins: PluginRegistry,
    client: Arc<dyn PlatformClient>,
    span: Span,
    ready: AtomicBool,
    // Declared last: module objects above may point into these libraries.
    _libraries: Vec<Library>,
}

/// Builds a [`Bot`] from config plus modules registered in code
pub struct BotBuilder {
    config: BotConfig,
    client: Arc<dyn PlatformClient>,
    table: ModuleTable,
    commands: HashMap<String, Arc<dyn Command>>,
    plugins: HashMap<String, Arc<dyn Plugin>>,
}

impl BotBuilder {
    pub fn new(config: BotConfig, client: Arc<dyn PlatformClient>) -> Self {
        Self {
            config,
            client,
            table: ModuleTable::with_builtins(),
            commands: HashMap::new(),
            plugins: HashMap::new(),
        }
    }

    /// Replace the module table (defaults to the built-in modules)
    pub fn with_table(mut self, table: ModuleTable) -> Self {
        self.table = table;
        self
    }

    /// Pre-register a command under its own name
    pub fn with_command(mut self, command: Arc<dyn Command>) -> Self {
        self.commands.insert(command.name().to_string(), command);
        self
    }

    /// Pre-register a plugin under its own name
    pub fn with_plugin(mut self, plugin: Arc<dyn Plugin>) -> Self {
        self.plugins.insert(plugin.name().to_string(), plugin);
        self
    }

    /// Freeze the config and load every configured module.
    ///
    /// Fails if any module cannot be resolved or instantiated.
    pub fn build(self) -> Result<Bot, BotError> {
        self.config.validate()?;
        let config = Arc::new(self.config);

        let mut loader = ModuleLoader::new(config.module_base(), &self.table);
        let plugins = loader.load(&config.plugins, self.plugins)?;
        let commands = loader.load(&config.commands, self.commands)?;
        let libraries = loader.into_libraries();

        let plugins: HashMap<String, Arc<ManagedPlugin>> = plugins
            .into_iter()
            .map(|(name, plugin)| (name, Arc::new(ManagedPlugin::new(plugin))))
            .collect();

        let span = info_span!("bot", name = %config.name);
        span.in_scope(|| {
            debug!("Loaded {} commands and {} plugins", commands.len(), plugins.len());
        });

        Ok(Bot {
            inner: Arc::new(BotInner {
                config,
                commands: CommandRegistry::from_map(commands),
                plugins: PluginRegistry::from_map(plugins),
                client: self.client,
                span,
                ready: AtomicBool::new(false),
                _libraries: libraries,
            }),
        })
    }
}

impl Bot {
    pub fn builder(config: BotConfig, client: Arc<dyn PlatformClient>) -> BotBuilder {
        BotBuilder::new(config, client)
    }

    /// The frozen configuration
    pub fn config(&self) -> &BotConfig {
        &self.inner.config
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.inner.commands
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.inner.plugins
    }

    pub fn client(&self) -> &Arc<dyn PlatformClient> {
        &self.inner.client
    }

    /// Span every handler of this bot runs in
    pub fn span(&self) -> &Span {
        &self.inner.span
    }

    pub fn downgrade(&self) -> WeakBot {
        WeakBot(Arc::downgrade(&self.inner))
    }

    /// Log in and process events until the client closes the stream.
    ///
    /// `Ready` is handled before any further event is read; each message is
    /// handled in its own task. Returns once every message task has finished.
    pub async fn run(&self) -> Result<(), BotError> {
        let mut events = self.client().login(self.config().token.as_deref()).await?;
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(GatewayEvent::Ready) => self.on_ready().await,
                    Some(GatewayEvent::Message(message)) => {
                        let bot = self.clone();
                        tasks.spawn(async move { bot.on_message(message).await });
                    }
                    None => break,
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => reap(joined),
            }
        }

        while let Some(joined) = tasks.join_next().await {
            reap(joined);
        }
        self.span().in_scope(|| info!("Event stream closed"));
        Ok(())
    }

    /// Startup: activate enabled plugins and log the invite link.
    ///
    /// Runs once; later calls return immediately. A plugin that fails to
    /// activate is logged and skipped.
    pub async fn on_ready(&self) {
        if self.inner.ready.swap(true, Ordering::AcqRel) {
            debug!("Ignoring repeated ready event");
            return;
        }

        async {
            let config = self.config();
            info!("{} - {}", config.name, config.version);

            for (name, plugin) in self.plugins().entries() {
                let enabled = plugin.descriptor().enabled();
                debug!("{} - {}", name, if enabled { "enabled" } else { "disabled" });
                if !enabled {
                    continue;
                }
                if let Err(e) = plugin.activate(self, self.client().as_ref()).await {
                    error!("Failed to activate plugin {}: {}", name, e);
                }
            }

            match self.client().generate_invite(config.permissions).await {
                Ok(invite) => info!("Invite me: {}", invite),
                Err(e) => warn!("Failed to generate invite: {}", e),
            }
        }
        .instrument(self.span().clone())
        .await
    }

    /// Dispatch one message, returning what happened.
    pub async fn handle_message(&self, message: Message) -> Result<Dispatch, DispatchError> {
        let dispatcher = MessageDispatcher::new(
            self.commands(),
            &self.config().admins,
            Arc::clone(self.client()),
        );
        dispatcher
            .dispatch(message)
            .instrument(self.span().clone())
            .await
    }

    /// Dispatch one message; errors are logged, never returned.
    pub async fn on_message(&self, message: Message) {
        let message_id = message.id.clone();
        match self.handle_message(message).await {
            Ok(Dispatch::Ignored(reason)) => {
                self.span().in_scope(|| debug!("Message {} ignored: {}", message_id, reason));
            }
            Ok(_) => {}
            Err(e) => {
                self.span().in_scope(|| error!("Message {}: {}", message_id, e));
            }
        }
    }

    /// Activate a plugin by name. Returns whether a transition happened.
    pub async fn activate_plugin(&self, name: &str) -> Result<bool, PluginError> {
        let plugin = self.plugin(name)?;
        plugin
            .activate(self, self.client().as_ref())
            .instrument(self.span().clone())
            .await
    }

    /// Deactivate a plugin by name. Returns whether a transition happened.
    pub async fn deactivate_plugin(&self, name: &str) -> Result<bool, PluginError> {
        let plugin = self.plugin(name)?;
        plugin
            .deactivate(self, self.client().as_ref())
            .instrument(self.span().clone())
            .await
    }

    fn plugin(&self, name: &str) -> Result<Arc<ManagedPlugin>, PluginError> {
        self.plugins()
            .lookup(name)?
            .ok_or_else(|| PluginError::NotFound(name.to_string()))
    }
}

impl WeakBot {
    /// The bot, if it is still alive
    pub fn upgrade(&self) -> Option<Bot> {
        self.0.upgrade().map(|inner| Bot { inner })
    }
}

fn reap(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!("Message handler failed: {}", e);
    }
}
