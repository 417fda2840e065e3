mod common;

use common::{addressed, admin_config, ensure_init, CountingPlugin, MockClient, RecordingCommand, ADMIN_ID};
use std::path::PathBuf;
use std::sync::Arc;

use op_bot::{
    Bot, BotConfig, BotError, CommandConfig, ConfigError, GatewayEvent, Permissions, PluginConfig, PluginState,
};

#[tokio::test]
async fn test_run_activates_enabled_plugins() {
    ensure_init();
    let client = Arc::new(MockClient::new().with_events(vec![
        GatewayEvent::Ready,
        GatewayEvent::Message(addressed(ADMIN_ID, "hello")),
    ]));
    let enabled = CountingPlugin::new(PluginConfig::new("greeter").enabled(true), &["hello"]);
    let disabled = CountingPlugin::new(PluginConfig::new("sleeper"), &["snore"]);

    let mut config = admin_config();
    config.permissions = Permissions::SEND_MESSAGES | Permissions::MANAGE_ROLES;
    let bot = Bot::builder(config, client.clone())
        .with_plugin(enabled.clone())
        .with_plugin(disabled.clone())
        .build()
        .unwrap();

    bot.run().await.unwrap();

    assert_eq!(enabled.inits(), 1);
    assert_eq!(disabled.inits(), 0);
    assert_eq!(bot.plugins().get("sleeper").unwrap().state(), PluginState::Inactive);
    assert_eq!(client.invites(), vec![Permissions::SEND_MESSAGES | Permissions::MANAGE_ROLES]);
    assert!(bot.commands().contains("hello"));
    assert!(!bot.commands().contains("snore"));
}

#[tokio::test]
async fn test_run_handles_messages_after_ready() {
    ensure_init();
    let command = RecordingCommand::new(CommandConfig::new("ping"));
    let client = Arc::new(MockClient::new().with_events(vec![
        GatewayEvent::Ready,
        GatewayEvent::Message(addressed(ADMIN_ID, "ping one")),
        GatewayEvent::Message(addressed(ADMIN_ID, "missing")),
        GatewayEvent::Message(addressed("42", "ping two")),
    ]));
    let bot = Bot::builder(admin_config(), client)
        .with_command(command.clone())
        .build()
        .unwrap();

    bot.run().await.unwrap();

    assert_eq!(command.calls(), 1);
    assert_eq!(*command.last_argv.lock().unwrap(), vec!["ping", "one"]);
}

#[tokio::test]
async fn test_repeated_ready_is_ignored() {
    ensure_init();
    let client = Arc::new(MockClient::new().with_events(vec![GatewayEvent::Ready, GatewayEvent::Ready]));
    let plugin = CountingPlugin::new(PluginConfig::new("greeter").enabled(true), &[]);
    let bot = Bot::builder(admin_config(), client.clone())
        .with_plugin(plugin.clone())
        .build()
        .unwrap();

    bot.run().await.unwrap();

    assert_eq!(plugin.inits(), 1);
    assert_eq!(client.invites().len(), 1);
}

#[tokio::test]
async fn test_failing_plugin_does_not_block_startup() {
    ensure_init();
    let broken = CountingPlugin::failing(PluginConfig::new("alpha").enabled(true));
    let healthy = CountingPlugin::new(PluginConfig::new("beta").enabled(true), &["hello"]);
    let client = Arc::new(MockClient::new());
    let bot = Bot::builder(admin_config(), client.clone())
        .with_plugin(broken.clone())
        .with_plugin(healthy.clone())
        .build()
        .unwrap();

    bot.on_ready().await;

    assert_eq!(broken.inits(), 1);
    assert_eq!(healthy.inits(), 1);
    assert!(!bot.plugins().get("alpha").unwrap().is_active());
    assert!(bot.plugins().get("beta").unwrap().is_active());
    assert_eq!(client.invites().len(), 1);
}

#[tokio::test]
async fn test_missing_module_fails_build() {
    ensure_init();
    let mut config = admin_config();
    config.module_path = Some(std::env::temp_dir());
    config.commands.push(CommandConfig::new("ghost").with_path("does-not-exist"));

    let err = Bot::builder(config, Arc::new(MockClient::new())).build().err().unwrap();

    match err {
        BotError::Config(ConfigError::ModuleLoad { name, path, .. }) => {
            assert_eq!(name, "ghost");
            assert!(path.starts_with(std::env::temp_dir()));
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn test_duplicate_module_fails_build() {
    ensure_init();
    let mut config = admin_config();
    config.commands.push(CommandConfig::new("echo").with_path("builtin:echo"));
    config.commands.push(CommandConfig::new("echo").with_path("builtin:echo"));

    let err = Bot::builder(config, Arc::new(MockClient::new())).build().err().unwrap();

    assert!(matches!(err, BotError::Config(ConfigError::DuplicateModule(ref name)) if name == "echo"));
}

#[tokio::test]
async fn test_placeholder_entries_keep_registered_modules() {
    ensure_init();
    let mut config = admin_config();
    // Path-less entries document modules registered in code.
    config.commands.push(CommandConfig::new("ping"));
    config.commands.push(CommandConfig::new("echo").with_path("builtin:echo"));
    let command = RecordingCommand::new(CommandConfig::new("ping"));

    let bot = Bot::builder(config, Arc::new(MockClient::new()))
        .with_command(command)
        .build()
        .unwrap();

    assert_eq!(bot.commands().names(), vec!["echo", "ping"]);
}

#[tokio::test]
async fn test_load_config_file() {
    ensure_init();
    let dir = std::env::temp_dir().join(format!("op-bot-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.yaml");
    std::fs::write(
        &path,
        r#"
name: tester
loglevel: debug
permissions: [SEND_MESSAGES]
admins: [1, "2"]
commands:
  - name: echo
    path: builtin:echo
    security: {}
plugins:
  - name: management
    path: builtin:management
    enabled: true
"#,
    )
    .unwrap();

    let config = BotConfig::load(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.name, "tester");
    assert_eq!(config.log_level, "debug");
    assert_eq!(config.admins, vec!["1", "2"]);
    assert_eq!(config.module_path, Some(PathBuf::from(&dir)));

    let bot = Bot::builder(config, Arc::new(MockClient::new())).build().unwrap();
    assert!(bot.commands().contains("echo"));
    assert!(bot.plugins().contains("management"));
}

#[tokio::test]
async fn test_missing_config_file() {
    ensure_init();
    let path = std::env::temp_dir().join(format!("op-bot-missing-{}.yaml", uuid::Uuid::new_v4()));

    let err = BotConfig::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

fn write_config(content: &str) -> (PathBuf, PathBuf) {
    let dir = std::env::temp_dir().join(format!("op-bot-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.yaml");
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

#[tokio::test]
async fn test_relative_module_path_follows_config_file() {
    ensure_init();
    let (dir, path) = write_config("path: mods\n");

    let config = BotConfig::load(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.module_base(), dir.join("mods"));
}

#[tokio::test]
async fn test_absolute_module_path_is_kept() {
    ensure_init();
    let base = std::env::temp_dir().join("op-bot-modules");
    let (dir, path) = write_config(&format!("path: {}\n", base.display()));

    let config = BotConfig::load(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    assert_eq!(config.module_base(), base);
}

#[tokio::test]
async fn test_relative_module_path_loads_from_config_dir() {
    ensure_init();
    let (dir, path) = write_config(
        "path: mods\ncommands:\n  - name: ghost\n    path: ghost\n",
    );

    let config = BotConfig::load(&path).unwrap();
    let err = Bot::builder(config, Arc::new(MockClient::new())).build().err().unwrap();
    std::fs::remove_dir_all(&dir).unwrap();

    match err {
        BotError::Config(ConfigError::ModuleLoad { path, .. }) => {
            assert!(path.starts_with(dir.join("mods")));
        }
        other => panic!("unexpected error: {}", other),
    }
}
