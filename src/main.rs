use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use op_bot::infrastructure::adapters::ConsoleClient;
use op_bot::{Bot, BotConfig, BotError, CommandConfig, Permissions, PluginConfig};

#[derive(Parser)]
#[command(name = "op-bot")]
#[command(about = "A command and plugin framework for chat bots", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Connection token (overrides config and OP_BOT_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Print a default config
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_bot(cli.config, cli.token),
        Commands::Version => {
            println!("op-bot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(),
    }
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .init();
}

fn run_bot(config_path: PathBuf, token_override: Option<String>) -> ExitCode {
    let mut config = match BotConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            init_logging("info");
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    config.apply_env();
    if token_override.is_some() {
        config.token = token_override;
    }

    init_logging(&config.log_level);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result: Result<(), BotError> = rt.block_on(async {
        let client = Arc::new(ConsoleClient::new(config.name.clone()));
        let bot = Bot::builder(config, client).build()?;
        bot.run().await
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_config() -> ExitCode {
    let config = BotConfig {
        permissions: Permissions::SEND_MESSAGES,
        admins: vec!["console".to_string()],
        commands: vec![
            CommandConfig::new("echo")
                .with_description("Repeats a message.")
                .with_help("USAGE: echo <TEXT>")
                .with_path("builtin:echo")
                .with_security(Default::default()),
            CommandConfig::new("fetch-user")
                .with_description("Shows a user's profile.")
                .with_help("USAGE: fetch-user <ID>")
                .with_path("builtin:fetch-user"),
        ],
        plugins: vec![PluginConfig::new("management")
            .with_description("Plugin and command management.")
            .with_path("builtin:management")
            .enabled(true)],
        ..BotConfig::default()
    };

    match serde_yaml::to_string(&config) {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("# Save this to config.yaml and adjust as needed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render config: {}", e);
            ExitCode::FAILURE
        }
    }
}
