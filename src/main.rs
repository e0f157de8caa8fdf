mod api;
mod gateway;

use clap::{Parser, Subcommand};

use aura_channels::WhatsAppMessenger;
use aura_core::config;
use aura_llm::OpenAiAssistant;
use aura_scheduler::{FeedListener, SchedulerService};
use aura_store::{feed::TASK_TABLE, Store};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "aura",
    version,
    about = "Aura — WhatsApp personal assistant"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the assistant: webhook server, scheduler, and feed listener.
    Start,
    /// Check configuration and store health.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(cfg.aura.log_level.clone())),
        )
        .init();

    match cli.command {
        Commands::Start => start(cfg).await,
        Commands::Status => status(&cli.config, cfg).await,
    }
}

async fn start(cfg: config::Config) -> anyhow::Result<()> {
    let messenger = WhatsAppMessenger::new(cfg.whatsapp.clone());
    if !messenger.is_configured() {
        anyhow::bail!(
            "WhatsApp is not configured. Set whatsapp.token and whatsapp.phone_number_id \
             in config.toml (or the WHATSAPP_TOKEN env var)."
        );
    }
    let assistant = OpenAiAssistant::new(cfg.llm.clone());
    if !assistant.is_configured() {
        anyhow::bail!(
            "No language-model API key. Set llm.api_key in config.toml or the OPENAI_KEY env var."
        );
    }
    if cfg.whatsapp.verify_token.is_empty() {
        anyhow::bail!(
            "No webhook verification token. Set whatsapp.verify_token in config.toml \
             or the WEBHOOK_VERIFICATION_TOKEN env var."
        );
    }

    let store = Store::new(&cfg.store).await?;
    let messenger: Arc<dyn aura_core::traits::Messenger> = Arc::new(messenger);
    let assistant: Arc<dyn aura_core::traits::Assistant> = Arc::new(assistant);

    // Scheduler plus the feed listener that keeps its job table in sync
    // with the task store.
    let scheduler = SchedulerService::new(
        Arc::new(store.clone()),
        messenger.clone(),
        Duration::from_secs(cfg.scheduler.delivery_timeout_secs),
    );
    let listener = FeedListener::new(
        Arc::new(store.feed()),
        Arc::new(store.clone()),
        scheduler.clone(),
        TASK_TABLE,
        Duration::from_secs(cfg.scheduler.reconnect_max_secs),
    );
    tokio::spawn(listener.run());

    let gw = Arc::new(gateway::Gateway::new(
        store,
        assistant,
        messenger,
        cfg.llm.history_limit,
    ));
    let state = api::ApiState::new(gw, cfg.whatsapp.verify_token.clone());

    println!("Aura — starting assistant...");
    tokio::select! {
        result = api::serve(state, &cfg.api.host, cfg.api.port) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\nAura — shutting down.");
        }
    }

    scheduler.shutdown().await;
    Ok(())
}

async fn status(config_path: &str, cfg: config::Config) -> anyhow::Result<()> {
    println!("Aura — Status Check\n");
    println!("Config: {config_path}");
    println!("Model: {}", cfg.llm.model);
    println!();

    match Store::new(&cfg.store).await {
        Ok(store) => {
            let tasks = store.active_tasks().await?;
            println!("  store: ok ({}, {} active tasks)", cfg.store.db_path, tasks.len());
        }
        Err(e) => println!("  store: error ({e})"),
    }

    println!(
        "  whatsapp: {}",
        if WhatsAppMessenger::new(cfg.whatsapp.clone()).is_configured() {
            "configured"
        } else {
            "missing token or phone_number_id"
        }
    );
    println!(
        "  llm: {}",
        if OpenAiAssistant::new(cfg.llm.clone()).is_configured() {
            "configured"
        } else {
            "missing api_key"
        }
    );
    println!(
        "  webhook: {}",
        if cfg.whatsapp.verify_token.is_empty() {
            "missing verify_token"
        } else {
            "configured"
        }
    );

    Ok(())
}
