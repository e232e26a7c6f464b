//! MemVault - Per-User Encrypted Memory Vault
//!
//! Stores memories sealed under per-user keys and retrieves them with
//! relevance-ranked, owner-only search.

use anyhow::Result;
use clap::{Parser, Subcommand};
use memvault::{
    config::VaultConfig,
    memory::types::{CreateMemoryRequest, ListMemoriesRequest, SearchMemoriesRequest},
    users::RegisterUserRequest,
    vault::{ApiError, VaultService},
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "memvault")]
#[command(author = "A3S Lab Team")]
#[command(version)]
#[command(about = "Per-user encrypted memory vault with relevance-ranked retrieval")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "MEMVAULT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted end-to-end walkthrough against an in-process vault
    Demo,

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("memvault={}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = if let Some(config_path) = cli.config {
        let content = std::fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        VaultConfig::default()
    };

    match cli.command {
        Commands::Demo => {
            run_demo(config).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

async fn run_demo(config: VaultConfig) -> Result<()> {
    let vault = VaultService::new(config)?;

    println!("── Registering user");
    let user = vault
        .register_user(RegisterUserRequest {
            email: "demo@example.com".to_string(),
            display_name: "Demo User".to_string(),
            preferences: None,
        })
        .await
        .map_err(into_anyhow)?;
    println!("{}", serde_json::to_string_pretty(&user)?);

    println!("── Storing memories");
    let memories = [
        CreateMemoryRequest {
            content: "Discussed monthly budget: rent 1200, groceries 400".to_string(),
            memory_type: "conversation".to_string(),
            source: "chat-app".to_string(),
            tags: vec!["budget".to_string(), "finance".to_string()],
            metadata: Default::default(),
        },
        CreateMemoryRequest {
            content: "Buy a birthday gift for Sam before 2026-09-12".to_string(),
            memory_type: "note".to_string(),
            source: "reminders".to_string(),
            tags: vec!["shopping".to_string(), "gift".to_string()],
            metadata: Default::default(),
        },
        CreateMemoryRequest {
            content: "Flight confirmation at https://airline.example/booking/XK42".to_string(),
            memory_type: "document".to_string(),
            source: "mail".to_string(),
            tags: vec!["travel".to_string()],
            metadata: Default::default(),
        },
    ];
    for request in memories {
        let summary = vault
            .create_memory(&user.id, request)
            .await
            .map_err(into_anyhow)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    println!("── Listing memories");
    let page = vault
        .list_memories(&user.id, ListMemoriesRequest::default())
        .await
        .map_err(into_anyhow)?;
    println!("{}", serde_json::to_string_pretty(&page)?);

    println!("── Searching for \"budget\"");
    let response = vault
        .search_memories(
            &user.id,
            SearchMemoriesRequest {
                query: "budget".to_string(),
                context: None,
                limit: None,
            },
        )
        .await
        .map_err(into_anyhow)?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    println!("── Dashboard");
    let dashboard = vault.dashboard(&user.id).await.map_err(into_anyhow)?;
    println!("{}", serde_json::to_string_pretty(&dashboard)?);

    Ok(())
}

fn show_config(config: Option<&VaultConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}

fn into_anyhow(err: ApiError) -> anyhow::Error {
    anyhow::anyhow!("{}", err)
}
