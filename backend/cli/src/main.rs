mod config_cmd;
mod search_cmd;
mod terminal_output;
mod wiring;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use tracing::info;

use wardrobe_config::{
    config_dir, config_file_path, load_and_prepare, require_valid, WardrobeConfig,
};
use wardrobe_gateway::start_server;
use wardrobe_logging::init_logger;

use search_cmd::Query;

#[derive(Parser)]
#[command(name = "wardrobe")]
#[command(about = "WhatsApp fashion assistant: virtual try-on and catalog search")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.wardrobe/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query the product catalog
    #[command(group(ArgGroup::new("query").required(true).args(["text", "image"])))]
    Search {
        /// Free-text query
        #[arg(long)]
        text: Option<String>,
        /// Path to a query image
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Create the vector index if it does not exist
    EnsureIndex,
    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective config with secrets masked
    Show,
    /// Write a default config file
    Init,
    /// Print the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .clone()
        .unwrap_or_else(|| config_file_path(&config_dir()));

    match cli.command {
        Commands::Serve { port } => {
            let mut config = load_and_prepare(&path).await?;
            if let Some(port) = port {
                config.server.port = port;
            }
            init_logger(&config.logging.dir, &config.logging.level);
            run_server(config).await?;
        }
        Commands::Search { text, image } => {
            init_console_logging();
            let config = load_and_prepare(&path).await?;
            let query = match (text, image) {
                (Some(text), _) => Query::Text(text),
                (None, Some(image)) => Query::Image(image),
                (None, None) => anyhow::bail!("pass --text or --image"),
            };
            search_cmd::run(&config, query).await?;
        }
        Commands::EnsureIndex => {
            init_console_logging();
            let config = load_and_prepare(&path).await?;
            let description = wiring::ensure_index(&config.pinecone).await?;
            terminal_output::note_success(&format!(
                "Index {} ready ({} dims, {}) at {}",
                description.name, description.dimension, description.metric, description.host
            ));
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(&load_and_prepare(&path).await?)?,
            ConfigAction::Init => {
                config_cmd::init(&path).await?;
            }
            ConfigAction::Path => println!("{}", path.display()),
        },
    }

    Ok(())
}

/// One-shot commands log to stderr only.
fn init_console_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_server(config: WardrobeConfig) -> Result<()> {
    require_valid(&config)?;
    info!(
        port = config.server.port,
        bind = %config.server.bind_address,
        public_url = %config.server.public_base_url,
        index = %config.pinecone.index_name,
        "Starting wardrobe"
    );

    let state = wiring::gateway_state(&config).await?;
    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.port)
        .parse()
        .context("Invalid bind address")?;

    start_server(addr, state, config.storage.static_dir.clone()).await
}
