use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trendcast::config::Config;
use trendcast::server::BroadcastServer;
use trendcast::store::{seed, InMemoryTrendStore, TrendStore};

#[derive(Parser)]
#[command(
    name = "trendcast",
    version,
    about = "Real-time trend broadcast engine with WebSocket fan-out",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the broadcast engine
    Serve {
        /// Address to bind the HTTP/WebSocket listener to
        #[arg(short, long)]
        bind: Option<SocketAddr>,

        /// Configuration file (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Seed the store from a JSON file instead of the built-in set
        #[arg(long)]
        seed: Option<PathBuf>,

        /// Seed the simulation random streams for a reproducible run
        #[arg(long)]
        rng_seed: Option<u64>,
    },

    /// Validate a configuration file and print the effective config
    Check {
        /// Configuration file (TOML)
        #[arg(short, long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_tracing(&cli.log_format, cli.verbose)?;

    match cli.command {
        Commands::Serve {
            bind,
            config,
            seed,
            rng_seed,
        } => {
            tracing::info!(
                bind = ?bind,
                config = ?config,
                seed = ?seed,
                rng_seed = ?rng_seed,
                "Starting serve command"
            );
            serve(bind, config, seed, rng_seed).await?;
        }

        Commands::Check { config } => {
            check(config)?;
        }
    }

    Ok(())
}

fn setup_tracing(format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("trendcast=debug,info")
    } else {
        tracing_subscriber::EnvFilter::new("trendcast=info,warn")
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn serve(
    bind: Option<SocketAddr>,
    config_path: Option<PathBuf>,
    seed_path: Option<PathBuf>,
    rng_seed: Option<u64>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::from_file(&path)?,
        None => Config::from_env()?,
    };
    if let Some(bind) = bind {
        config.server.bind_address = bind;
    }
    if let Some(seed) = rng_seed {
        config.scheduler.rng_seed = Some(seed);
    }
    config.validate()?;

    if let Err(e) = trendcast::metrics::init_metrics() {
        tracing::warn!(error = %e, "metrics initialization failed, continuing without metrics");
    }

    let store: Arc<dyn TrendStore> = Arc::new(InMemoryTrendStore::new());
    let drafts = match seed_path {
        Some(path) => seed::drafts_from_file(&path).await?,
        None => seed::default_drafts(),
    };
    seed::seed_store(store.as_ref(), drafts).await?;

    let server = BroadcastServer::new(config, store)?;
    server.start_with_shutdown(shutdown_signal()).await?;

    tracing::info!("trendcast exited cleanly");
    Ok(())
}

fn check(config_path: PathBuf) -> Result<()> {
    let config = Config::from_file(&config_path)?;
    config.validate()?;

    println!("Configuration OK: {}", config_path.display());
    println!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutdown signal received");
}
