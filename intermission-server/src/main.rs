use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

mod config;
mod context;
mod server;

use config::{load_config, DEFAULT_ENV_FILE};

#[derive(Parser, Debug, Clone)]
#[command(name = "intermission")]
#[command(author, version, about = "Intermission - Twitch chat bot for offline chat")]
struct Args {
    /// Path to the .env file holding credentials and channel settings
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    env_file: PathBuf,

    /// Log directive added on top of RUST_LOG; it wins for the target it names
    #[arg(long, default_value = "intermission=info")]
    log_level: String,
}

fn log_filter(directive: &str) -> EnvFilter {
    EnvFilter::from_default_env().add_directive(directive.parse().unwrap_or_default())
}

fn init_tracing(directive: &str) {
    fmt().with_env_filter(log_filter(directive)).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level);
    info!("Intermission starting. env_file={}", args.env_file.display());

    let config = load_config(&args.env_file)?;
    if let Err(e) = server::run_bot(config).await {
        error!("Bot error: {}", e);
        return Err(e.into());
    }

    info!("Main finished. Goodbye!");
    Ok(())
}
