use anyhow::Result;
use clap::Parser;
use gnt_daemon::logging::init_logging;
use gnt_daemon::{ServerBuilder, Settings};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

/// GNT admin daemon - serves the admin shell behind the idle-timeout gate
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Address to bind, overriding the configuration
    #[arg(short = 'b', long = "bind")]
    bind: Option<SocketAddr>,

    /// Log filter, overriding the configuration (RUST_LOG still wins)
    #[arg(short = 'l', long = "log-level")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        settings.set_bind_addr(bind);
    }
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }

    init_logging(&settings.logging)?;
    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {}", path.display());
    }

    ServerBuilder::new(settings).serve().await?;
    Ok(())
}
