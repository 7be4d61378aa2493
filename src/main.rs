//! Service entry point.
//!
//! ```bash
//! # Defaults: listen on 0.0.0.0:3000, links under http://localhost:3000
//! cargo run
//!
//! # Override from the command line
//! cargo run -- --listen 127.0.0.1:8080 --base-url https://sho.rt --log-format json
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use shorturl_service::{config, server};
use tracing_subscriber::EnvFilter;

/// URL shortener with expiring shortcodes and click analytics.
#[derive(Parser)]
#[command(name = "shorturl-service")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bind address, overrides LISTEN
    #[arg(long)]
    listen: Option<String>,

    /// Short link prefix, overrides BASE_URL
    #[arg(long)]
    base_url: Option<String>,

    /// `text` or `json`, overrides LOG_FORMAT
    #[arg(long)]
    log_format: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = config::Config::from_env().context("Failed to load configuration")?;
    if let Some(listen) = cli.listen {
        config.listen_addr = listen;
    }
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(log_format) = cli.log_format {
        config.log_format = log_format;
    }
    config.validate().context("Invalid configuration")?;

    init_tracing(&config.log_level, &config.log_format);
    config.print_summary();

    server::run(config).await
}

fn init_tracing(level: &str, format: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true);

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}
