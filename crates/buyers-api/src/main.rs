//! Buyers API Server
//!
//! REST API over the buyers graph.
//!
//! Author: Buyers API Team

use buyers_api::{docs, serve};
use buyers_core::{AppConfig, LoggingConfig};
use buyers_graph::DgraphHttpConnector;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "buyers-api")]
#[command(about = "Buyers, products and transactions REST API")]
#[command(version)]
struct Cli {
    /// Generate router documentation and exit
    #[arg(long)]
    routes: bool,

    /// TOML configuration file; environment variables override it
    #[arg(long, short)]
    config: Option<PathBuf>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "buyers_api={0},buyers_graph={0},tower_http=debug",
            logging.level
        )
        .into()
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.routes {
        println!("{}", docs::openapi_json()?);
        return Ok(());
    }

    // Load configuration
    let config = match cli.config {
        Some(path) => AppConfig::from_file(path)?.with_env_override()?,
        None => AppConfig::from_env()?,
    };

    init_tracing(&config.logging);

    let connector = Arc::new(DgraphHttpConnector::new(&config.graph));
    if let Err(e) = serve(config, connector).await {
        tracing::error!("{e:#}");
        return Err(e);
    }

    Ok(())
}
