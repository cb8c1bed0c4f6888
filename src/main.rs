use anyhow::Context;
use clap::Parser;
use menu_agent::utils::{logger, validation::Validate};
use menu_agent::{server, AppContext, CliArgs};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Pass --config <file> or create menu-agent.toml");
            std::process::exit(1);
        }
    };

    if config.logging.json {
        logger::init_json_logger(&config.logging.level);
    } else {
        logger::init_logger(&config.logging.level);
    }

    tracing::info!("🚀 Starting menu-agent");
    tracing::debug!("Config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // Menu or prompt problems must stop us before the port is bound.
    let context = match AppContext::from_config(config).await {
        Ok(context) => Arc::new(context),
        Err(e) => {
            tracing::error!("❌ Startup failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(3);
        }
    };

    server::run(context).await.context("HTTP server failed")?;
    Ok(())
}
