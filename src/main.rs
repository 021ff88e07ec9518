use anyhow::{Context, Result};
use clap::{Arg, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticketgate_core::AppConfig;

mod app;
mod shutdown;

use app::Application;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("ticketgate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Ticket-intake gateway in front of a remote ticketing platform")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file path")
                .default_value("config/ticketgate.toml"),
        )
        .arg(
            Arg::new("bind")
                .short('b')
                .long("bind")
                .value_name("ADDR")
                .help("Bind address, overrides the configuration file"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level")
                .value_parser(["trace", "debug", "info", "warn", "error"])
                .default_value("info"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_name("FORMAT")
                .help("Log output format")
                .value_parser(["json", "pretty"])
                .default_value("pretty"),
        )
        .get_matches();

    let config_path = matches.get_one::<String>("config").unwrap();
    let log_level = matches.get_one::<String>("log-level").unwrap();
    let log_format = matches.get_one::<String>("log-format").unwrap();

    init_logging(log_level, log_format)?;

    info!("starting ticket gateway");
    info!(config = %config_path, "loading configuration");

    let mut config = AppConfig::load(Some(config_path.as_str()))
        .with_context(|| format!("failed to load configuration from {config_path}"))?;

    if let Some(bind) = matches.get_one::<String>("bind") {
        config.server.bind_address = bind.clone();
    }

    let app = Application::new(config)?;
    app.run(shutdown::shutdown_signal()).await?;

    info!("ticket gateway stopped");
    Ok(())
}

fn init_logging(level: &str, format: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,tower_http=warn")));

    match format {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}
