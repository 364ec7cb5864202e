use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, error, info};
use std::path::Path;
use std::sync::Arc;
use tickftpd::constants::DEFAULT_CONFIG_PATH;
use tickftpd::core_cli::Cli;
use tickftpd::core_log::init_logger;
use tickftpd::core_network::TcpTransport;
use tickftpd::core_storage::LocalStorage;
use tickftpd::helpers::log_config;
use tickftpd::{Config, FtpServer};
use tokio::time::{interval, MissedTickBehavior};

// Polls allowed back to back before yielding to the ticker again
const MAX_BURST: usize = 4096;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    init_logger(args.verbose);

    let config = load_config(&args)?;
    log_config(&config);

    let storage = LocalStorage::new(&config.server.root_dir).with_context(|| {
        format!(
            "Failed to open root directory: {}",
            config.server.root_dir.display()
        )
    })?;
    let transport = TcpTransport::new(config.server.listen_addr()?);
    let poll_interval = config.server.poll_interval();

    let mut server = FtpServer::new(Arc::new(config), Box::new(storage), Box::new(transport));
    server
        .init()
        .context("Failed to start the control listener")?;

    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                match result {
                    Ok(()) => info!("Received Ctrl-C"),
                    Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
                }
                break;
            }
            _ = ticker.tick() => {
                let mut burst = 0;
                while burst < MAX_BURST && server.service() {
                    burst += 1;
                }
                if burst == MAX_BURST {
                    debug!("Poll burst limit reached");
                }
            }
        }
    }

    server.shutdown();
    Ok(())
}

/// Configuration file (explicit, else the default path when present, else
/// built-in defaults) with the command-line overrides applied.
fn load_config(args: &Cli) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None if default_path.exists() => Config::load_from_file(default_path)?,
        None => {
            info!("No configuration file, using defaults");
            Config::default()
        }
    };

    if let Some(root) = &args.root {
        config.server.root_dir = root.clone();
    }
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    config.validate()?;
    Ok(config)
}
