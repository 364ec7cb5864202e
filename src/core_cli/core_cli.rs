use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "tickftpd", about = "A single session, poll-driven FTP server.")]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory served as the FTP root (overrides the configuration file)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Control port (overrides the configuration file)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}
