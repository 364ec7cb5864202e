pub mod config;
pub mod constants;
pub mod core_cli;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod core_storage;
pub mod core_transfer;
pub mod helpers;
pub mod server;
pub mod session;

#[cfg(test)]
mod test_server;

pub use config::Config;
pub use server::FtpServer;
