// Control and data channel plumbing
pub mod data_channel;
pub mod error;
pub mod pasv;
pub mod port;
pub mod tcp;
pub mod transport;

#[cfg(test)]
pub mod mock;

pub use data_channel::{DataConnection, DataMode};
pub use error::NetworkError;
pub use tcp::TcpTransport;
pub use transport::Transport;
