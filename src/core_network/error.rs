// Error handling for the control and data channels
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Failed to listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Failed to accept a connection: {0}")]
    Accept(#[source] io::Error),

    #[error("Failed to connect to {addr}: {source}")]
    Connect {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("No data connection mode selected")]
    NoDataMode,

    #[error("Channel is not connected")]
    NotConnected,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl NetworkError {
    pub fn to_ftp_response(&self) -> String {
        match self {
            NetworkError::Bind { .. }
            | NetworkError::Accept(_)
            | NetworkError::Connect { .. }
            | NetworkError::NoDataMode => "425 No data connection".to_string(),
            NetworkError::NotConnected | NetworkError::Io(_) => {
                "426 Data connection closed. Transfer aborted".to_string()
            }
        }
    }
}
