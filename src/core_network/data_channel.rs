use crate::core_network::error::NetworkError;
use crate::core_network::transport::Transport;
use crate::session::Context;
use log::{debug, warn};
use std::net::{SocketAddr, SocketAddrV4};

/// How the next data connection gets established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataMode {
    None,
    /// PORT: we connect to the client.
    Active(SocketAddrV4),
    /// PASV: the client connects to our data listener.
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectProgress {
    Connected,
    Pending,
}

#[derive(Debug)]
pub struct DataConnection {
    pub mode: DataMode,
}

impl Default for DataConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl DataConnection {
    pub fn new() -> Self {
        Self {
            mode: DataMode::None,
        }
    }

    pub fn set_passive(
        &mut self,
        transport: &mut dyn Transport,
        port: u16,
    ) -> Result<(), NetworkError> {
        transport.close_data();
        self.mode = DataMode::None;
        transport.listen_data(port)?;
        self.mode = DataMode::Passive;
        Ok(())
    }

    pub fn set_active(&mut self, transport: &mut dyn Transport, addr: SocketAddrV4) {
        transport.close_data();
        self.mode = DataMode::Active(addr);
    }

    pub fn clear_mode(&mut self) {
        self.mode = DataMode::None;
    }

    /// Port reported in the 150 replies.
    pub fn port(&self, pasv_port: u16) -> u16 {
        match self.mode {
            DataMode::Active(addr) => addr.port(),
            DataMode::Passive | DataMode::None => pasv_port,
        }
    }

    /// One attempt at getting a connected data socket.
    pub fn try_connect(
        &self,
        transport: &mut dyn Transport,
    ) -> Result<ConnectProgress, NetworkError> {
        if transport.data_connected() {
            return Ok(ConnectProgress::Connected);
        }
        match self.mode {
            DataMode::None => Err(NetworkError::NoDataMode),
            DataMode::Active(addr) => Ok(progress(transport.connect_data(SocketAddr::V4(addr))?)),
            DataMode::Passive => Ok(progress(transport.accept_data()?)),
        }
    }
}

fn progress(connected: bool) -> ConnectProgress {
    if connected {
        ConnectProgress::Connected
    } else {
        ConnectProgress::Pending
    }
}

/// Tries to secure the data socket, replying 425 when that is impossible.
/// `None` means the caller must give up on the transfer.
pub fn data_connect(ctx: &mut Context<'_>) -> Option<ConnectProgress> {
    match ctx.session.data.try_connect(ctx.transport) {
        Ok(progress) => Some(progress),
        Err(e) => {
            warn!("Data connection failed: {}", e);
            ctx.reply(e.to_ftp_response());
            None
        }
    }
}

/// Checks the data socket is still up; replies 426 and closes it otherwise.
/// The caller releases its file or directory handle on `false`.
pub fn data_connected(ctx: &mut Context<'_>) -> bool {
    if ctx.transport.data_connected() {
        return true;
    }
    debug!("Data connection lost during transfer");
    ctx.transport.close_data();
    ctx.reply(NetworkError::NotConnected.to_ftp_response());
    false
}
