use crate::core_network::error::NetworkError;
use std::net::SocketAddr;

/// Non-blocking socket primitives for the control and data channels.
///
/// No method may wait for the peer: absence of data, of a pending client
/// or of buffer space is reported as "nothing happened" and the caller
/// retries on its next poll.
pub trait Transport {
    /// (Re)arms the control listener. Idempotent.
    fn listen_control(&mut self) -> Result<(), NetworkError>;
    /// Accepts a waiting control client. `Ok(false)` when nobody is waiting.
    fn accept_control(&mut self) -> Result<bool, NetworkError>;
    fn control_connected(&mut self) -> bool;
    /// One byte from the control channel, if one is available now.
    fn read_control_byte(&mut self) -> Option<u8>;
    /// Queues a reply. Bytes the socket does not take now are sent later.
    fn write_control(&mut self, bytes: &[u8]) -> Result<(), NetworkError>;
    fn close_control(&mut self);

    /// (Re)arms the passive data listener on `port`. Idempotent.
    fn listen_data(&mut self, port: u16) -> Result<(), NetworkError>;
    /// Accepts a waiting passive data client. `Ok(false)` when nobody is waiting.
    fn accept_data(&mut self) -> Result<bool, NetworkError>;
    /// Starts, or keeps polling, a connect to `addr`. `Ok(true)` once the
    /// socket is up, `Ok(false)` while the handshake is still in flight.
    fn connect_data(&mut self, addr: SocketAddr) -> Result<bool, NetworkError>;
    fn data_connected(&mut self) -> bool;
    /// Reads what is available now, up to `buf.len()`. `Ok(0)` means
    /// nothing right now; a closed peer shows up in `data_connected`.
    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize, NetworkError>;
    /// Writes what the socket accepts now and returns that count.
    fn write_data(&mut self, bytes: &[u8]) -> Result<usize, NetworkError>;
    fn close_data(&mut self);
}
