// In-memory transport driven by the tests
use crate::core_network::error::NetworkError;
use crate::core_network::transport::Transport;
use std::collections::VecDeque;
use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MockState {
    pub listening: bool,
    pub client_waiting: bool,
    pub control_open: bool,
    pub control_in: VecDeque<u8>,
    pub control_out: Vec<u8>,

    pub data_listen_port: Option<u16>,
    pub data_client_waiting: bool,
    pub refuse_connect: bool,
    /// Active connects stay in their handshake while set.
    pub connect_stalled: bool,
    pub connect_attempts: usize,
    pub connected_to: Option<SocketAddr>,
    pub data_open: bool,
    pub data_in: VecDeque<u8>,
    /// The peer hangs up once `data_in` is drained.
    pub data_eof: bool,
    pub data_out: Vec<u8>,
    /// Caps the bytes accepted by one `write_data` call.
    pub data_write_limit: Option<usize>,
    pub data_closes: usize,
}

/// Cloneable handle: the server owns one copy, the test keeps another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    pub fn connect_client(&self) {
        self.state().client_waiting = true;
    }

    pub fn disconnect_client(&self) {
        let mut state = self.state();
        state.control_open = false;
        state.control_in.clear();
    }

    pub fn send(&self, text: &str) {
        self.state().control_in.extend(text.bytes());
    }

    pub fn take_output(&self) -> String {
        let bytes = std::mem::take(&mut self.state().control_out);
        String::from_utf8(bytes).unwrap()
    }

    pub fn connect_data_client(&self) {
        self.state().data_client_waiting = true;
    }

    /// Queues an upload: the data client sends `bytes` then hangs up.
    pub fn upload(&self, bytes: &[u8]) {
        let mut state = self.state();
        state.data_client_waiting = true;
        state.data_in.extend(bytes.iter().copied());
        state.data_eof = true;
    }

    pub fn drop_data_client(&self) {
        self.state().data_open = false;
    }

    pub fn take_data_output(&self) -> Vec<u8> {
        std::mem::take(&mut self.state().data_out)
    }
}

impl Transport for MockTransport {
    fn listen_control(&mut self) -> Result<(), NetworkError> {
        self.state().listening = true;
        Ok(())
    }

    fn accept_control(&mut self) -> Result<bool, NetworkError> {
        let mut state = self.state();
        if state.listening && state.client_waiting {
            state.client_waiting = false;
            state.control_open = true;
            return Ok(true);
        }
        Ok(false)
    }

    fn control_connected(&mut self) -> bool {
        self.state().control_open
    }

    fn read_control_byte(&mut self) -> Option<u8> {
        let mut state = self.state();
        if !state.control_open {
            return None;
        }
        state.control_in.pop_front()
    }

    fn write_control(&mut self, bytes: &[u8]) -> Result<(), NetworkError> {
        let mut state = self.state();
        if !state.control_open {
            return Err(NetworkError::NotConnected);
        }
        state.control_out.extend_from_slice(bytes);
        Ok(())
    }

    fn close_control(&mut self) {
        self.state().control_open = false;
    }

    fn listen_data(&mut self, port: u16) -> Result<(), NetworkError> {
        self.state().data_listen_port = Some(port);
        Ok(())
    }

    fn accept_data(&mut self) -> Result<bool, NetworkError> {
        let mut state = self.state();
        if state.data_listen_port.is_none() {
            return Err(NetworkError::NoDataMode);
        }
        if state.data_client_waiting {
            state.data_client_waiting = false;
            state.data_open = true;
            return Ok(true);
        }
        Ok(false)
    }

    fn connect_data(&mut self, addr: SocketAddr) -> Result<bool, NetworkError> {
        let mut state = self.state();
        state.connect_attempts += 1;
        if state.refuse_connect {
            return Err(NetworkError::Connect {
                addr,
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }
        if state.connect_stalled {
            return Ok(false);
        }
        state.connected_to = Some(addr);
        state.data_open = true;
        Ok(true)
    }

    fn data_connected(&mut self) -> bool {
        self.state().data_open
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize, NetworkError> {
        let mut state = self.state();
        if !state.data_open {
            return Ok(0);
        }
        let mut n = 0;
        while n < buf.len() {
            match state.data_in.pop_front() {
                Some(byte) => {
                    buf[n] = byte;
                    n += 1;
                }
                None => break,
            }
        }
        if n == 0 && state.data_eof {
            state.data_eof = false;
            state.data_open = false;
        }
        Ok(n)
    }

    fn write_data(&mut self, bytes: &[u8]) -> Result<usize, NetworkError> {
        let mut state = self.state();
        if !state.data_open {
            return Err(NetworkError::NotConnected);
        }
        let n = state.data_write_limit.map_or(bytes.len(), |l| l.min(bytes.len()));
        state.data_out.extend_from_slice(&bytes[..n]);
        Ok(n)
    }

    fn close_data(&mut self) {
        let mut state = self.state();
        if state.data_open {
            state.data_closes += 1;
        }
        state.data_open = false;
        state.data_in.clear();
        state.data_eof = false;
    }
}
