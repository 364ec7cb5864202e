use crate::core_network::error::NetworkError;
use crate::core_network::transport::Transport;
use log::{debug, info, trace, warn};
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpListener, TcpStream};

const READ_CHUNK: usize = 512;

/// One connected socket with its userspace buffers.
#[derive(Debug)]
struct Channel {
    stream: TcpStream,
    peer: SocketAddr,
    inbound: Vec<u8>,
    in_pos: usize,
    outbound: Vec<u8>,
    closed: bool,
}

impl Channel {
    fn new(stream: TcpStream, peer: SocketAddr) -> io::Result<Self> {
        stream.set_nonblocking(true)?;
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Could not set TCP_NODELAY for {}: {}", peer, e);
        }
        Ok(Self {
            stream,
            peer,
            inbound: Vec::with_capacity(READ_CHUNK),
            in_pos: 0,
            outbound: Vec::new(),
            closed: false,
        })
    }

    fn flush(&mut self) {
        while !self.outbound.is_empty() && !self.closed {
            match self.stream.write(&self.outbound) {
                Ok(0) => self.closed = true,
                Ok(n) => {
                    self.outbound.drain(..n);
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => break,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    debug!("Write to {} failed: {}", self.peer, e);
                    self.closed = true;
                }
            }
        }
        if self.closed {
            self.outbound.clear();
        }
    }

    fn next_byte(&mut self) -> Option<u8> {
        if self.in_pos >= self.inbound.len() && !self.closed {
            let mut chunk = [0u8; READ_CHUNK];
            self.inbound.clear();
            self.in_pos = 0;
            match self.stream.read(&mut chunk) {
                Ok(0) => self.closed = true,
                Ok(n) => self.inbound.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::WouldBlock => {}
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    debug!("Read from {} failed: {}", self.peer, e);
                    self.closed = true;
                }
            }
        }
        let byte = self.inbound.get(self.in_pos).copied();
        if byte.is_some() {
            self.in_pos += 1;
        }
        byte
    }

    fn read_now(&mut self, buf: &mut [u8]) -> Result<usize, NetworkError> {
        if self.closed || buf.is_empty() {
            return Ok(0);
        }
        match self.stream.read(buf) {
            Ok(0) => {
                self.closed = true;
                Ok(0)
            }
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(e) => {
                self.closed = true;
                Err(NetworkError::Io(e))
            }
        }
    }

    fn write_now(&mut self, bytes: &[u8]) -> Result<usize, NetworkError> {
        if self.closed {
            return Err(NetworkError::NotConnected);
        }
        match self.stream.write(bytes) {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => Ok(0),
            Err(e) => {
                self.closed = true;
                Err(NetworkError::Io(e))
            }
        }
    }

    fn shutdown(self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            trace!("Shutdown of {} reported: {}", self.peer, e);
        }
    }
}

/// Transport over non-blocking `std::net` sockets.
///
/// Replies that the kernel does not take immediately stay queued and are
/// pushed out on later calls, including after `close_control` (the
/// socket lingers until its queue drains).
#[derive(Debug)]
pub struct TcpTransport {
    control_addr: SocketAddr,
    data_ip: IpAddr,
    control_listener: Option<TcpListener>,
    data_listener: Option<(u16, TcpListener)>,
    control: Option<Channel>,
    data: Option<Channel>,
    /// Active-mode connect still in its handshake.
    connecting: Option<(SocketAddr, Socket)>,
    lingering: Vec<Channel>,
}

impl TcpTransport {
    pub fn new(control_addr: SocketAddr) -> Self {
        Self {
            control_addr,
            data_ip: control_addr.ip(),
            control_listener: None,
            data_listener: None,
            control: None,
            data: None,
            connecting: None,
            lingering: Vec::new(),
        }
    }

    pub fn control_local_addr(&self) -> Option<SocketAddr> {
        self.control_listener
            .as_ref()
            .and_then(|l| l.local_addr().ok())
    }

    pub fn data_local_addr(&self) -> Option<SocketAddr> {
        self.data_listener
            .as_ref()
            .and_then(|(_, l)| l.local_addr().ok())
    }

    fn drive(&mut self) {
        if let Some(control) = self.control.as_mut() {
            control.flush();
        }
        for channel in self.lingering.iter_mut() {
            channel.flush();
        }
        let (done, pending): (Vec<Channel>, Vec<Channel>) = self
            .lingering
            .drain(..)
            .partition(|c| c.closed || c.outbound.is_empty());
        self.lingering = pending;
        done.into_iter().for_each(Channel::shutdown);
    }

    fn bind(addr: SocketAddr) -> Result<TcpListener, NetworkError> {
        let listener =
            TcpListener::bind(addr).map_err(|source| NetworkError::Bind { addr, source })?;
        listener
            .set_nonblocking(true)
            .map_err(|source| NetworkError::Bind { addr, source })?;
        Ok(listener)
    }
}

impl Transport for TcpTransport {
    fn listen_control(&mut self) -> Result<(), NetworkError> {
        if self.control_listener.is_none() {
            let listener = Self::bind(self.control_addr)?;
            info!("Control channel listening on {:?}", listener.local_addr());
            self.control_listener = Some(listener);
        }
        Ok(())
    }

    fn accept_control(&mut self) -> Result<bool, NetworkError> {
        self.drive();
        let Some(listener) = self.control_listener.as_ref() else {
            return Err(NetworkError::NotConnected);
        };
        match listener.accept() {
            Ok((stream, peer)) => {
                info!("New control connection from {}", peer);
                self.control = Some(Channel::new(stream, peer).map_err(NetworkError::Accept)?);
                Ok(true)
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(false)
            }
            Err(e) => Err(NetworkError::Accept(e)),
        }
    }

    fn control_connected(&mut self) -> bool {
        self.drive();
        self.control.as_ref().map_or(false, |c| !c.closed)
    }

    fn read_control_byte(&mut self) -> Option<u8> {
        self.drive();
        self.control.as_mut().and_then(Channel::next_byte)
    }

    fn write_control(&mut self, bytes: &[u8]) -> Result<(), NetworkError> {
        let control = self.control.as_mut().ok_or(NetworkError::NotConnected)?;
        if control.closed {
            return Err(NetworkError::NotConnected);
        }
        control.outbound.extend_from_slice(bytes);
        control.flush();
        Ok(())
    }

    fn close_control(&mut self) {
        if let Some(mut control) = self.control.take() {
            debug!("Closing control connection with {}", control.peer);
            control.flush();
            if control.closed || control.outbound.is_empty() {
                control.shutdown();
            } else {
                self.lingering.push(control);
            }
        }
    }

    fn listen_data(&mut self, port: u16) -> Result<(), NetworkError> {
        if matches!(self.data_listener, Some((p, _)) if p == port) {
            return Ok(());
        }
        let listener = Self::bind(SocketAddr::new(self.data_ip, port))?;
        debug!("Passive data listener on {:?}", listener.local_addr());
        self.data_listener = Some((port, listener));
        Ok(())
    }

    fn accept_data(&mut self) -> Result<bool, NetworkError> {
        let Some((_, listener)) = self.data_listener.as_ref() else {
            return Err(NetworkError::NoDataMode);
        };
        match listener.accept() {
            Ok((stream, peer)) => {
                debug!("Accepted data connection from {}", peer);
                if let Some(old) = self.data.take() {
                    old.shutdown();
                }
                self.data = Some(Channel::new(stream, peer).map_err(NetworkError::Accept)?);
                Ok(true)
            }
            Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::Interrupted) => {
                Ok(false)
            }
            Err(e) => Err(NetworkError::Accept(e)),
        }
    }

    fn connect_data(&mut self, addr: SocketAddr) -> Result<bool, NetworkError> {
        let socket = match self.connecting.take() {
            Some((target, socket)) if target == addr => socket,
            _ => {
                self.close_data();
                debug!("Connecting to {}", addr);
                start_connect(addr).map_err(|source| NetworkError::Connect { addr, source })?
            }
        };

        match connect_finished(&socket) {
            Ok(true) => {
                debug!("Data connection established with {}", addr);
                let stream = TcpStream::from(socket);
                self.data = Some(
                    Channel::new(stream, addr)
                        .map_err(|source| NetworkError::Connect { addr, source })?,
                );
                Ok(true)
            }
            Ok(false) => {
                self.connecting = Some((addr, socket));
                Ok(false)
            }
            Err(source) => Err(NetworkError::Connect { addr, source }),
        }
    }

    fn data_connected(&mut self) -> bool {
        self.data.as_ref().map_or(false, |c| !c.closed)
    }

    fn read_data(&mut self, buf: &mut [u8]) -> Result<usize, NetworkError> {
        self.data
            .as_mut()
            .ok_or(NetworkError::NotConnected)?
            .read_now(buf)
    }

    fn write_data(&mut self, bytes: &[u8]) -> Result<usize, NetworkError> {
        self.data
            .as_mut()
            .ok_or(NetworkError::NotConnected)?
            .write_now(bytes)
    }

    fn close_data(&mut self) {
        if let Some((addr, _)) = self.connecting.take() {
            debug!("Dropping pending connect to {}", addr);
        }
        if let Some(data) = self.data.take() {
            debug!("Closing data connection with {}", data.peer);
            data.shutdown();
        }
    }
}

/// Opens a non-blocking socket and fires the connect without waiting for it.
fn start_connect(addr: SocketAddr) -> io::Result<Socket> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;
    socket.set_nonblocking(true)?;
    match socket.connect(&addr.into()) {
        Ok(()) => {}
        Err(e) if connect_in_progress(&e) => {}
        Err(e) => return Err(e),
    }
    Ok(socket)
}

/// Whether the handshake completed. A failed handshake shows up in SO_ERROR.
fn connect_finished(socket: &Socket) -> io::Result<bool> {
    if let Some(e) = socket.take_error()? {
        return Err(e);
    }
    match socket.peer_addr() {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotConnected => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn connect_in_progress(e: &io::Error) -> bool {
    e.raw_os_error() == Some(libc::EINPROGRESS) || e.kind() == ErrorKind::WouldBlock
}

#[cfg(not(unix))]
fn connect_in_progress(e: &io::Error) -> bool {
    e.kind() == ErrorKind::WouldBlock
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        if !self.lingering.is_empty() {
            warn!(
                "Dropping {} control connection(s) with unsent replies",
                self.lingering.len()
            );
        }
    }
}
