use crate::config::Config;
use crate::core_network::transport::Transport;
use log::{debug, info, trace};

/// Sends a response to the client. Lines are terminated with CRLF here.
///
/// A failed write only gets logged: the next poll notices the dead socket.
pub fn send_response(transport: &mut dyn Transport, message: &str) {
    trace!("> {}", message);
    let line = format!("{}\r\n", message);
    if let Err(e) = transport.write_control(line.as_bytes()) {
        debug!("Failed to send response {:?}: {}", message, e);
    }
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!("  Listen Address: {}", config.server.listen_address);
    info!("  Listen Port: {}", config.server.listen_port);
    info!("  PASV Address: {}", config.server.pasv_address);
    info!("  PASV Port: {}", config.server.pasv_port);
    info!("  Root Directory: {}", config.server.root_dir.display());
    info!("  Idle Timeout: {} s", config.server.idle_timeout_secs);
    info!("  Auth Timeout: {} s", config.server.auth_timeout_secs);
    info!("  Transfer Buffer Size: {} bytes", config.server.buffer_size);
}
