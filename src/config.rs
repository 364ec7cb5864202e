use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    pub pasv_address: String, // Address advertised in the PASV reply
    pub pasv_port: u16,
    pub root_dir: PathBuf,
    pub username: String,
    pub password: String,
    pub idle_timeout_secs: u64,
    pub auth_timeout_secs: u64,
    pub buffer_size: usize, // Chunk size of one transfer step
    pub data_connect_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: 21,
            pasv_address: String::from("127.0.0.1"),
            pasv_port: 55600,
            root_dir: PathBuf::from("./ftp-root"),
            username: String::from("arduino"),
            password: String::from("test"),
            idle_timeout_secs: 5 * 60,
            auth_timeout_secs: 10,
            buffer_size: 2048,
            data_connect_timeout_ms: 1000,
            poll_interval_ms: 1,
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let server = &self.server;
        if server.buffer_size == 0 {
            bail!("buffer_size must be greater than 0");
        }
        if server.username.is_empty() {
            bail!("username cannot be empty");
        }
        if server.pasv_port == server.listen_port {
            bail!("pasv_port must differ from listen_port");
        }
        server.pasv_ipv4()?;
        server.listen_addr()?;
        Ok(())
    }
}

impl ServerConfig {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .listen_address
            .parse()
            .with_context(|| format!("Invalid listen_address: {}", self.listen_address))?;
        Ok(SocketAddr::new(ip, self.listen_port))
    }

    pub fn pasv_ipv4(&self) -> Result<Ipv4Addr> {
        self.pasv_address
            .parse()
            .with_context(|| format!("Invalid pasv_address (IPv4 expected): {}", self.pasv_address))
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn auth_timeout(&self) -> Duration {
        Duration::from_secs(self.auth_timeout_secs)
    }

    pub fn data_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.data_connect_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}
