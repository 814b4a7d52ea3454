//! Server configuration.
//!
//! Defaults, optionally overlaid by a YAML file named in `SSE_CONFIG`, then
//! by the `HOST`, `PORT` and `LISTEN` (`host:port`) environment variables.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::connection::{ConnectionSettings, DEFAULT_EVENT_BUFFER, DEFAULT_READ_BUFFER_SIZE};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub connection: ConnectionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Bytes taken from the socket in the single read per connection
    pub read_buffer_size: usize,
    /// Unset means a silent client holds its connection forever
    pub read_timeout_ms: Option<u64>,
    /// Events a streaming handler may queue ahead of the socket
    pub event_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            read_timeout_ms: None,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}

impl Config {
    /// Loads from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::load`] with an injectable variable lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup("SSE_CONFIG") {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(listen) = lookup("LISTEN") {
            let (host, port) = listen
                .rsplit_once(':')
                .with_context(|| format!("LISTEN must be host:port, got {listen:?}"))?;
            cfg.server.host = host.to_string();
            cfg.server.port = parse_port(port)?;
        }
        if let Some(host) = lookup("HOST") {
            cfg.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            cfg.server.port = parse_port(&port)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must not be empty");
        anyhow::ensure!(
            self.connection.read_buffer_size > 0,
            "connection.read_buffer_size must be positive"
        );
        anyhow::ensure!(
            self.connection.event_buffer > 0,
            "connection.event_buffer must be positive"
        );
        Ok(())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            read_buffer_size: self.connection.read_buffer_size,
            read_timeout: self.connection.read_timeout_ms.map(Duration::from_millis),
            event_buffer: self.connection.event_buffer,
        }
    }
}

fn parse_port(raw: &str) -> anyhow::Result<u16> {
    raw.trim()
        .parse()
        .with_context(|| format!("invalid port {raw:?}"))
}
