//! Relay configuration types
//!
//! Defines the configuration structures for the UDP listener and the
//! HTTP forwarder.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use url::Url;

/// Default UDP port to listen on
fn default_udp_port() -> u16 {
    20998
}

/// Default receive buffer size in bytes
fn default_buffer_size() -> usize {
    16384
}

/// Default listen address (all interfaces, for broadcast reception)
fn default_listen_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

/// Default forward timeout in seconds
fn default_forward_timeout() -> u64 {
    2
}

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Relay configuration
    pub relay: RelayConfig,
}

/// Relay configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RelayConfig {
    /// Address to bind the UDP socket to
    #[serde(default = "default_listen_addr")]
    pub listen_addr: IpAddr,

    /// UDP port to listen on
    #[serde(default = "default_udp_port")]
    pub udp_port: u16,

    /// Maximum datagram size in bytes; larger datagrams are truncated
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// HTTP endpoint to relay decoded messages to
    pub relay_url: Url,

    /// Timeout for each HTTP POST in seconds
    #[serde(default = "default_forward_timeout")]
    pub forward_timeout: u64,
}

impl RelayConfig {
    /// Socket address the listener binds to
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.udp_port)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.buffer_size == 0 {
            return Err("buffer_size must be greater than zero".to_string());
        }
        match self.relay_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!("relay_url has unsupported scheme: {}", other)),
        }
    }
}
