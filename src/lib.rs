//! # Dgrelay - UDP-to-HTTP JSON Datagram Relay
//!
//! Dgrelay is a small network utility that listens for UDP datagrams carrying
//! JSON payloads and relays each one to a remote HTTP endpoint as a POST
//! request. It is typically used to bridge devices that broadcast telemetry
//! over UDP (launch monitors, sensors, game trackers) to a web service that
//! only speaks HTTP.
//!
//! ## Features
//!
//! - **Payload-Agnostic**: any valid JSON value is relayed unchanged
//! - **Resilient Loop**: malformed datagrams and failed deliveries are logged
//!   and dropped; the listener never terminates on its own
//! - **Best-Effort Delivery**: one POST per datagram, fixed timeout, no retry
//! - **Clean Shutdown**: the listener is cooperatively cancellable and
//!   releases its socket when stopped
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dgrelay::config::load_config;
//! use dgrelay::forwarder::HttpForwarder;
//! use dgrelay::listener::Listener;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config("config.toml")?;
//!     let timeout = Duration::from_secs(config.relay.forward_timeout);
//!     let forwarder = HttpForwarder::new(config.relay.relay_url.clone(), timeout)?;
//!
//!     let handle = Listener::new(config.relay, Arc::new(forwarder)).start().await?;
//!     tokio::signal::ctrl_c().await?;
//!     handle.stop().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! The listener owns a UDP socket and a receive loop running as a background
//! task. Each datagram is decoded as UTF-8 JSON and handed to the forwarder,
//! which performs a single HTTP POST:
//!
//! ```text
//! UDP Sender -> Dgrelay -> HTTP Endpoint
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod forwarder;
pub mod listener;

// Re-export commonly used items
pub use config::{load_config, Config, RelayConfig};
pub use error::RelayError;
pub use forwarder::{Forward, HttpForwarder};
pub use listener::{Listener, ListenerHandle};

/// Version of the Dgrelay library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the application
pub const NAME: &str = env!("CARGO_PKG_NAME");
