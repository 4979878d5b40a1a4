//! UDP listener and relay loop
//!
//! The listener owns a UDP socket bound with address reuse and broadcast
//! reception enabled, and runs the receive loop as a background task. Each
//! datagram is decoded as UTF-8 JSON and handed to the forwarder; failures
//! local to one datagram are logged and the loop continues. Only
//! [`ListenerHandle::stop`] terminates the loop.
//!
//! The forwarder call runs inline in the loop, so a slow endpoint (bounded
//! by the forward timeout) delays the next datagram. This serialization is
//! deliberate: the relay carries low-rate telemetry and a send queue is out
//! of scope.

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::forwarder::Forward;
use anyhow::{Context, Result};
use serde_json::Value;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Maximum payload bytes shown in debug log previews
const PREVIEW_BYTES: usize = 100;

/// UDP listener for the relay.
///
/// Construct with [`Listener::new`], then call [`Listener::start`] to bind
/// the socket and launch the receive loop. `start` consumes the listener,
/// so the loop cannot be entered twice.
pub struct Listener {
    config: RelayConfig,
    forwarder: Arc<dyn Forward>,
}

/// Handle to a running listener.
///
/// Dropping the handle closes the shutdown channel and the loop winds down
/// on its own time; call [`ListenerHandle::stop`] to wait until the socket
/// is actually released.
pub struct ListenerHandle {
    shutdown_tx: broadcast::Sender<bool>,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl Listener {
    /// Create a new listener with the given configuration and forwarder
    pub fn new(config: RelayConfig, forwarder: Arc<dyn Forward>) -> Self {
        Listener { config, forwarder }
    }

    /// Bind the socket and start the receive loop.
    ///
    /// Bind failures (port in use, permission denied) propagate to the
    /// caller; nothing is spawned in that case. On success the loop runs
    /// in the background and this returns immediately.
    pub async fn start(self) -> Result<ListenerHandle> {
        let addr = self.config.bind_addr();
        let socket = bind_udp(addr)
            .with_context(|| format!("Failed to bind UDP socket on {}", addr))?;
        let local_addr = socket.local_addr()?;

        info!("Listening on UDP {}", local_addr);

        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let task = tokio::spawn(run_loop(
            socket,
            self.config.buffer_size,
            self.forwarder,
            shutdown_rx,
        ));

        Ok(ListenerHandle {
            shutdown_tx,
            task,
            local_addr,
        })
    }
}

impl ListenerHandle {
    /// Address the socket is actually bound to.
    ///
    /// Useful when the configured port is 0 and the OS picked one.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop the receive loop and release the socket.
    ///
    /// Signals the loop, then waits for the task to finish. When this
    /// returns the socket is closed and the port is rebindable. The signal
    /// send is best-effort; if the loop is already gone the await still
    /// completes.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("Listener task terminated abnormally: {}", e);
        }
        debug!("Listener stopped");
    }
}

/// Bind a UDP socket with address reuse and broadcast reception enabled
fn bind_udp(addr: SocketAddr) -> Result<UdpSocket> {
    let socket = Socket::new(Domain::for_address(addr), Type::DGRAM, Some(Protocol::UDP))?;
    socket.set_reuse_address(true)?;
    socket.set_broadcast(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;

    Ok(UdpSocket::from_std(socket.into())?)
}

/// Receive loop. Exits only when the shutdown channel fires.
async fn run_loop(
    socket: UdpSocket,
    buffer_size: usize,
    forwarder: Arc<dyn Forward>,
    mut shutdown_rx: broadcast::Receiver<bool>,
) {
    let mut buf = vec![0u8; buffer_size];

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                info!("Shutdown signal received, stopping listener");
                break;
            }
            result = socket.recv_from(&mut buf) => {
                match result {
                    Ok((len, src)) => {
                        handle_datagram(&buf[..len], src, forwarder.as_ref()).await;
                    }
                    Err(e) => {
                        // Transient receive errors (e.g. ICMP-induced) must
                        // not kill the loop.
                        warn!("UDP receive error: {}", e);
                    }
                }
            }
        }
    }

    debug!("Listener loop terminated");
}

/// Process one datagram: decode, forward, log. Never fails the loop.
async fn handle_datagram(payload: &[u8], src: SocketAddr, forwarder: &dyn Forward) {
    debug!(
        "Received {} bytes from {}: {}",
        payload.len(),
        src,
        String::from_utf8_lossy(&payload[..payload.len().min(PREVIEW_BYTES)])
    );

    let message = match decode_payload(payload) {
        Ok(message) => message,
        Err(e) => {
            warn!("Dropping datagram from {}: {}", src, e);
            return;
        }
    };

    if let Err(e) = forwarder.forward(&message).await {
        warn!("Forwarding failed: {}", e);
    }
}

/// Decode a datagram payload as a UTF-8 JSON value
fn decode_payload(payload: &[u8]) -> Result<Value, RelayError> {
    let text = std::str::from_utf8(payload)
        .map_err(|e| RelayError::Decode(format!("invalid UTF-8: {}", e)))?;

    serde_json::from_str(text).map_err(|e| RelayError::Decode(format!("invalid JSON: {}", e)))
}
