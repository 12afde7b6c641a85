//! # Transport Module
//!
//! The outbound seam between this crate and the hub connection.
//!
//! This module handles:
//! - Arming a device's subscription to a mode
//! - Writing an opcode + payload to a device on a port
//! - Forwarding both as requests over a channel to the connection task
//!
//! The Bluetooth session itself is owned by the caller.

use std::io;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Trait for outbound device operations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceTransport: Send {
    /// Arm the subscription of the device on `port` to `mode`
    async fn subscribe(&mut self, port: u8, mode: u8) -> io::Result<()>;

    /// Write `payload` with `opcode` to the device on `port`
    async fn write_direct(&mut self, port: u8, opcode: u8, payload: &[u8]) -> io::Result<()>;
}

/// Completion handle for a submitted request
pub type Completion = oneshot::Sender<io::Result<()>>;

/// Request handed to the connection task
#[derive(Debug)]
pub enum OutboundRequest {
    Subscribe {
        port: u8,
        mode: u8,
        done: Completion,
    },
    WriteDirect {
        port: u8,
        opcode: u8,
        payload: Bytes,
        done: Completion,
    },
}

/// Transport that forwards requests over an mpsc channel
///
/// The receiving side performs the actual write and reports the result on
/// the request's completion handle.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    tx: mpsc::Sender<OutboundRequest>,
}

impl ChannelTransport {
    /// Create a transport and the receiver the connection task drains
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OutboundRequest>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    async fn submit(
        &self,
        request: OutboundRequest,
        done: oneshot::Receiver<io::Result<()>>,
    ) -> io::Result<()> {
        self.tx
            .send(request)
            .await
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "connection task closed"))?;

        done.await
            .map_err(|_| io::Error::new(io::ErrorKind::Interrupted, "request dropped before completion"))?
    }
}

#[async_trait]
impl DeviceTransport for ChannelTransport {
    async fn subscribe(&mut self, port: u8, mode: u8) -> io::Result<()> {
        let (done, rx) = oneshot::channel();
        debug!("Submitting subscribe: port {} mode 0x{:02X}", port, mode);
        self.submit(OutboundRequest::Subscribe { port, mode, done }, rx).await
    }

    async fn write_direct(&mut self, port: u8, opcode: u8, payload: &[u8]) -> io::Result<()> {
        let (done, rx) = oneshot::channel();
        debug!("Submitting write: port {} opcode 0x{:02X} ({} bytes)", port, opcode, payload.len());
        let request = OutboundRequest::WriteDirect {
            port,
            opcode,
            payload: Bytes::copy_from_slice(payload),
            done,
        };
        self.submit(request, rx).await
    }
}
