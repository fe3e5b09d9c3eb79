// TCP client for the ShakeMap queue.
//
// Each message is `{"type": "<topic>", "data": {...}}` written to a fresh
// connection which is then shut down. Delivery failures are reported to
// the caller and never retried.

use std::net::{Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::debug;

use crate::record::{CancelRecord, EventRecord};

/// Default port the queue listens on.
pub const DEFAULT_QUEUE_PORT: u16 = 9755;

/// Message kinds the queue understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Topic {
    Origin,
    Cancel,
}

impl Topic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topic::Origin => "origin",
            Topic::Cancel => "cancel",
        }
    }
}

/// Payload carried by a queue message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueuePayload {
    Origin(EventRecord),
    Cancel(CancelRecord),
}

/// One message for the queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueMessage {
    #[serde(rename = "type")]
    pub topic: Topic,
    pub data: QueuePayload,
}

impl QueueMessage {
    pub fn origin(record: EventRecord) -> Self {
        Self {
            topic: Topic::Origin,
            data: QueuePayload::Origin(record),
        }
    }

    pub fn cancel(record: CancelRecord) -> Self {
        Self {
            topic: Topic::Cancel,
            data: QueuePayload::Cancel(record),
        }
    }

    /// Event id the message is about.
    pub fn event_id(&self) -> &str {
        match &self.data {
            QueuePayload::Origin(r) => &r.id,
            QueuePayload::Cancel(r) => &r.id,
        }
    }
}

/// Somewhere queue messages can be delivered.
#[async_trait]
pub trait QueueSink: Send + Sync {
    async fn send(&self, message: &QueueMessage) -> Result<()>;
}

/// Fire-and-forget TCP delivery to the local queue.
pub struct TcpQueueClient {
    addr: SocketAddr,
}

impl TcpQueueClient {
    /// Client for the queue on localhost at `port`.
    pub fn new(port: u16) -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, port)),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }
}

#[async_trait]
impl QueueSink for TcpQueueClient {
    async fn send(&self, message: &QueueMessage) -> Result<()> {
        let body = serde_json::to_vec(message).context("Failed to serialize queue message")?;

        let mut stream = TcpStream::connect(self.addr)
            .await
            .with_context(|| format!("Failed to connect to ShakeMap queue at {}", self.addr))?;
        stream
            .write_all(&body)
            .await
            .context("Failed to write queue message")?;
        stream
            .shutdown()
            .await
            .context("Failed to close queue connection")?;

        debug!(
            topic = message.topic.as_str(),
            event_id = message.event_id(),
            bytes = body.len(),
            "Queue message delivered"
        );
        Ok(())
    }
}
