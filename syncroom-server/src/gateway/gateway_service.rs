use crate::gateway::EventSink;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use std::sync::Arc;
use syncroom_core::{ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, error};

struct GatewayInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
}

/// Per-connection outbound half of the connection registry: maps a live
/// `ConnectionId` to the channel feeding its WebSocket send task. This is
/// also the point-to-point path for WebRTC signaling and private sync
/// delivery.
#[derive(Clone)]
pub struct ClientGateway {
    inner: Arc<GatewayInner>,
}

impl ClientGateway {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GatewayInner {
                connections: DashMap::new(),
            }),
        }
    }

    pub fn add(&self, connection_id: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(connection_id, tx);
    }

    /// Idempotent: removing an already-removed connection is a no-op.
    pub fn remove(&self, connection_id: ConnectionId) {
        self.inner.connections.remove(&connection_id);
    }

    pub fn is_connected(&self, connection_id: ConnectionId) -> bool {
        self.inner.connections.contains_key(&connection_id)
    }

    /// Serialize and enqueue an event for one connection. Unknown targets
    /// are dropped silently; signaling and sync traffic is best-effort and
    /// the sender is expected to retry at the application level.
    pub fn send_event(&self, target: ConnectionId, event: &ServerEvent) {
        let Some(tx) = self.inner.connections.get(&target) else {
            debug!(%target, "delivery target no longer connected, dropping");
            return;
        };
        match serde_json::to_string(event) {
            Ok(json) => {
                if tx.send(Message::Text(json.into())).is_err() {
                    debug!(%target, "send task gone, dropping event");
                }
            }
            Err(e) => error!("failed to serialize server event: {e}"),
        }
    }
}

impl Default for ClientGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for ClientGateway {
    async fn deliver(&self, target: ConnectionId, event: &ServerEvent) {
        self.send_event(target, event);
    }
}
