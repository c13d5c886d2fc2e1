use async_trait::async_trait;
use syncroom_core::{ConnectionId, ServerEvent};

/// Outbound delivery seam between room actors and the transport. Rooms only
/// address connections; the implementor decides how bytes leave the process,
/// which lets tests swap in a recording sink.
///
/// Delivery is fire-and-forget: a missing or dead target is dropped without
/// feedback to the caller.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn deliver(&self, target: ConnectionId, event: &ServerEvent);
}
