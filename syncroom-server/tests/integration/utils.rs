use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use syncroom_core::{ConnectionId, RoomId, ServerEvent, UserId};
use syncroom_server::{EventSink, Room, RoomCommand};
use tokio::sync::{Mutex, mpsc};
use tokio::time::timeout;
use tracing::Level;

pub type Delivery = (ConnectionId, ServerEvent);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Recording sink: every delivery is stored and forwarded to a receiver so
/// tests can await them deterministically.
pub struct MockEventSink {
    tx: mpsc::UnboundedSender<Delivery>,
    events: Mutex<Vec<Delivery>>,
}

impl MockEventSink {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Arc::new(Self {
            tx,
            events: Mutex::new(Vec::new()),
        });
        (sink, rx)
    }

    /// All events delivered to one connection, in delivery order.
    pub async fn events_for(&self, connection_id: ConnectionId) -> Vec<ServerEvent> {
        self.events
            .lock()
            .await
            .iter()
            .filter(|(to, _)| *to == connection_id)
            .map(|(_, event)| event.clone())
            .collect()
    }
}

#[async_trait]
impl EventSink for MockEventSink {
    async fn deliver(&self, target: ConnectionId, event: &ServerEvent) {
        let delivery = (target, event.clone());
        self.events.lock().await.push(delivery.clone());
        let _ = self.tx.send(delivery);
    }
}

pub struct TestRoom {
    pub tx: mpsc::Sender<RoomCommand>,
    pub rx: mpsc::UnboundedReceiver<Delivery>,
    pub sink: Arc<MockEventSink>,
}

pub fn spawn_room(room_id: &str) -> TestRoom {
    let (tx, command_rx) = mpsc::channel(64);
    let (sink, rx) = MockEventSink::new();

    let room = Room::new(RoomId::from(room_id), command_rx, sink.clone());
    tokio::spawn(room.run());

    TestRoom { tx, rx, sink }
}

/// Join with a fresh connection; user id and username both come from
/// `user`. Returns the new connection's id.
pub async fn join(room: &TestRoom, user: &str) -> ConnectionId {
    let connection_id = ConnectionId::new();
    join_as(room, connection_id, user).await;
    connection_id
}

/// Join on an existing connection, as when one socket asserts a second
/// identity.
pub async fn join_as(room: &TestRoom, connection_id: ConnectionId, user: &str) {
    room.tx
        .send(RoomCommand::Join {
            connection_id,
            user_id: UserId::from(user),
            username: user.to_string(),
            avatar_color: "#336699".into(),
        })
        .await
        .expect("room task gone");
}

/// Await exactly `n` deliveries, failing loudly on a stall.
pub async fn expect_deliveries(
    rx: &mut mpsc::UnboundedReceiver<Delivery>,
    n: usize,
) -> Vec<Delivery> {
    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let delivery = timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap_or_else(|_| panic!("timed out waiting for delivery {} of {}", i + 1, n))
            .expect("sink channel closed");
        out.push(delivery);
    }
    out
}

/// Assert nothing else was delivered.
pub async fn assert_silent(rx: &mut mpsc::UnboundedReceiver<Delivery>) {
    if let Ok(Some((to, event))) = timeout(Duration::from_millis(100), rx.recv()).await {
        panic!("unexpected delivery to {to}: {event:?}");
    }
}
