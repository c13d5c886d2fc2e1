use crate::gateway::EventSink;
use crate::room::{Room, RoomCommand};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use syncroom_core::RoomId;
use tokio::sync::mpsc;
use tracing::info;

const ROOM_COMMAND_BUFFER: usize = 256;

/// Spawns and addresses room actors. The map is guarded at the map level
/// only; everything inside a room belongs to that room's task.
#[derive(Clone)]
pub struct RoomManager {
    rooms: Arc<DashMap<RoomId, mpsc::Sender<RoomCommand>>>,
    sink: Arc<dyn EventSink>,
}

impl RoomManager {
    pub fn new(sink: Arc<dyn EventSink>) -> Self {
        Self {
            rooms: Arc::new(DashMap::new()),
            sink,
        }
    }

    /// Sender for the room, spawning its actor if the room does not exist
    /// yet (or its previous actor already exited). Only the join path may
    /// materialize a room.
    pub fn join_sender(&self, room_id: &RoomId) -> mpsc::Sender<RoomCommand> {
        match self.rooms.entry(room_id.clone()) {
            Entry::Occupied(occupied) if !occupied.get().is_closed() => occupied.get().clone(),
            Entry::Occupied(mut occupied) => {
                let tx = self.spawn_room(room_id);
                occupied.insert(tx.clone());
                tx
            }
            Entry::Vacant(vacant) => {
                let tx = self.spawn_room(room_id);
                vacant.insert(tx.clone());
                tx
            }
        }
    }

    fn spawn_room(&self, room_id: &RoomId) -> mpsc::Sender<RoomCommand> {
        info!(room = %room_id, "creating room");
        let (tx, rx) = mpsc::channel(ROOM_COMMAND_BUFFER);
        let room = Room::new(room_id.clone(), rx, self.sink.clone()).with_manager(self.clone());

        let rooms = Arc::clone(&self.rooms);
        let evict_id = room_id.clone();
        let evict_tx = tx.clone();
        tokio::spawn(async move {
            room.run().await;
            // Drop the map entry, unless a newer actor already replaced it.
            rooms.remove_if(&evict_id, |_, current| evict_tx.same_channel(current));
        });

        tx
    }

    /// Sender for an already-live room; `None` when nobody ever joined it
    /// (or its actor has exited).
    pub fn existing_sender(&self, room_id: &RoomId) -> Option<mpsc::Sender<RoomCommand>> {
        self.rooms
            .get(room_id)
            .map(|tx| tx.clone())
            .filter(|tx| !tx.is_closed())
    }

    /// Number of rooms with a live actor entry.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}
