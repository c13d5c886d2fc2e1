use crate::gateway::EventSink;
use crate::room::room_command::RoomCommand;
use crate::room::room_manager::RoomManager;
use crate::room::roster::Roster;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use syncroom_core::{
    ChatDraft, ChatMessage, ConnectionId, Participant, PlaybackState, PlayheadState, RoomId,
    ServerEvent, UserId, VideoInfo,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// One room's actor. All per-room state lives here and is mutated by this
/// task alone; inbound commands are handled to completion in arrival order,
/// so no further locking is needed inside a room.
///
/// The actor exits once the roster empties after having been occupied,
/// evicting the playback checkpoint with it.
pub struct Room {
    id: RoomId,
    roster: Roster,
    playback: Option<PlaybackState>,
    /// Connections currently screen-sharing, tracked only so viewers get a
    /// share-ended notice when a sharer drops.
    sharers: HashSet<ConnectionId>,
    occupied: bool,
    command_rx: mpsc::Receiver<RoomCommand>,
    sink: Arc<dyn EventSink>,
    /// Way back into the room map, so a shutdown can hand late joins to
    /// this room's successor instead of dropping them.
    manager: Option<RoomManager>,
}

impl Room {
    pub fn new(id: RoomId, command_rx: mpsc::Receiver<RoomCommand>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            id,
            roster: Roster::new(),
            playback: None,
            sharers: HashSet::new(),
            occupied: false,
            command_rx,
            sink,
            manager: None,
        }
    }

    pub fn with_manager(mut self, manager: RoomManager) -> Self {
        self.manager = Some(manager);
        self
    }

    pub async fn run(mut self) {
        info!(room = %self.id, "room task started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle(cmd).await;

            if self.occupied && self.roster.is_empty() {
                self.shut_down().await;
                break;
            }
        }

        info!(room = %self.id, "room empty, task finished");
    }

    /// The roster just emptied. Close the command channel first so the
    /// manager fails over to a fresh actor, then flush everything that was
    /// already queued: a join racing the shutdown is re-routed to the
    /// successor room instead of evaporating with this one. Commands that
    /// follow a re-routed join go to the successor too, preserving their
    /// relative order.
    async fn shut_down(&mut self) {
        self.command_rx.close();

        let mut successor: Option<mpsc::Sender<RoomCommand>> = None;
        while let Some(cmd) = self.command_rx.recv().await {
            if matches!(cmd, RoomCommand::Join { .. }) && successor.is_none() {
                let Some(manager) = &self.manager else {
                    continue;
                };
                successor = Some(manager.join_sender(&self.id));
            }
            match &successor {
                Some(next) => {
                    let _ = next.send(cmd).await;
                }
                None => self.handle(cmd).await,
            }
        }
    }

    async fn handle(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                connection_id,
                user_id,
                username,
                avatar_color,
            } => {
                self.handle_join(connection_id, user_id, username, avatar_color)
                    .await;
            }
            RoomCommand::Disconnect { connection_id } => {
                self.handle_disconnect(connection_id).await;
            }

            RoomCommand::Chat { draft } => self.handle_chat(draft).await,
            RoomCommand::Typing { from, username } => {
                self.broadcast_except(from, &ServerEvent::Typing { username })
                    .await;
            }
            RoomCommand::StopTyping { from, username } => {
                self.broadcast_except(from, &ServerEvent::StopTyping { username })
                    .await;
            }

            RoomCommand::VideoChange { from, video } => {
                self.handle_video_change(from, video).await;
            }
            RoomCommand::Playback {
                from,
                state,
                current_time,
            } => {
                self.handle_playback(from, state, current_time).await;
            }
            RoomCommand::RequestSync { from } => {
                // Not an elected host: every other participant is asked,
                // and the requester keeps whichever answer matches its
                // selected video.
                self.broadcast_except(
                    from,
                    &ServerEvent::SyncPlease {
                        to_connection_id: from,
                    },
                )
                .await;
            }
            RoomCommand::SyncResponse {
                to,
                current_time,
                is_playing,
                video_id,
            } => {
                self.handle_sync_response(to, current_time, is_playing, video_id)
                    .await;
            }

            RoomCommand::ScreenShareStart { from, sharer_name } => {
                self.sharers.insert(from);
                self.broadcast_except(
                    from,
                    &ServerEvent::ScreenShareAvailable {
                        sharer_id: from,
                        sharer_name,
                    },
                )
                .await;
            }
            RoomCommand::ScreenShareStop { from } => {
                self.sharers.remove(&from);
                self.broadcast_except(from, &ServerEvent::ScreenShareEnded)
                    .await;
            }
        }
    }

    async fn handle_join(
        &mut self,
        connection_id: ConnectionId,
        user_id: UserId,
        username: String,
        avatar_color: String,
    ) {
        let participant = Participant {
            connection_id,
            user_id,
            username: username.clone(),
            avatar_color,
            joined_at: now_ms(),
        };

        let mut displaced_share = false;
        if let Some(displaced) = self.roster.insert(participant) {
            debug!(room = %self.id, user = %displaced.user_id, "rejoin displaced prior connection");
            displaced_share = self.sharers.remove(&displaced.connection_id);
        }
        self.occupied = true;

        // Full snapshot to everyone, joiner included: consistent even for
        // clients that missed earlier deltas.
        self.broadcast(&ServerEvent::RoomUsers(self.roster.snapshot()))
            .await;
        self.broadcast_except(connection_id, &ServerEvent::UserJoined { username })
            .await;

        if displaced_share {
            // The old connection's stream is gone with it; its viewers must
            // tear down. The fresh connection has not announced a share yet,
            // so it is skipped.
            self.broadcast_except(connection_id, &ServerEvent::ScreenShareEnded)
                .await;
        }

        // Short-circuit the sync handshake when a checkpoint exists. The
        // position may be stale since last_updated; clients tolerate that
        // or issue request_sync themselves.
        if let Some(state) = &self.playback {
            self.sink
                .deliver(connection_id, &ServerEvent::InitialSync(state.clone()))
                .await;
        }

        info!(room = %self.id, %connection_id, participants = self.roster.len(), "participant joined");
    }

    async fn handle_disconnect(&mut self, connection_id: ConnectionId) {
        let departed = self.roster.remove(connection_id);
        let Some(last) = departed.last() else {
            return;
        };
        let username = last.username.clone();
        let was_sharing = self.sharers.remove(&connection_id);

        info!(room = %self.id, %connection_id, participants = self.roster.len(), "participant left");

        if self.roster.is_empty() {
            return;
        }

        self.broadcast(&ServerEvent::RoomUsers(self.roster.snapshot()))
            .await;
        self.broadcast(&ServerEvent::UserLeft { username }).await;

        if was_sharing {
            // Viewers must tear down their peer connections.
            self.broadcast(&ServerEvent::ScreenShareEnded).await;
        }
    }

    async fn handle_chat(&mut self, draft: ChatDraft) {
        let message = ChatMessage::stamp(draft);
        // Everyone including the sender: the echo carries the authoritative
        // id and timestamp the sender reconciles its optimistic copy with.
        self.broadcast(&ServerEvent::ReceiveMessage(message)).await;
    }

    async fn handle_video_change(&mut self, from: ConnectionId, video: VideoInfo) {
        self.playback = Some(PlaybackState::for_video(video.id.clone(), now_ms()));
        debug!(room = %self.id, video = %video.id, "video changed, checkpoint reset");
        self.broadcast_except(from, &ServerEvent::VideoChange { video })
            .await;
    }

    async fn handle_playback(
        &mut self,
        from: ConnectionId,
        state: PlayheadState,
        current_time: f64,
    ) {
        let now = now_ms();
        self.playback
            .get_or_insert_with(|| PlaybackState::empty(now))
            .apply(state, current_time, now);

        self.broadcast_except(
            from,
            &ServerEvent::PlaybackEvent {
                state,
                current_time,
                server_ts: now,
            },
        )
        .await;
    }

    async fn handle_sync_response(
        &mut self,
        to: ConnectionId,
        current_time: f64,
        is_playing: bool,
        video_id: Option<String>,
    ) {
        self.sink
            .deliver(
                to,
                &ServerEvent::SyncResponse {
                    current_time,
                    is_playing,
                    video_id: video_id.clone(),
                },
            )
            .await;

        // Opportunistic cache heal: a peer answering the handshake knows at
        // least as much as this server does.
        let now = now_ms();
        self.playback
            .get_or_insert_with(|| PlaybackState::empty(now))
            .absorb_peer_report(current_time, is_playing, video_id, now);
    }

    async fn broadcast(&self, event: &ServerEvent) {
        for connection in self.roster.connections() {
            self.sink.deliver(connection, event).await;
        }
    }

    async fn broadcast_except(&self, skip: ConnectionId, event: &ServerEvent) {
        for connection in self.roster.connections() {
            if connection != skip {
                self.sink.deliver(connection, event).await;
            }
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
