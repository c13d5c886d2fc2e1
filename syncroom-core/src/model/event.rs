use crate::model::chat::{ChatDraft, ChatMessage};
use crate::model::ids::{ConnectionId, RoomId, UserId};
use crate::model::participant::Participant;
use crate::model::playback::{PlaybackState, PlayheadState};
use crate::model::video::VideoInfo;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Everything a client may send over its socket.
///
/// WebRTC payloads (`offer`/`answer`/`candidate`) are opaque blobs: the
/// relay addresses them by target connection and never looks inside.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    JoinRoom {
        room_id: RoomId,
        user_id: UserId,
        username: String,
        avatar_color: String,
    },
    SendMessage(ChatDraft),
    Typing {
        room_id: RoomId,
        username: String,
    },
    StopTyping {
        room_id: RoomId,
        username: String,
    },
    VideoChange {
        room_id: RoomId,
        video: VideoInfo,
    },
    PlaybackEvent {
        room_id: RoomId,
        state: PlayheadState,
        current_time: f64,
    },
    RequestSync {
        room_id: RoomId,
    },
    SyncResponse {
        to_connection_id: ConnectionId,
        current_time: f64,
        is_playing: bool,
        video_id: Option<String>,
    },
    ScreenShareStart {
        room_id: RoomId,
        sharer_name: String,
    },
    ScreenShareStop {
        room_id: RoomId,
    },
    WebrtcRequest {
        target_connection_id: ConnectionId,
    },
    WebrtcOffer {
        target_connection_id: ConnectionId,
        offer: Value,
    },
    WebrtcAnswer {
        target_connection_id: ConnectionId,
        answer: Value,
    },
    WebrtcIce {
        target_connection_id: ConnectionId,
        candidate: Value,
    },
}

/// Everything the server may push to a client.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// First message on every connection: the server-assigned identity the
    /// client is addressable by.
    Welcome {
        connection_id: ConnectionId,
    },
    /// Full roster snapshot, sent to the whole room on every change.
    RoomUsers(Vec<Participant>),
    UserJoined {
        username: String,
    },
    UserLeft {
        username: String,
    },
    /// Cached playback checkpoint, pushed privately to a new joiner.
    InitialSync(PlaybackState),
    ReceiveMessage(ChatMessage),
    Typing {
        username: String,
    },
    StopTyping {
        username: String,
    },
    VideoChange {
        video: VideoInfo,
    },
    PlaybackEvent {
        state: PlayheadState,
        current_time: f64,
        server_ts: i64,
    },
    SyncPlease {
        to_connection_id: ConnectionId,
    },
    SyncResponse {
        current_time: f64,
        is_playing: bool,
        video_id: Option<String>,
    },
    ScreenShareAvailable {
        sharer_id: ConnectionId,
        sharer_name: String,
    },
    ScreenShareEnded,
    WebrtcRequest {
        from_connection_id: ConnectionId,
    },
    WebrtcOffer {
        from_connection_id: ConnectionId,
        offer: Value,
    },
    WebrtcAnswer {
        from_connection_id: ConnectionId,
        answer: Value,
    },
    WebrtcIce {
        from_connection_id: ConnectionId,
        candidate: Value,
    },
}
