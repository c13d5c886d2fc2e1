use syncroom_core::{ChatDraft, ConnectionId, PlayheadState, UserId, VideoInfo};

/// Commands entering a room actor from the gateway, in server arrival
/// order. `from` is the connection the event must not be echoed back to.
#[derive(Debug)]
pub enum RoomCommand {
    /// A connection registers in the room, replacing any prior entry for
    /// the same user (reconnect-as-replace).
    Join {
        connection_id: ConnectionId,
        user_id: UserId,
        username: String,
        avatar_color: String,
    },

    /// Transport-level disconnect or a join elsewhere. Idempotent.
    Disconnect { connection_id: ConnectionId },

    /// Chat fan-out; echoed to the sender with the stamped id.
    Chat { draft: ChatDraft },

    Typing {
        from: ConnectionId,
        username: String,
    },
    StopTyping {
        from: ConnectionId,
        username: String,
    },

    /// New video selection: resets the playback checkpoint.
    VideoChange {
        from: ConnectionId,
        video: VideoInfo,
    },

    /// Client playback report: play/pause/seek/buffer, one event for all.
    Playback {
        from: ConnectionId,
        state: PlayheadState,
        current_time: f64,
    },

    /// Catch-up handshake: ask the rest of the room to answer `from`.
    RequestSync { from: ConnectionId },

    /// A peer's answer, relayed privately to the requester; the actor also
    /// absorbs it into the checkpoint cache.
    SyncResponse {
        to: ConnectionId,
        current_time: f64,
        is_playing: bool,
        video_id: Option<String>,
    },

    ScreenShareStart {
        from: ConnectionId,
        sharer_name: String,
    },
    ScreenShareStop { from: ConnectionId },
}
