use serde::{Deserialize, Serialize};

/// Transient playhead condition reported by a client alongside its position.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlayheadState {
    Playing,
    Paused,
    Buffering,
}

/// The server-side playback checkpoint for one room.
///
/// The server never runs its own playback clock: `current_time` is the last
/// client-reported position and `last_updated` tells readers how stale it
/// is. Clients extrapolate locally if they care.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub video_id: Option<String>,
    /// Last reported position in seconds, never negative.
    pub current_time: f64,
    pub is_playing: bool,
    /// Epoch milliseconds of the last accepted mutation.
    pub last_updated: i64,
}

impl PlaybackState {
    /// Fresh checkpoint for a newly selected video: position zero, paused.
    pub fn for_video(video_id: impl Into<String>, now: i64) -> Self {
        Self {
            video_id: Some(video_id.into()),
            current_time: 0.0,
            is_playing: false,
            last_updated: now,
        }
    }

    /// Empty checkpoint, used when a playback report arrives before any
    /// video selection reached this server instance.
    pub fn empty(now: i64) -> Self {
        Self {
            video_id: None,
            current_time: 0.0,
            is_playing: false,
            last_updated: now,
        }
    }

    /// Apply a client playback report. `Buffering` is a transient hint and
    /// leaves the last playing/paused value untouched.
    pub fn apply(&mut self, state: PlayheadState, current_time: f64, now: i64) {
        self.current_time = current_time.max(0.0);
        match state {
            PlayheadState::Playing => self.is_playing = true,
            PlayheadState::Paused => self.is_playing = false,
            PlayheadState::Buffering => {}
        }
        self.last_updated = now;
    }

    /// Overwrite the checkpoint from a peer's `sync_response`. Lets the
    /// cache heal from empty or stale using peer knowledge.
    pub fn absorb_peer_report(
        &mut self,
        current_time: f64,
        is_playing: bool,
        video_id: Option<String>,
        now: i64,
    ) {
        self.current_time = current_time.max(0.0);
        self.is_playing = is_playing;
        self.video_id = video_id;
        self.last_updated = now;
    }
}
