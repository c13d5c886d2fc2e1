use crate::model::ids::{RoomId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Voice,
    System,
}

/// A chat message as submitted by a client, before the relay stamps it.
/// `content` carries text; `voice_ref` points at an uploaded voice clip
/// served by the external file store.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatDraft {
    pub room_id: RoomId,
    pub user_id: UserId,
    pub username: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_ref: Option<String>,
}

/// The relayed message: the draft plus a server-assigned id (unique across
/// the relay's lifetime, for client-side deduplication against optimistic
/// local copies) and the server receive time.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    #[serde(flatten)]
    pub draft: ChatDraft,
    pub time: DateTime<Utc>,
}

impl ChatMessage {
    /// Stamp a draft with a fresh id and the current receive time.
    pub fn stamp(draft: ChatDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            draft,
            time: Utc::now(),
        }
    }
}
