use crate::model::ids::{ConnectionId, UserId};
use serde::{Deserialize, Serialize};

/// One user's live presence in a room. Rosters hold at most one entry per
/// `user_id`; a rejoin replaces the previous entry wholesale.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub connection_id: ConnectionId,
    pub user_id: UserId,
    pub username: String,
    pub avatar_color: String,
    /// Epoch milliseconds at registration.
    pub joined_at: i64,
}
