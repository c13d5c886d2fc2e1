use syncroom_core::{ConnectionId, Participant};

/// The participant set of one room. Holds at most one entry per user:
/// inserting an already-present user replaces the old entry, which is how a
/// reconnect displaces its predecessor without an explicit resume protocol.
#[derive(Debug, Default)]
pub struct Roster {
    participants: Vec<Participant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant, displacing any prior entry for the same
    /// user. Returns the displaced entry so the caller can clean up
    /// per-connection state tied to it.
    pub fn insert(&mut self, participant: Participant) -> Option<Participant> {
        let displaced = self
            .participants
            .iter()
            .position(|p| p.user_id == participant.user_id)
            .map(|i| self.participants.remove(i));
        self.participants.push(participant);
        displaced
    }

    /// Remove every entry registered under `connection_id`, in join order.
    /// One physical connection holds several entries if it joined under
    /// different user ids; transport loss takes all of them out at once.
    /// Idempotent: unknown connections return nothing and change nothing.
    pub fn remove(&mut self, connection_id: ConnectionId) -> Vec<Participant> {
        self.participants
            .extract_if(.., |p| p.connection_id == connection_id)
            .collect()
    }

    /// Fresh snapshot of the current roster, in join order.
    pub fn snapshot(&self) -> Vec<Participant> {
        self.participants.clone()
    }

    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.participants.iter().map(|p| p.connection_id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}
