mod chat;
mod event;
mod ids;
mod participant;
mod playback;
mod video;

pub use chat::{ChatDraft, ChatMessage, MessageKind};
pub use event::{ClientEvent, ServerEvent};
pub use ids::{ConnectionId, RoomId, UserId};
pub use participant::Participant;
pub use playback::{PlaybackState, PlayheadState};
pub use video::VideoInfo;
