pub mod config;
pub mod error;
pub mod gateway;
pub mod room;

pub use config::Config;
pub use error::ConfigError;
pub use gateway::{AppState, ClientGateway, EventSink, ws_handler};
pub use room::{Room, RoomCommand, RoomManager, Roster};
