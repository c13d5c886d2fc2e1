mod event_sink;
mod gateway_service;
mod ws_handler;

pub use event_sink::*;
pub use gateway_service::*;
pub use ws_handler::*;
