use crate::gateway::{ClientGateway, EventSink};
use crate::room::{RoomCommand, RoomManager};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use syncroom_core::{ClientEvent, ConnectionId, RoomId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub gateway: ClientGateway,
    pub rooms: RoomManager,
}

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = ConnectionId::new();
    info!(%connection_id, "new websocket connection");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.gateway.add(connection_id, tx);
    state
        .gateway
        .deliver(connection_id, &ServerEvent::Welcome { connection_id })
        .await;

    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    // The room this connection last joined. One room per connection; a
    // second join_room leaves the previous room first.
    let mut session: Option<(RoomId, mpsc::Sender<RoomCommand>)> = None;

    while let Some(Ok(msg)) = receiver.next().await {
        match msg {
            Message::Text(text) => match serde_json::from_str::<ClientEvent>(&text) {
                Ok(event) => handle_event(&state, connection_id, event, &mut session).await,
                Err(e) => warn!(%connection_id, "malformed client event dropped: {e}"),
            },
            Message::Close(_) => break,
            _ => {}
        }
    }

    // Transport-level close is the only disconnect signal; cleanup runs
    // unconditionally once the receive loop ends.
    if let Some((room_id, room)) = session.take() {
        let cmd = RoomCommand::Disconnect { connection_id };
        if let Err(mpsc::error::SendError(cmd)) = room.send(cmd).await {
            // The actor we joined through exited; our join may have been
            // handed to a successor actor that now holds our roster entry.
            if let Some(room) = state.rooms.existing_sender(&room_id) {
                let _ = room.send(cmd).await;
            }
        }
    }
    send_task.abort();
    state.gateway.remove(connection_id);
    info!(%connection_id, "websocket disconnected");
}

async fn handle_event(
    state: &AppState,
    connection_id: ConnectionId,
    event: ClientEvent,
    session: &mut Option<(RoomId, mpsc::Sender<RoomCommand>)>,
) {
    match event {
        ClientEvent::JoinRoom {
            room_id,
            user_id,
            username,
            avatar_color,
        } => {
            let mut room = state.rooms.join_sender(&room_id);
            // Re-joining the same room replaces the roster entry in place;
            // only a move to a different room counts as leaving.
            if let Some((_, previous)) = session.take() {
                if !previous.same_channel(&room) {
                    let _ = previous
                        .send(RoomCommand::Disconnect { connection_id })
                        .await;
                }
            }
            let cmd = RoomCommand::Join {
                connection_id,
                user_id,
                username,
                avatar_color,
            };
            // The actor can exit between join_sender and send; one retry
            // through the manager reaches its replacement.
            if let Err(mpsc::error::SendError(cmd)) = room.send(cmd).await {
                room = state.rooms.join_sender(&room_id);
                let _ = room.send(cmd).await;
            }
            *session = Some((room_id, room));
        }

        ClientEvent::SendMessage(draft) => {
            let room_id = draft.room_id.clone();
            route(state, &room_id, RoomCommand::Chat { draft }).await;
        }
        ClientEvent::Typing { room_id, username } => {
            route(
                state,
                &room_id,
                RoomCommand::Typing {
                    from: connection_id,
                    username,
                },
            )
            .await;
        }
        ClientEvent::StopTyping { room_id, username } => {
            route(
                state,
                &room_id,
                RoomCommand::StopTyping {
                    from: connection_id,
                    username,
                },
            )
            .await;
        }

        ClientEvent::VideoChange { room_id, video } => {
            route(
                state,
                &room_id,
                RoomCommand::VideoChange {
                    from: connection_id,
                    video,
                },
            )
            .await;
        }
        ClientEvent::PlaybackEvent {
            room_id,
            state: playhead,
            current_time,
        } => {
            route(
                state,
                &room_id,
                RoomCommand::Playback {
                    from: connection_id,
                    state: playhead,
                    current_time,
                },
            )
            .await;
        }
        ClientEvent::RequestSync { room_id } => {
            route(
                state,
                &room_id,
                RoomCommand::RequestSync {
                    from: connection_id,
                },
            )
            .await;
        }
        ClientEvent::SyncResponse {
            to_connection_id,
            current_time,
            is_playing,
            video_id,
        } => {
            // Responses ride through the responder's own room so the actor
            // can absorb them into its checkpoint cache. A responder that
            // never joined has no cache to heal and no business answering.
            match session {
                Some((_, room)) => {
                    let _ = room
                        .send(RoomCommand::SyncResponse {
                            to: to_connection_id,
                            current_time,
                            is_playing,
                            video_id,
                        })
                        .await;
                }
                None => debug!(%connection_id, "sync_response from sessionless connection dropped"),
            }
        }

        ClientEvent::ScreenShareStart {
            room_id,
            sharer_name,
        } => {
            route(
                state,
                &room_id,
                RoomCommand::ScreenShareStart {
                    from: connection_id,
                    sharer_name,
                },
            )
            .await;
        }
        ClientEvent::ScreenShareStop { room_id } => {
            route(
                state,
                &room_id,
                RoomCommand::ScreenShareStop {
                    from: connection_id,
                },
            )
            .await;
        }

        // WebRTC signaling never touches room state: point-to-point, opaque
        // payload, sender identity injected server-side.
        ClientEvent::WebrtcRequest {
            target_connection_id,
        } => {
            state
                .gateway
                .deliver(
                    target_connection_id,
                    &ServerEvent::WebrtcRequest {
                        from_connection_id: connection_id,
                    },
                )
                .await;
        }
        ClientEvent::WebrtcOffer {
            target_connection_id,
            offer,
        } => {
            state
                .gateway
                .deliver(
                    target_connection_id,
                    &ServerEvent::WebrtcOffer {
                        from_connection_id: connection_id,
                        offer,
                    },
                )
                .await;
        }
        ClientEvent::WebrtcAnswer {
            target_connection_id,
            answer,
        } => {
            state
                .gateway
                .deliver(
                    target_connection_id,
                    &ServerEvent::WebrtcAnswer {
                        from_connection_id: connection_id,
                        answer,
                    },
                )
                .await;
        }
        ClientEvent::WebrtcIce {
            target_connection_id,
            candidate,
        } => {
            state
                .gateway
                .deliver(
                    target_connection_id,
                    &ServerEvent::WebrtcIce {
                        from_connection_id: connection_id,
                        candidate,
                    },
                )
                .await;
        }
    }
}

/// Route a room-scoped event to an existing room. Rooms are only
/// materialized by join_room; events for rooms nobody ever joined are
/// no-ops, matching the permissive best-effort relay contract.
async fn route(state: &AppState, room_id: &RoomId, cmd: RoomCommand) {
    match state.rooms.existing_sender(room_id) {
        Some(room) => {
            let _ = room.send(cmd).await;
        }
        None => debug!(room = %room_id, "event for unknown room dropped"),
    }
}
