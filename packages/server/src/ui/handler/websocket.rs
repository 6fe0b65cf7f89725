//! WebSocket connection handlers.
//!
//! Registration happens before the upgrade completes, so by the time a peer
//! can send anything its slot in the registry is already settled. Each
//! upgraded socket then runs three tasks: the receive loop, the outbound
//! pusher loop and the heartbeat.

use std::{fmt, sync::Arc};

use axum::{
    extract::{
        Path, State,
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade, close_code},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{ClientId, ConnectionHandle, EventId, PushFrame},
    ui::{
        heartbeat::{PeerRole, is_liveness_frame, next_frame, spawn_heartbeat},
        state::AppState,
    },
    usecase::{decode_kiosk_message, decode_mobile_message},
};

use super::ApiError;

/// Identity a connection was accepted under
#[derive(Debug, Clone)]
enum Peer {
    Kiosk { event_id: EventId },
    Mobile { client_id: ClientId, event_id: EventId },
}

impl Peer {
    fn role(&self) -> PeerRole {
        match self {
            Peer::Kiosk { .. } => PeerRole::Kiosk,
            Peer::Mobile { .. } => PeerRole::Mobile,
        }
    }
}

impl fmt::Display for Peer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Peer::Kiosk { event_id } => write!(f, "kiosk of event '{}'", event_id),
            Peer::Mobile {
                client_id,
                event_id,
            } => write!(f, "client '{}' of event '{}'", client_id, event_id),
        }
    }
}

/// `GET /ws/kiosk/{event_id}`
pub async fn kiosk_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let event_id = EventId::try_from(event_id).inspect_err(|e| {
        tracing::warn!("Rejecting kiosk connection: {}", e);
    })?;

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(tx);
    state
        .connect_peer_usecase
        .connect_kiosk(event_id.clone(), handle.clone())
        .await?;

    let peer = Peer::Kiosk { event_id };
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, peer, handle, rx)))
}

/// `GET /ws/mobile/{client_id}/{event_id}`
pub async fn mobile_ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((client_id, event_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let client_id = ClientId::try_from(client_id).inspect_err(|e| {
        tracing::warn!("Rejecting mobile connection: {}", e);
    })?;
    let event_id = EventId::try_from(event_id).inspect_err(|e| {
        tracing::warn!("Rejecting mobile connection: {}", e);
    })?;

    let (tx, rx) = mpsc::unbounded_channel();
    let handle = ConnectionHandle::new(tx);
    state
        .connect_peer_usecase
        .connect_mobile(client_id.clone(), event_id.clone(), handle.clone())
        .await?;

    let peer = Peer::Mobile {
        client_id,
        event_id,
    };
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, peer, handle, rx)))
}

/// Drain queued frames into the WebSocket sink.
///
/// `PushFrame::Close` sends a close frame and ends the loop, which in turn
/// tears the whole connection down.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<PushFrame>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            match frame {
                PushFrame::Text(text) => {
                    if sender.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                PushFrame::Close => {
                    let close = CloseFrame {
                        code: close_code::NORMAL,
                        reason: "replaced by a newer connection".into(),
                    };
                    let _ = sender.send(Message::Close(Some(close))).await;
                    break;
                }
            }
        }
    })
}

async fn route_text(state: &AppState, peer: &Peer, text: &str) {
    match peer {
        Peer::Kiosk { event_id } => match decode_kiosk_message(text) {
            Ok(message) => {
                let delivery = state.relay_message_usecase.from_kiosk(event_id, message).await;
                tracing::debug!("Kiosk message from event '{}': {:?}", event_id, delivery);
            }
            Err(e) => tracing::warn!("Ignoring malformed message from {}: {}", peer, e),
        },
        Peer::Mobile {
            client_id,
            event_id,
        } => match decode_mobile_message(text) {
            Ok(message) => {
                let delivery = state
                    .relay_message_usecase
                    .from_mobile(client_id, event_id, message)
                    .await;
                tracing::debug!("Mobile message from '{}': {:?}", client_id, delivery);
            }
            Err(e) => tracing::warn!("Ignoring malformed message from {}: {}", peer, e),
        },
    }
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    peer: Peer,
    handle: ConnectionHandle,
    rx: mpsc::UnboundedReceiver<PushFrame>,
) {
    tracing::info!("Connection opened for {}", peer);
    let connection_id = handle.id();
    let (sender, mut receiver) = socket.split();

    let role = peer.role();
    let heartbeat = spawn_heartbeat(role, handle, role.ping_interval(&state.heartbeat));

    let idle_timeout = state.heartbeat.idle_timeout;
    let recv_state = state.clone();
    let recv_peer = peer.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(frame) = next_frame(&mut receiver, idle_timeout).await {
            let msg = match frame {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on {}: {}", recv_peer, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    if is_liveness_frame(&text) {
                        tracing::trace!("Liveness frame from {}", recv_peer);
                        continue;
                    }
                    route_text(&recv_state, &recv_peer, &text).await;
                }
                Message::Close(_) => {
                    tracing::info!("{} requested close", recv_peer);
                    break;
                }
                _ => {}
            }
        }
    });

    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // No ping may go out once the registry entry is released.
    heartbeat.abort();

    match &peer {
        Peer::Kiosk { event_id } => {
            state
                .disconnect_peer_usecase
                .kiosk_left(event_id, connection_id)
                .await
        }
        Peer::Mobile { client_id, .. } => {
            state
                .disconnect_peer_usecase
                .mobile_left(client_id, connection_id)
                .await
        }
    }
    tracing::info!("Connection closed for {}", peer);
}
