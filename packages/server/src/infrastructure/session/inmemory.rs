//! In-memory SessionRegistry 実装
//!
//! Both maps live behind one mutex, so every connect/disconnect/send is
//! serialized against every other. Pushing into a handle never awaits, which
//! keeps the critical sections short.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ClientId, ConnectionHandle, ConnectionId, Delivery, EventId, KioskMessage, MobileMessage,
    SessionRegistry, SessionSnapshot,
};

/// A registered phone and the event it is bound to
struct MobileSession {
    event_id: EventId,
    handle: ConnectionHandle,
}

#[derive(Default)]
struct Sessions {
    kiosks: HashMap<EventId, ConnectionHandle>,
    mobiles: HashMap<ClientId, MobileSession>,
}

impl Sessions {
    fn remove_kiosk(&mut self, event_id: &EventId) -> bool {
        match self.kiosks.remove(event_id) {
            Some(handle) => {
                handle.close();
                tracing::info!("Kiosk for event '{}' removed from registry", event_id);
                true
            }
            None => false,
        }
    }

    /// Close and remove the phone, then tell its kiosk
    fn remove_mobile(&mut self, client_id: &ClientId) -> bool {
        let Some(session) = self.mobiles.remove(client_id) else {
            return false;
        };
        session.handle.close();
        tracing::info!(
            "Client '{}' removed from registry (event '{}')",
            client_id,
            session.event_id
        );
        self.push_to_kiosk(
            &session.event_id,
            &KioskMessage::ClientDisconnected {
                client_id: client_id.clone(),
            },
        );
        true
    }

    fn push_to_kiosk(&mut self, event_id: &EventId, message: &KioskMessage) -> Delivery {
        let Some(handle) = self.kiosks.get(event_id) else {
            tracing::debug!("No kiosk for event '{}', dropping {:?}", event_id, message);
            return Delivery::NoPeer;
        };
        match handle.push(message) {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                tracing::warn!("Failed to push to kiosk of event '{}': {}", event_id, e);
                self.remove_kiosk(event_id);
                Delivery::Failed
            }
        }
    }

    fn push_to_mobile(&mut self, client_id: &ClientId, message: &MobileMessage) -> Delivery {
        let Some(session) = self.mobiles.get(client_id) else {
            tracing::debug!("No connection for client '{}', dropping {:?}", client_id, message);
            return Delivery::NoPeer;
        };
        match session.handle.push(message) {
            Ok(()) => Delivery::Delivered,
            Err(e) => {
                tracing::warn!("Failed to push to client '{}': {}", client_id, e);
                self.remove_mobile(client_id);
                Delivery::Failed
            }
        }
    }
}

/// SessionRegistry holding live connections in process memory.
///
/// Nothing survives a restart and nothing is queued for absent peers.
#[derive(Default)]
pub struct InMemorySessionRegistry {
    sessions: Mutex<Sessions>,
}

impl InMemorySessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRegistry for InMemorySessionRegistry {
    async fn connect_kiosk(&self, event_id: EventId, handle: ConnectionHandle) {
        let mut sessions = self.sessions.lock().await;
        if let Some(previous) = sessions.kiosks.insert(event_id.clone(), handle) {
            previous.close();
            tracing::info!("Kiosk for event '{}' superseded; closed previous connection", event_id);
        }
        tracing::info!("Kiosk connected for event '{}'", event_id);
    }

    async fn connect_mobile(&self, client_id: ClientId, event_id: EventId, handle: ConnectionHandle) {
        let mut sessions = self.sessions.lock().await;

        // Same client reconnecting: drop the stale connection silently.
        if let Some(previous) = sessions.mobiles.remove(&client_id) {
            previous.handle.close();
            tracing::info!("Client '{}' reconnected; closed previous connection", client_id);
        }

        // One phone per event: evict everyone else bound to it.
        let evicted: Vec<ClientId> = sessions
            .mobiles
            .iter()
            .filter(|(_, session)| session.event_id == event_id)
            .map(|(id, _)| id.clone())
            .collect();
        for other in evicted {
            tracing::info!(
                "Evicting client '{}' from event '{}' in favour of '{}'",
                other,
                event_id,
                client_id
            );
            sessions.remove_mobile(&other);
        }

        sessions.mobiles.insert(
            client_id.clone(),
            MobileSession {
                event_id: event_id.clone(),
                handle,
            },
        );
        tracing::info!("Client '{}' connected for event '{}'", client_id, event_id);

        sessions.push_to_kiosk(&event_id, &KioskMessage::ClientConnected { client_id });
    }

    async fn disconnect_kiosk(&self, event_id: &EventId) {
        self.sessions.lock().await.remove_kiosk(event_id);
    }

    async fn disconnect_mobile(&self, client_id: &ClientId) {
        self.sessions.lock().await.remove_mobile(client_id);
    }

    async fn release_kiosk(&self, event_id: &EventId, connection_id: ConnectionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        let is_current = sessions
            .kiosks
            .get(event_id)
            .is_some_and(|handle| handle.id() == connection_id);
        is_current && sessions.remove_kiosk(event_id)
    }

    async fn release_mobile(&self, client_id: &ClientId, connection_id: ConnectionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        let is_current = sessions
            .mobiles
            .get(client_id)
            .is_some_and(|session| session.handle.id() == connection_id);
        is_current && sessions.remove_mobile(client_id)
    }

    async fn send_to_kiosk(&self, event_id: &EventId, message: KioskMessage) -> Delivery {
        self.sessions.lock().await.push_to_kiosk(event_id, &message)
    }

    async fn send_to_mobile(&self, client_id: &ClientId, message: MobileMessage) -> Delivery {
        self.sessions.lock().await.push_to_mobile(client_id, &message)
    }

    async fn snapshot(&self) -> SessionSnapshot {
        let sessions = self.sessions.lock().await;
        let mut kiosks: Vec<EventId> = sessions.kiosks.keys().cloned().collect();
        kiosks.sort();
        let mut mobiles: Vec<(ClientId, EventId)> = sessions
            .mobiles
            .iter()
            .map(|(client_id, session)| (client_id.clone(), session.event_id.clone()))
            .collect();
        mobiles.sort();
        SessionSnapshot { kiosks, mobiles }
    }
}
