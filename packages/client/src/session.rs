//! WebSocket client session management.

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use kioskbridge_server::domain::{KioskInbound, KioskMessage, MobileInbound, MobileMessage};
use kioskbridge_shared::time::now_millis;
use serde::Serialize;
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::{
    domain::{MobileProgress, Role, connection_url},
    error::ClientError,
    formatter::MessageFormatter,
    input::{KIOSK_USAGE, MOBILE_USAGE, parse_kiosk_input, parse_mobile_input},
    ui::redisplay_prompt,
};

const CLOSE_GRACE: Duration = Duration::from_secs(1);

/// Who to connect as, and where
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Server base URL, e.g. `ws://127.0.0.1:8080`
    pub url: String,
    pub role: Role,
    pub event_id: String,
    pub client_id: Option<String>,
}

impl SessionOptions {
    pub fn prompt(&self) -> String {
        match (&self.role, &self.client_id) {
            (Role::Mobile, Some(client_id)) => format!("{}@{}> ", client_id, self.event_id),
            _ => format!("{}@{}> ", self.role, self.event_id),
        }
    }
}

fn encode<T: Serialize>(message: &T) -> Option<String> {
    match serde_json::to_string(message) {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::error!("Failed to serialize message: {}", e);
            None
        }
    }
}

/// Print an inbound text frame, answer pings, and update the phone's progress
async fn handle_text(
    role: Role,
    text: &str,
    out_tx: &mpsc::UnboundedSender<String>,
    progress: &Mutex<MobileProgress>,
    prompt: &str,
) {
    let received_at = now_millis();
    match role {
        Role::Kiosk => match serde_json::from_str::<KioskMessage>(text) {
            Ok(KioskMessage::Ping) => {
                if let Some(pong) = encode(&KioskInbound::Pong) {
                    let _ = out_tx.send(pong);
                }
                return;
            }
            Ok(message) => print!(
                "{}",
                MessageFormatter::format_kiosk_message(&message, received_at)
            ),
            Err(_) => print!("{}", MessageFormatter::format_raw_message(text)),
        },
        Role::Mobile => match serde_json::from_str::<MobileMessage>(text) {
            Ok(MobileMessage::Ping) => {
                if let Some(pong) = encode(&MobileInbound::Pong) {
                    let _ = out_tx.send(pong);
                }
                return;
            }
            Ok(message) => {
                progress.lock().await.record_received(&message);
                print!(
                    "{}",
                    MessageFormatter::format_mobile_message(&message, received_at)
                );
            }
            Err(_) => print!("{}", MessageFormatter::format_raw_message(text)),
        },
    }
    redisplay_prompt(prompt);
}

/// Turn one typed line into an outbound frame, or print why it can't be
async fn encode_input(role: Role, line: &str, progress: &Mutex<MobileProgress>) -> Option<String> {
    let result = match role {
        Role::Kiosk => parse_kiosk_input(line).map(|message| encode(&message)),
        Role::Mobile => match parse_mobile_input(line) {
            Ok(message) => {
                let json = encode(&message);
                if json.is_some() {
                    progress.lock().await.record_sent(&message);
                }
                Ok(json)
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(json) => json,
        Err(e) => {
            println!("{}", e);
            None
        }
    }
}

/// Run one WebSocket client session.
///
/// Returns `Ok(())` when the user ends input, and an error when the
/// connection could not be made or was lost.
pub async fn run_client_session(
    options: &SessionOptions,
    progress: &Arc<Mutex<MobileProgress>>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let url = connection_url(
        &options.url,
        options.role,
        &options.event_id,
        options.client_id.as_deref(),
    )?;

    let (ws_stream, _response) = match connect_async(&url).await {
        Ok(result) => result,
        Err(WsError::Http(response)) => {
            return Err(ClientError::Rejected(response.status().as_u16()));
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to {} as {}", url, options.role);
    let prompt = options.prompt();
    match options.role {
        Role::Kiosk => println!(
            "\nYou are the kiosk of '{}'. Type `{}` and press Enter. Press Ctrl+C to exit.\n",
            options.event_id, KIOSK_USAGE
        ),
        Role::Mobile => println!(
            "\nYou are a phone at '{}'. Type `{}` and press Enter. Press Ctrl+C to exit.\n",
            options.event_id, MOBILE_USAGE
        ),
    }

    let (mut write, mut read) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a task to drain outbound frames into the WebSocket
    let mut write_task = tokio::spawn(async move {
        let mut write_error = false;
        while let Some(json) = out_rx.recv().await {
            if let Err(e) = write.send(Message::Text(json.into())).await {
                tracing::warn!("Failed to send message: {}", e);
                write_error = true;
                break;
            }
        }
        if !write_error {
            let _ = write.send(Message::Close(None)).await;
        }
        write_error
    });

    // Spawn a task to handle incoming messages
    let role = options.role;
    let read_tx = out_tx.clone();
    let read_progress = progress.clone();
    let read_prompt = prompt.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    handle_text(role, &text, &read_tx, &read_progress, &read_prompt).await;
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&read_prompt);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    if role == Role::Mobile {
        let announcement = progress.lock().await.reconnect_message();
        if let Some(json) = announcement.as_ref().and_then(encode) {
            tracing::info!("Announcing previous selection after reconnect");
            let _ = out_tx.send(json);
        }
    }

    loop {
        tokio::select! {
            _ = &mut read_task => {
                write_task.abort();
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }
            write_result = &mut write_task => {
                read_task.abort();
                if write_result.unwrap_or(true) {
                    return Err(ClientError::ConnectionError("Connection lost".to_string()));
                }
                return Ok(());
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // The user is done: stop reading, then let the writer send a close frame
                    read_task.abort();
                    let _ = (&mut read_task).await;
                    drop(out_tx);
                    let _ = tokio::time::timeout(CLOSE_GRACE, &mut write_task).await;
                    return Ok(());
                };
                if let Some(json) = encode_input(role, &line, progress).await {
                    if out_tx.send(json).is_err() {
                        read_task.abort();
                        return Err(ClientError::ConnectionError("Connection lost".to_string()));
                    }
                    print!("{}", MessageFormatter::format_sent_confirmation(now_millis()));
                }
                redisplay_prompt(&prompt);
            }
        }
    }
}
