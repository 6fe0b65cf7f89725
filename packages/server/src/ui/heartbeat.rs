//! Per-connection keepalive and the idle-tolerant receive.
//!
//! Each accepted connection gets one heartbeat task pushing `ping` through the
//! connection's own handle, so heartbeats and relayed messages share a single
//! outbound loop. The task is aborted during teardown before the registry
//! entry is released.

use std::{fmt, time::Duration};

use axum::extract::ws::Message;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{
    config::HeartbeatConfig,
    domain::{ConnectionHandle, KioskMessage, MobileMessage, PushError},
};

/// Which side of a pairing a connection belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    Kiosk,
    Mobile,
}

impl PeerRole {
    pub fn ping_interval(self, config: &HeartbeatConfig) -> Duration {
        match self {
            PeerRole::Kiosk => config.kiosk_ping_interval,
            PeerRole::Mobile => config.mobile_ping_interval,
        }
    }

    fn ping(self, handle: &ConnectionHandle) -> Result<(), PushError> {
        match self {
            PeerRole::Kiosk => handle.push(&KioskMessage::Ping),
            PeerRole::Mobile => handle.push(&MobileMessage::Ping),
        }
    }
}

impl fmt::Display for PeerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeerRole::Kiosk => write!(f, "kiosk"),
            PeerRole::Mobile => write!(f, "mobile"),
        }
    }
}

/// Spawn the keepalive task for one connection.
///
/// The first ping goes out one `period` after the call. The task stops by
/// itself once the connection's outbound loop is gone.
pub fn spawn_heartbeat(
    role: PeerRole,
    handle: ConnectionHandle,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(e) = role.ping(&handle) {
                tracing::debug!("Stopping {} heartbeat: {}", role, e);
                break;
            }
        }
    })
}

/// Wait for the next inbound frame.
///
/// Hitting `idle_timeout` is not an error: the wait simply starts over.
/// Returns `None` once the stream has ended.
pub async fn next_frame<S, E>(receiver: &mut S, idle_timeout: Duration) -> Option<Result<Message, E>>
where
    S: Stream<Item = Result<Message, E>> + Unpin,
{
    loop {
        match tokio::time::timeout(idle_timeout, receiver.next()).await {
            Ok(frame) => return frame,
            Err(_) => tracing::trace!("No inbound frame for {:?}; still waiting", idle_timeout),
        }
    }
}

#[derive(Deserialize)]
struct FrameType {
    #[serde(rename = "type")]
    kind: Option<String>,
}

/// Whether a text frame is `ping`/`pong` traffic that must not be routed
pub fn is_liveness_frame(text: &str) -> bool {
    serde_json::from_str::<FrameType>(text)
        .ok()
        .and_then(|frame| frame.kind)
        .is_some_and(|kind| kind == "ping" || kind == "pong")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PushFrame;
    use tokio::sync::mpsc;

    #[test]
    fn test_liveness_frames_are_recognized() {
        // テスト項目: ping / pong だけが生存確認フレームとして判定される
        // given (前提条件):
        let frames = [
            (r#"{"type":"pong"}"#, true),
            (r#"{"type":"ping"}"#, true),
            (r#"{"type":"image_selected","image_id":"1"}"#, false),
            (r#"{"image_id":"1"}"#, false),
            ("pong", false),
        ];

        for (text, expected) in frames {
            // when (操作):
            let result = is_liveness_frame(text);

            // then (期待する結果):
            assert_eq!(result, expected, "frame: {}", text);
        }
    }

    #[test]
    fn test_ping_interval_per_role() {
        // テスト項目: ロールごとの ping 間隔
        // given (前提条件):
        let config = HeartbeatConfig::default();

        // when (操作):
        let kiosk = PeerRole::Kiosk.ping_interval(&config);
        let mobile = PeerRole::Mobile.ping_interval(&config);

        // then (期待する結果):
        assert_eq!(kiosk, Duration::from_secs(5));
        assert_eq!(mobile, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_heartbeat_pushes_pings_until_aborted() {
        // テスト項目: ハートビートが周期的に ping を送り、abort 後は止まる
        // given (前提条件):
        let (tx, mut rx) = mpsc::unbounded_channel();
        let heartbeat = spawn_heartbeat(
            PeerRole::Kiosk,
            ConnectionHandle::new(tx),
            Duration::from_millis(20),
        );

        // when (操作):
        tokio::time::sleep(Duration::from_millis(110)).await;
        heartbeat.abort();
        let _ = heartbeat.await;

        // then (期待する結果):
        let mut pings = 0;
        while let Ok(frame) = rx.try_recv() {
            assert_eq!(frame, PushFrame::Text(r#"{"type":"ping"}"#.to_string()));
            pings += 1;
        }
        assert!(pings >= 2, "expected at least two pings, got {}", pings);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_heartbeat_stops_when_connection_is_gone() {
        // テスト項目: 送信ループが終了していればハートビートタスクも終了する
        // given (前提条件):
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);

        // when (操作):
        let heartbeat = spawn_heartbeat(
            PeerRole::Mobile,
            ConnectionHandle::new(tx),
            Duration::from_millis(10),
        );
        let finished = tokio::time::timeout(Duration::from_secs(1), heartbeat).await;

        // then (期待する結果):
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn test_idle_timeout_keeps_waiting() {
        // テスト項目: アイドルタイムアウトを超えても受信待ちは継続し、後続フレームを受け取る
        // given (前提条件):
        let mut stream = Box::pin(futures_util::stream::once(async {
            tokio::time::sleep(Duration::from_millis(60)).await;
            Ok::<_, std::io::Error>(Message::Text("late".into()))
        }));

        // when (操作):
        let frame = next_frame(&mut stream, Duration::from_millis(10)).await;

        // then (期待する結果):
        match frame {
            Some(Ok(Message::Text(text))) => assert_eq!(text.as_str(), "late"),
            other => panic!("unexpected frame: {:?}", other),
        }
        assert!(next_frame(&mut stream, Duration::from_millis(10)).await.is_none());
    }
}
