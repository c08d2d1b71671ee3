// Scanner capabilities
//
// The session state machine never talks to real camera hardware. It consumes
// two narrow capabilities:
//   - a one-shot permission request (granted/denied)
//   - an async stream of decode events, each carrying a payload string
//
// Anything satisfying these contracts is interchangeable. The terminal build
// ships a config-driven permission stub plus two feeds: a scripted demo feed
// and a file feed that tails payloads written by an external scanner.

pub mod feed;

pub use feed::{FileSource, ScriptedSource};

use crate::events::AppEvent;
use chrono::Utc;
use futures::future::BoxFuture;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Result of the camera permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }
}

/// One async permission request, made once at startup before the session
/// can reach its scanning state.
pub trait CameraPermission: Send + Sync {
    fn request(&self) -> BoxFuture<'static, PermissionStatus>;
}

/// Permission stub driven by config: a fixed decision, optionally delayed
/// to mimic the platform permission dialog.
pub struct ConfiguredPermission {
    decision: PermissionStatus,
    prompt_delay: Duration,
}

impl ConfiguredPermission {
    pub fn new(decision: PermissionStatus, prompt_delay: Duration) -> Self {
        Self {
            decision,
            prompt_delay,
        }
    }
}

impl CameraPermission for ConfiguredPermission {
    fn request(&self) -> BoxFuture<'static, PermissionStatus> {
        let decision = self.decision;
        let delay = self.prompt_delay;
        Box::pin(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            decision
        })
    }
}

/// A pull stream of decoded payloads. `None` means the feed is exhausted.
pub trait DecodeSource: Send {
    fn next_decode(&mut self) -> BoxFuture<'_, Option<String>>;
}

/// Request permission in the background and report the result into the
/// app event channel.
pub fn spawn_permission_request(
    permission: &dyn CameraPermission,
    tx: mpsc::Sender<AppEvent>,
) -> tokio::task::JoinHandle<()> {
    let request = permission.request();
    tokio::spawn(async move {
        let status = request.await;
        let _ = tx.send(AppEvent::Permission(status)).await;
    })
}

/// Drive a decode source, forwarding payloads into the app event channel
/// until the feed ends or shutdown is signaled.
pub async fn run_feed(
    mut source: Box<dyn DecodeSource>,
    tx: mpsc::Sender<AppEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown_rx => {
                tracing::debug!("decode feed shutting down");
                return;
            }
            decoded = source.next_decode() => {
                let Some(payload) = decoded else {
                    tracing::debug!("decode feed exhausted");
                    return;
                };
                let event = AppEvent::Decode {
                    timestamp: Utc::now(),
                    payload,
                };
                if tx.send(event).await.is_err() {
                    // TUI is gone
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn configured_permission_resolves_after_delay() {
        let permission =
            ConfiguredPermission::new(PermissionStatus::Denied, Duration::from_millis(300));
        let status = permission.request().await;
        assert_eq!(status, PermissionStatus::Denied);
    }

    #[tokio::test(start_paused = true)]
    async fn feed_forwards_payloads_then_ends() {
        let source = ScriptedSource::once(
            vec!["upi://pay?pa=a@bank".into(), "code-2".into()],
            Duration::from_millis(10),
        );
        let (tx, mut rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = oneshot::channel();

        run_feed(Box::new(source), tx, shutdown_rx).await;

        match rx.recv().await {
            Some(AppEvent::Decode { payload, .. }) => assert_eq!(payload, "upi://pay?pa=a@bank"),
            other => panic!("expected decode, got {:?}", other),
        }
        match rx.recv().await {
            Some(AppEvent::Decode { payload, .. }) => assert_eq!(payload, "code-2"),
            other => panic!("expected decode, got {:?}", other),
        }
        assert!(rx.recv().await.is_none());
    }
}
