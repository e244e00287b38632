//! Download controller: single-flight state machine in front of the request client.
//!
//! State lives in a `watch` cell. Every transition is one `send_if_modified`
//! closure, which runs under the cell's write lock, so admitting a trigger is
//! an atomic check-and-set: a second trigger while one is in flight is
//! rejected as busy and cannot reorder the live request's updates.

use tokio::sync::watch;

use crate::client::{Delivered, RequestClient};
use crate::media::{MediaType, Platform};
use crate::request::DownloadRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    InFlight,
    Errored,
}

/// Observable controller state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerState {
    pub phase: Phase,
    pub error_message: Option<String>,
}

impl ControllerState {
    fn in_flight() -> Self {
        Self {
            phase: Phase::InFlight,
            error_message: None,
        }
    }

    fn errored(message: String) -> Self {
        Self {
            phase: Phase::Errored,
            error_message: Some(message),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == Phase::InFlight
    }
}

/// What a single `trigger` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// The artifact was fetched and saved; state is back to idle.
    Saved(Delivered),
    /// The request failed; state is errored with this message.
    Failed(String),
    /// Another download was in flight; nothing changed.
    Busy,
}

enum Admission {
    Busy,
    Rejected(String),
    Accepted(DownloadRequest),
}

pub struct DownloadController {
    client: RequestClient,
    state: watch::Sender<ControllerState>,
}

impl DownloadController {
    pub fn new(client: RequestClient) -> Self {
        let (state, _) = watch::channel(ControllerState::default());
        Self { client, state }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ControllerState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<ControllerState> {
        self.state.subscribe()
    }

    /// Validates and runs one download. Failures end up in the state, never as a panic or `Err`.
    pub async fn trigger(&self, url: &str, platform: Platform, media_type: MediaType) -> TriggerOutcome {
        let mut admission = Admission::Busy;
        self.state.send_if_modified(|s| {
            if s.is_in_flight() {
                return false;
            }
            match DownloadRequest::new(url, platform, media_type) {
                Ok(request) => {
                    *s = ControllerState::in_flight();
                    admission = Admission::Accepted(request);
                }
                Err(e) => {
                    let message = e.to_string();
                    *s = ControllerState::errored(message.clone());
                    admission = Admission::Rejected(message);
                }
            }
            true
        });

        let request = match admission {
            Admission::Busy => {
                tracing::warn!("download already in flight; trigger for {} ignored", url.trim());
                return TriggerOutcome::Busy;
            }
            Admission::Rejected(message) => {
                tracing::debug!("trigger rejected: {}", message);
                return TriggerOutcome::Failed(message);
            }
            Admission::Accepted(request) => request,
        };

        let flight = FlightGuard {
            state: &self.state,
            armed: true,
        };
        match self.client.send(&request).await {
            Ok(delivered) => {
                flight.land(ControllerState::default());
                TriggerOutcome::Saved(delivered)
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(
                    platform = %request.platform(),
                    media_type = %request.media_type(),
                    "download of {} failed: {:?}",
                    request.url(),
                    e
                );
                flight.land(ControllerState::errored(message.clone()));
                TriggerOutcome::Failed(message)
            }
        }
    }

    /// Drops a stale error message. Leaves an in-flight phase alone.
    pub fn clear_error(&self) {
        self.state.send_if_modified(|s| {
            let changed = s.error_message.is_some() || s.phase == Phase::Errored;
            s.error_message = None;
            if s.phase == Phase::Errored {
                s.phase = Phase::Idle;
            }
            changed
        });
    }
}

/// Returns the controller to idle if a trigger future is dropped mid-flight.
struct FlightGuard<'a> {
    state: &'a watch::Sender<ControllerState>,
    armed: bool,
}

impl FlightGuard<'_> {
    fn land(mut self, next: ControllerState) {
        self.armed = false;
        self.state.send_replace(next);
    }
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("in-flight download abandoned; controller reset to idle");
            self.state.send_replace(ControllerState::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::SaveTarget;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct CountingTarget {
        saves: AtomicUsize,
    }

    impl SaveTarget for CountingTarget {
        fn save(&self, filename: &str, _fallback: &str, _payload: &[u8]) -> std::io::Result<PathBuf> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(PathBuf::from(filename))
        }
    }

    /// Backend URL with nothing listening: any request that escapes validation fails fast.
    fn dead_backend() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("http://127.0.0.1:{}", port)
    }

    fn controller(target: Arc<CountingTarget>) -> DownloadController {
        DownloadController::new(RequestClient::new(&dead_backend(), target))
    }

    #[test]
    fn starts_idle() {
        let c = controller(Arc::default());
        assert_eq!(c.state(), ControllerState::default());
    }

    #[tokio::test]
    async fn blank_url_errors_without_dispatch() {
        let target = Arc::new(CountingTarget::default());
        let c = controller(Arc::clone(&target));
        let outcome = c.trigger("   ", Platform::Youtube, MediaType::Video).await;
        assert_eq!(outcome, TriggerOutcome::Failed("Please enter a URL".into()));
        let s = c.state();
        assert_eq!(s.phase, Phase::Errored);
        assert_eq!(s.error_message.as_deref(), Some("Please enter a URL"));
        assert_eq!(target.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn transport_failure_is_captured() {
        let target = Arc::new(CountingTarget::default());
        let c = controller(Arc::clone(&target));
        let outcome = c
            .trigger("https://youtu.be/abc", Platform::Youtube, MediaType::Audio)
            .await;
        let s = c.state();
        assert_eq!(s.phase, Phase::Errored);
        let message = s.error_message.expect("message");
        assert!(message.starts_with("network error"), "got {message}");
        assert_eq!(outcome, TriggerOutcome::Failed(message));
        assert_eq!(target.saves.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_error_on_idle_is_a_noop() {
        let c = controller(Arc::default());
        let mut rx = c.subscribe();
        c.clear_error();
        c.clear_error();
        assert_eq!(c.state(), ControllerState::default());
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn clear_error_returns_to_idle() {
        let c = controller(Arc::default());
        c.trigger("", Platform::Tiktok, MediaType::Audio).await;
        assert_eq!(c.state().phase, Phase::Errored);
        c.clear_error();
        assert_eq!(c.state(), ControllerState::default());
    }

    #[test]
    fn clear_error_in_flight_keeps_phase() {
        let c = controller(Arc::default());
        c.state.send_replace(ControllerState {
            phase: Phase::InFlight,
            error_message: Some("stale".into()),
        });
        c.clear_error();
        assert_eq!(c.state(), ControllerState::in_flight());
    }

    #[tokio::test]
    async fn trigger_while_in_flight_is_busy() {
        let c = controller(Arc::default());
        c.state.send_replace(ControllerState::in_flight());
        let outcome = c.trigger("", Platform::Youtube, MediaType::Audio).await;
        assert_eq!(outcome, TriggerOutcome::Busy);
        assert_eq!(c.state(), ControllerState::in_flight());
    }

    #[tokio::test]
    async fn new_trigger_clears_previous_error() {
        let c = controller(Arc::default());
        c.trigger(" ", Platform::Youtube, MediaType::Audio).await;
        let mut rx = c.subscribe();
        c.trigger("https://youtu.be/abc", Platform::Youtube, MediaType::Audio)
            .await;
        // The in-flight step replaced the validation message before the network error landed.
        assert!(rx.has_changed().unwrap());
        let message = rx.borrow_and_update().error_message.clone().unwrap();
        assert_ne!(message, "Please enter a URL");
    }
}
