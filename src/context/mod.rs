// Shared shell state: the page-loading flag, screen-reader announcements,
// the document title, and the single transient notification.
//
// One writer role (this coordinator), many readers. Every mutation is
// published on a broadcast stream so shells and tests observe each change
// as a distinct event.

pub mod focus;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tokio::time::Duration;

/// Title shown when a page supplies none.
pub const DEFAULT_PAGE_TITLE: &str = "Welcome";

const APP_NAME: &str = "Scribe";

/// Focus target for the page heading, polled after a page announces ready.
pub const HEADING_FOCUS_TARGET: &str = "page-title";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Info => "blue",
            Severity::Success => "green",
            Severity::Warning => "amber",
            Severity::Error => "red",
        }
    }

    /// How long the notification stays up before auto-dismissal.
    pub fn timeout_ms(&self) -> u64 {
        match self {
            Severity::Success => 5_000,
            Severity::Info | Severity::Warning => 8_000,
            Severity::Error => 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub severity: Severity,
    pub timeout_ms: u64,
    id: u64,
}

#[derive(Debug, Clone)]
pub struct ContextState {
    pub loading: bool,
    pub screen_reader_alert: Option<String>,
    pub notification: Option<Notification>,
    pub document_title: String,
}

impl Default for ContextState {
    fn default() -> Self {
        Self {
            loading: false,
            screen_reader_alert: None,
            notification: None,
            document_title: format!("{DEFAULT_PAGE_TITLE} | {APP_NAME}"),
        }
    }
}

/// One observable state change.
#[derive(Debug, Clone)]
pub enum ContextEvent {
    Loading(bool),
    Alert(Option<String>),
    Notification(Option<Notification>),
    Title(String),
    FocusRequested(String),
}

pub struct AppContext {
    state: RwLock<ContextState>,
    events: broadcast::Sender<ContextEvent>,
    notification_seq: AtomicU64,
}

static CONTEXT: Lazy<Arc<AppContext>> = Lazy::new(AppContext::new);

impl AppContext {
    pub fn new() -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            state: RwLock::new(ContextState::default()),
            events,
            notification_seq: AtomicU64::new(0),
        })
    }

    /// The shared process-wide context. Tests construct their own instances.
    pub fn global() -> Arc<AppContext> {
        CONTEXT.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ContextEvent> {
        self.events.subscribe()
    }

    pub fn snapshot(&self) -> ContextState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Mark a page transition in flight. Safe to call repeatedly.
    pub fn loading_start(&self) {
        let changed = {
            let mut state = self.write_state();
            let changed = !state.loading;
            state.loading = true;
            changed
        };
        if changed {
            self.emit(ContextEvent::Loading(true));
        }
    }

    /// Mark the current page ready.
    ///
    /// Clears the loading flag and stamps the document title. When a title
    /// is supplied the page is also announced to screen readers and heading
    /// focus is requested. Overlapping transitions are resolved last-writer-
    /// wins on the shared flag; a stale complete is tolerated, not rejected.
    pub async fn loading_complete(&self, page_title: Option<&str>) {
        {
            let state = self.read_state();
            if !state.loading && page_title.is_none() {
                // Nothing in flight and nothing to announce
                return;
            }
        }

        let title = page_title.unwrap_or(DEFAULT_PAGE_TITLE);
        {
            let mut state = self.write_state();
            if state.loading {
                state.loading = false;
            }
            state.document_title = format!("{title} | {APP_NAME}");
        }
        self.emit(ContextEvent::Loading(false));
        self.emit(ContextEvent::Title(format!("{title} | {APP_NAME}")));

        if let Some(title) = page_title {
            self.set_screen_reader_alert(&format!("{title} page is ready"))
                .await;
            self.emit(ContextEvent::FocusRequested(
                HEADING_FOCUS_TARGET.to_string(),
            ));
        }
    }

    /// Stamp the document title without touching the loading flag.
    pub fn set_document_title(&self, page_title: &str) {
        let full = format!("{page_title} | {APP_NAME}");
        {
            let mut state = self.write_state();
            state.document_title = full.clone();
        }
        self.emit(ContextEvent::Title(full));
    }

    /// Announce text to screen readers.
    ///
    /// Assistive tech only speaks on value change, so the alert is first
    /// cleared and the real text lands on the next scheduling tick. Two
    /// identical announcements in a row therefore still produce two change
    /// events.
    pub async fn set_screen_reader_alert(&self, text: &str) {
        {
            let mut state = self.write_state();
            state.screen_reader_alert = Some(String::new());
        }
        self.emit(ContextEvent::Alert(Some(String::new())));

        tokio::task::yield_now().await;

        {
            let mut state = self.write_state();
            state.screen_reader_alert = Some(text.to_string());
        }
        self.emit(ContextEvent::Alert(Some(text.to_string())));
    }

    /// Show the transient notification, replacing any current one and
    /// restarting its auto-dismiss clock.
    pub fn notify(self: &Arc<Self>, text: &str, severity: Severity) {
        let id = self.notification_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let notification = Notification {
            text: text.to_string(),
            severity,
            timeout_ms: severity.timeout_ms(),
            id,
        };
        {
            let mut state = self.write_state();
            state.notification = Some(notification.clone());
        }
        self.emit(ContextEvent::Notification(Some(notification.clone())));

        let context = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(notification.timeout_ms)).await;
            context.dismiss_if_current(notification.id).await;
        });
    }

    /// Dismiss the current notification and confirm it to screen readers.
    pub async fn dismiss(&self) {
        let dismissed = {
            let mut state = self.write_state();
            state.notification.take().is_some()
        };
        if dismissed {
            self.emit(ContextEvent::Notification(None));
            self.set_screen_reader_alert("Notification dismissed").await;
        }
    }

    /// Auto-dismiss path: a timer from a superseded notification is a no-op.
    async fn dismiss_if_current(&self, id: u64) {
        let current = {
            let state = self.read_state();
            state.notification.as_ref().map(|n| n.id)
        };
        if current == Some(id) {
            self.dismiss().await;
        }
    }

    fn emit(&self, event: ContextEvent) {
        // No receivers is fine; state remains authoritative
        let _ = self.events.send(event);
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, ContextState> {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, ContextState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn settle() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    fn drain_alerts(rx: &mut broadcast::Receiver<ContextEvent>) -> Vec<Option<String>> {
        let mut alerts = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let ContextEvent::Alert(text) = event {
                alerts.push(text);
            }
        }
        alerts
    }

    #[tokio::test]
    async fn loading_start_is_idempotent() {
        let context = AppContext::new();
        let mut rx = context.subscribe();

        context.loading_start();
        context.loading_start();
        context.loading_start();

        assert!(context.snapshot().loading);

        let mut loading_events = 0;
        while let Ok(event) = rx.try_recv() {
            if matches!(event, ContextEvent::Loading(_)) {
                loading_events += 1;
            }
        }
        assert_eq!(loading_events, 1);
    }

    #[tokio::test]
    async fn overlapping_completes_are_last_writer_wins() {
        let context = AppContext::new();
        context.loading_start();

        context.loading_complete(Some("Rooms")).await;
        context.loading_complete(Some("Course Changes")).await;

        let state = context.snapshot();
        assert!(!state.loading);
        assert_eq!(state.document_title, "Course Changes | Scribe");
    }

    #[tokio::test]
    async fn complete_without_title_when_idle_is_noop() {
        let context = AppContext::new();
        let before = context.snapshot();

        context.loading_complete(None).await;

        let after = context.snapshot();
        assert!(!after.loading);
        assert_eq!(after.document_title, before.document_title);
        assert_eq!(after.screen_reader_alert, before.screen_reader_alert);
    }

    #[tokio::test]
    async fn complete_with_title_announces_and_requests_focus() {
        let context = AppContext::new();
        let mut rx = context.subscribe();
        context.loading_start();

        context.loading_complete(Some("Rooms")).await;

        let state = context.snapshot();
        assert_eq!(state.screen_reader_alert.as_deref(), Some("Rooms page is ready"));

        let mut focus_requested = false;
        while let Ok(event) = rx.try_recv() {
            if let ContextEvent::FocusRequested(target) = event {
                assert_eq!(target, HEADING_FOCUS_TARGET);
                focus_requested = true;
            }
        }
        assert!(focus_requested);
    }

    #[tokio::test]
    async fn repeated_alert_produces_two_change_events_each_time() {
        let context = AppContext::new();
        let mut rx = context.subscribe();

        context.set_screen_reader_alert("Ready").await;
        context.set_screen_reader_alert("Ready").await;

        let alerts = drain_alerts(&mut rx);
        // clear + set, twice
        assert_eq!(
            alerts,
            vec![
                Some(String::new()),
                Some("Ready".to_string()),
                Some(String::new()),
                Some("Ready".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn notify_replaces_and_dismiss_confirms() {
        let context = AppContext::new();

        context.notify("Emails queued", Severity::Success);
        context.notify("Job failed", Severity::Error);

        let state = context.snapshot();
        let notification = state.notification.expect("notification visible");
        assert_eq!(notification.text, "Job failed");
        assert_eq!(notification.severity.color(), "red");

        context.dismiss().await;
        let state = context.snapshot();
        assert!(state.notification.is_none());
        assert_eq!(
            state.screen_reader_alert.as_deref(),
            Some("Notification dismissed")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stale_auto_dismiss_is_noop_against_newer_notification() {
        let context = AppContext::new();

        context.notify("first", Severity::Success);
        // Replace before the first timer fires
        tokio::time::advance(Duration::from_millis(1_000)).await;
        context.notify("second", Severity::Error);

        // Let the first notification's timer fire; it must not clear "second"
        tokio::time::advance(Duration::from_millis(4_500)).await;
        settle().await;
        let state = context.snapshot();
        assert_eq!(state.notification.as_ref().map(|n| n.text.as_str()), Some("second"));

        // The second's own timer eventually clears it
        tokio::time::advance(Duration::from_millis(10_000)).await;
        settle().await;
        assert!(context.snapshot().notification.is_none());
    }
}
