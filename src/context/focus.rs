// Best-effort keyboard focus after async render.
//
// The poller is deliberately separate from the loading state machine: a
// target that never appears costs nothing but the bounded retries.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};

use super::{AppContext, ContextEvent};
use crate::config;

/// Shell-side lookup for focusable targets.
///
/// Returns true when the target existed and focus was moved.
pub trait FocusSurface: Send + Sync {
    fn try_focus(&self, target: &str) -> bool;
}

/// Poll for `target` with explicit bounds. Gives up silently.
pub async fn put_focus_with(
    surface: &dyn FocusSurface,
    target: &str,
    max_attempts: u32,
    interval: Duration,
) -> bool {
    for attempt in 0..max_attempts {
        if surface.try_focus(target) {
            return true;
        }
        if attempt + 1 < max_attempts {
            sleep(interval).await;
        }
    }
    tracing::debug!("focus target '{target}' never appeared, giving up");
    false
}

/// Poll for `target` using the configured attempt cap and interval.
pub async fn put_focus_when_ready(surface: &dyn FocusSurface, target: &str) -> bool {
    let focus = &config::config().focus;
    put_focus_with(
        surface,
        target,
        focus.max_attempts,
        Duration::from_millis(focus.interval_ms),
    )
    .await
}

/// Bridge coordinator focus requests onto a shell surface.
///
/// Each `FocusRequested` event starts one bounded polling attempt; failures
/// never feed back into navigation or loading state.
pub fn spawn_focus_driver(
    context: Arc<AppContext>,
    surface: Arc<dyn FocusSurface>,
) -> JoinHandle<()> {
    let mut events = context.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ContextEvent::FocusRequested(target)) => {
                    put_focus_when_ready(surface.as_ref(), &target).await;
                }
                Ok(_) => {}
                Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingSurface {
        attempts: AtomicU32,
        appears_after: u32,
    }

    impl FocusSurface for CountingSurface {
        fn try_focus(&self, _target: &str) -> bool {
            let seen = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            seen > self.appears_after
        }
    }

    #[tokio::test]
    async fn gives_up_after_bounded_attempts() {
        let surface = CountingSurface {
            attempts: AtomicU32::new(0),
            appears_after: u32::MAX,
        };

        let focused = put_focus_with(&surface, "page-title", 4, Duration::from_millis(1)).await;

        assert!(!focused);
        assert_eq!(surface.attempts.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn stops_polling_once_target_appears() {
        let surface = CountingSurface {
            attempts: AtomicU32::new(0),
            appears_after: 2,
        };

        let focused = put_focus_with(&surface, "page-title", 4, Duration::from_millis(1)).await;

        assert!(focused);
        assert_eq!(surface.attempts.load(Ordering::SeqCst), 3);
    }
}
