//! Timed dismissal of workflow notifications.

use draftloop_core::notification::NotificationId;
use draftloop_core::workflow::WorkflowState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;

/// The dismissal currently waiting for its delay to elapse.
struct PendingDismissal {
    id: NotificationId,
    token: CancellationToken,
}

/// Schedules the dismissal of the most recent notification.
///
/// At most one dismissal is pending. Scheduling a newer notification cancels
/// the previous task, so the delay restarts with every notification instead
/// of stacking. Requests may arrive out of order when round-trips complete
/// concurrently; a request for an id older than the pending one is dropped.
pub struct NotificationScheduler {
    state: Arc<RwLock<WorkflowState>>,
    delay: Duration,
    pending: Mutex<Option<PendingDismissal>>,
}

impl NotificationScheduler {
    pub fn new(state: Arc<RwLock<WorkflowState>>, delay: Duration) -> Self {
        Self {
            state,
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Dismisses notification `id` after the delay unless superseded first.
    ///
    /// Must be called from within a Tokio runtime.
    pub async fn schedule(&self, id: NotificationId) {
        let token = CancellationToken::new();
        {
            let mut pending = self.pending.lock().await;
            if let Some(previous) = pending.as_ref() {
                if previous.id > id {
                    tracing::trace!(id = id.0, newer = previous.id.0, "Stale dismissal ignored");
                    return;
                }
                previous.token.cancel();
            }
            *pending = Some(PendingDismissal {
                id,
                token: token.clone(),
            });
        }

        let state = Arc::clone(&self.state);
        let delay = self.delay;
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::trace!(id = id.0, "Notification dismissal superseded");
                }
                _ = tokio::time::sleep(delay) => {
                    if state.write().await.dismiss_notification(id) {
                        tracing::debug!(id = id.0, "Notification dismissed");
                    }
                }
            }
        });
    }
}
