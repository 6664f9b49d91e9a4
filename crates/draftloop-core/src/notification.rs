//! Transient user notifications.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Delay after which a shown notification is dismissed.
pub const NOTIFICATION_DISMISS_DELAY: Duration = Duration::from_millis(3000);

/// Severity of a notification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Success,
    Info,
    Error,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// Identifies one `show` of a notification.
///
/// Every new notification gets a fresh id, so a dismissal scheduled for an
/// older one can never clear a newer one. Ids increase monotonically.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct NotificationId(pub u64);

/// An ephemeral message for the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub show: bool,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(skip)]
    pub id: NotificationId,
}

impl Notification {
    /// Returns a hidden notification with the given id.
    pub fn hidden(id: NotificationId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }
}
