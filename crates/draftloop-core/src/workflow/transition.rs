//! Transition inputs and results shared by the workflow state and its driver.

use serde::{Deserialize, Serialize};

use crate::draft::GenerationInputs;
use crate::notification::NotificationId;
use crate::service::Decision;

/// Direction of a history navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Back,
    Forward,
}

/// What a transition did to the state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The transition's effect was applied.
    Applied,
    /// A precondition was not met, or there was nothing to apply.
    NoOp,
    /// The round-trip failed; `message` was raised as an error notification.
    Failed { message: String },
}

/// Result of completing a transition: the outcome plus the notification it
/// raised, if any, so the caller can schedule its dismissal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub outcome: TransitionOutcome,
    pub notification: Option<NotificationId>,
}

impl Transition {
    pub fn applied(notification: Option<NotificationId>) -> Self {
        Self {
            outcome: TransitionOutcome::Applied,
            notification,
        }
    }

    pub fn no_op() -> Self {
        Self {
            outcome: TransitionOutcome::NoOp,
            notification: None,
        }
    }

    pub fn failed(message: String, notification: NotificationId) -> Self {
        Self {
            outcome: TransitionOutcome::Failed { message },
            notification: Some(notification),
        }
    }
}

/// A generation whose optimistic reset has been applied and whose remote
/// call has not yet resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGenerate {
    pub inputs: GenerationInputs,
}

/// An `update` round-trip that passed its preconditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpdate {
    pub thread_id: String,
    pub decision: Decision,
    pub feedback: Option<String>,
}
