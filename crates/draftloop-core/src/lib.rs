//! Domain layer for Draftloop.
//!
//! Holds the draft model, the revision workflow state machine and the trait
//! through which the workflow reaches the remote generation service.

pub mod config;
pub mod draft;
pub mod error;
pub mod notification;
pub mod service;
pub mod workflow;

// Re-export common types
pub use config::ClientConfig;
pub use draft::{Draft, GenerationInputs, RetrievedContext};
pub use error::{DraftloopError, Result};
pub use notification::{Notification, NotificationId, NotificationKind};
pub use service::{Decision, GeneratedDraft, GenerationService, UpdateOutcome};
pub use workflow::{Direction, TransitionOutcome, WorkflowState, WorkflowView};
