//! Generation service trait.
//!
//! The remote generation/approval service is a collaborator reachable
//! through exactly two operations. Implementations normalize the wire
//! outcome into the types below and perform no retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::draft::{Draft, GenerationInputs, RetrievedContext};
use crate::error::Result;

/// The user's decision on the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Regenerate,
    Approve,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regenerate => "regenerate",
            Self::Approve => "approve",
        }
    }
}

/// Result of a successful `generate` call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDraft {
    pub draft: Draft,
    /// Session id correlating later `update` calls.
    pub thread_id: String,
    pub retrieved_context: Option<RetrievedContext>,
}

/// Result of a successful `update` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// New draft; present only for `regenerate`.
    pub draft: Option<Draft>,
    /// Human-readable status message.
    pub message: String,
    /// Whether the service considers the session finished.
    pub is_done: Option<bool>,
}

/// Remote operations consumed by the workflow.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Starts a new generation and returns the first draft.
    async fn generate(&self, inputs: &GenerationInputs) -> Result<GeneratedDraft>;

    /// Continues a session with a decision.
    ///
    /// `feedback` is only meaningful for [`Decision::Regenerate`].
    async fn update(
        &self,
        thread_id: &str,
        decision: Decision,
        feedback: Option<&str>,
    ) -> Result<UpdateOutcome>;
}
