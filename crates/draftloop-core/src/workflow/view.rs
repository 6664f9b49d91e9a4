//! Read-only projection of the workflow state.

use serde::{Deserialize, Serialize};

use super::state::WorkflowState;
use crate::draft::{Draft, GenerationInputs, RetrievedContext};
use crate::notification::Notification;

/// In-flight and edit-mode flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowFlags {
    /// A generation or approval round-trip is in flight.
    pub is_loading: bool,
    /// A regeneration round-trip is in flight.
    pub is_regenerating: bool,
    pub is_editing: bool,
}

/// Snapshot of everything presentation needs, including which controls
/// should be enabled.
///
/// The workflow itself does not reject transitions while a round-trip is in
/// flight; the `can_*` fields are how a front end keeps users from issuing
/// them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowView {
    pub current_draft: Option<Draft>,
    pub edit_buffer: Option<Draft>,
    /// `-1` when history is empty.
    pub history_index: isize,
    pub history_len: usize,
    pub thread_id: Option<String>,
    pub retrieved_context: Option<RetrievedContext>,
    pub flags: WorkflowFlags,
    pub notification: Notification,
    pub inputs: GenerationInputs,
    pub feedback: String,
    pub can_generate: bool,
    pub can_regenerate: bool,
    pub can_approve: bool,
    pub can_navigate_back: bool,
    pub can_navigate_forward: bool,
}

impl WorkflowView {
    pub(crate) fn from_state(state: &WorkflowState) -> Self {
        let flags = state.flags();
        let has_draft = state.current_draft().is_some();
        let history_len = state.history().len();
        let history_index = state.history_index();

        Self {
            current_draft: state.current_draft().cloned(),
            edit_buffer: state.edit_buffer().cloned(),
            history_index,
            history_len,
            thread_id: state.thread_id().map(str::to_string),
            retrieved_context: state.retrieved_context().cloned(),
            flags,
            notification: state.notification().clone(),
            inputs: state.inputs().clone(),
            feedback: state.feedback().to_string(),
            can_generate: !flags.is_loading,
            can_regenerate: has_draft
                && !state.feedback().is_empty()
                && !flags.is_regenerating
                && !flags.is_loading,
            can_approve: has_draft && !flags.is_loading,
            can_navigate_back: history_index > 0,
            can_navigate_forward: history_len > 0 && history_index < history_len as isize - 1,
        }
    }

    /// 1-based position of the current draft, e.g. `(2, 3)` for "2 / 3".
    pub fn position(&self) -> Option<(usize, usize)> {
        usize::try_from(self.history_index)
            .ok()
            .map(|index| (index + 1, self.history_len))
    }
}
