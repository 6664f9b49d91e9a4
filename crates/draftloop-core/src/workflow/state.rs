use tracing::{debug, info, warn};

use super::transition::{
    Direction, PendingGenerate, PendingUpdate, Transition, TransitionOutcome,
};
use super::view::{WorkflowFlags, WorkflowView};
use crate::config::{DEFAULT_LEAD_ID, DEFAULT_USER_ID};
use crate::draft::{Draft, GenerationInputs, RetrievedContext};
use crate::error::Result;
use crate::notification::{Notification, NotificationId, NotificationKind};
use crate::service::{Decision, GeneratedDraft, UpdateOutcome};

/// Owned state of one drafting workflow.
///
/// `WorkflowState` is the only owner of the draft history. Every transition
/// is a method on it; the ones that involve a round-trip are split into a
/// `begin_*` phase, applied before the remote call is issued, and a
/// `complete_*` phase, applied with the call's result.
///
/// Invariants maintained by every method:
/// - `cursor` is `None` iff `history` is empty, otherwise it indexes into it.
/// - history, cursor, session id and retrieved context are reset together.
/// - `edit_buffer` is `Some` iff edit-mode is active.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    history: Vec<Draft>,
    cursor: Option<usize>,
    thread_id: Option<String>,
    retrieved_context: Option<RetrievedContext>,
    edit_buffer: Option<Draft>,
    is_loading: bool,
    is_regenerating: bool,
    notification: Notification,
    last_notification_id: u64,
    inputs: GenerationInputs,
    feedback: String,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new(GenerationInputs::new(DEFAULT_LEAD_ID, DEFAULT_USER_ID, ""))
    }
}

impl WorkflowState {
    /// Creates an idle workflow with empty history and the given form inputs.
    pub fn new(inputs: GenerationInputs) -> Self {
        Self {
            history: Vec::new(),
            cursor: None,
            thread_id: None,
            retrieved_context: None,
            edit_buffer: None,
            is_loading: false,
            is_regenerating: false,
            notification: Notification::default(),
            last_notification_id: 0,
            inputs,
            feedback: String::new(),
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn history(&self) -> &[Draft] {
        &self.history
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Cursor as a signed index: `-1` when history is empty.
    pub fn history_index(&self) -> isize {
        self.cursor.map_or(-1, |cursor| cursor as isize)
    }

    /// The draft currently shown.
    pub fn current_draft(&self) -> Option<&Draft> {
        self.cursor.and_then(|cursor| self.history.get(cursor))
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn has_session(&self) -> bool {
        self.thread_id.is_some()
    }

    pub fn retrieved_context(&self) -> Option<&RetrievedContext> {
        self.retrieved_context.as_ref()
    }

    pub fn edit_buffer(&self) -> Option<&Draft> {
        self.edit_buffer.as_ref()
    }

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    pub fn flags(&self) -> WorkflowFlags {
        WorkflowFlags {
            is_loading: self.is_loading,
            is_regenerating: self.is_regenerating,
            is_editing: self.is_editing(),
        }
    }

    pub fn notification(&self) -> &Notification {
        &self.notification
    }

    pub fn inputs(&self) -> &GenerationInputs {
        &self.inputs
    }

    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Builds the read-only projection used by presentation.
    pub fn view(&self) -> WorkflowView {
        WorkflowView::from_state(self)
    }

    // ============================================================================
    // Form inputs
    // ============================================================================

    pub fn set_inputs(&mut self, inputs: GenerationInputs) {
        self.inputs = inputs;
    }

    pub fn set_lead_id(&mut self, lead_id: impl Into<String>) {
        self.inputs.lead_id = lead_id.into();
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) {
        self.inputs.user_id = user_id.into();
    }

    pub fn set_instructions(&mut self, instructions: impl Into<String>) {
        self.inputs.instructions = instructions.into();
    }

    pub fn set_feedback(&mut self, feedback: impl Into<String>) {
        self.feedback = feedback.into();
    }

    // ============================================================================
    // Edit buffer
    // ============================================================================

    /// Replaces the edit buffer. Returns false when edit-mode is not active.
    pub fn set_edit_buffer(&mut self, draft: Draft) -> bool {
        match self.edit_buffer.as_mut() {
            Some(buffer) => {
                *buffer = draft;
                true
            }
            None => false,
        }
    }

    pub fn set_edit_subject(&mut self, subject: impl Into<String>) -> bool {
        match self.edit_buffer.as_mut() {
            Some(buffer) => {
                buffer.subject = subject.into();
                true
            }
            None => false,
        }
    }

    pub fn set_edit_body(&mut self, body: impl Into<String>) -> bool {
        match self.edit_buffer.as_mut() {
            Some(buffer) => {
                buffer.body = body.into();
                true
            }
            None => false,
        }
    }

    // ============================================================================
    // Notifications
    // ============================================================================

    /// Shows a notification, superseding any visible one.
    pub fn notify(&mut self, kind: NotificationKind, message: impl Into<String>) -> NotificationId {
        self.last_notification_id += 1;
        let id = NotificationId(self.last_notification_id);
        self.notification = Notification {
            show: true,
            message: message.into(),
            kind,
            id,
        };
        id
    }

    /// Hides the notification if `id` is still the one shown.
    pub fn dismiss_notification(&mut self, id: NotificationId) -> bool {
        if self.notification.show && self.notification.id == id {
            self.notification = Notification::hidden(id);
            true
        } else {
            false
        }
    }

    fn fail(&mut self, operation: &str, err: &crate::error::DraftloopError) -> Transition {
        let message = err.user_message();
        warn!(operation, error = %err, "Round-trip failed");
        let id = self.notify(NotificationKind::Error, message.clone());
        Transition::failed(message, id)
    }

    fn reset_session(&mut self) {
        self.history.clear();
        self.cursor = None;
        self.thread_id = None;
        self.retrieved_context = None;
    }

    // ============================================================================
    // generate
    // ============================================================================

    /// Starts a generation: marks the round-trip in flight and resets the
    /// session before the request is issued.
    pub fn begin_generate(&mut self) -> PendingGenerate {
        self.is_loading = true;
        self.reset_session();
        debug!(lead_id = %self.inputs.lead_id, user_id = %self.inputs.user_id, "Generation started");
        PendingGenerate {
            inputs: self.inputs.clone(),
        }
    }

    /// Applies the result of a generation round-trip.
    ///
    /// A failure leaves history empty; the reset from [`Self::begin_generate`]
    /// is not reverted.
    pub fn complete_generate(&mut self, result: Result<GeneratedDraft>) -> Transition {
        self.is_loading = false;
        match result {
            Ok(generated) => {
                info!(thread_id = %generated.thread_id, "Generated first draft");
                self.retrieved_context = generated.retrieved_context;
                self.thread_id = Some(generated.thread_id);
                self.history = vec![generated.draft];
                self.cursor = Some(0);
                Transition::applied(None)
            }
            Err(err) => self.fail("generate", &err),
        }
    }

    // ============================================================================
    // regenerate with feedback
    // ============================================================================

    /// Starts a regeneration with the held feedback.
    ///
    /// Returns `None` (a silent no-op) without a session or with empty feedback.
    pub fn begin_regenerate(&mut self) -> Option<PendingUpdate> {
        let Some(thread_id) = self.thread_id.clone() else {
            debug!("Regenerate ignored: no active session");
            return None;
        };
        if self.feedback.is_empty() {
            debug!("Regenerate ignored: empty feedback");
            return None;
        }

        self.is_regenerating = true;
        Some(PendingUpdate {
            thread_id,
            decision: Decision::Regenerate,
            feedback: Some(self.feedback.clone()),
        })
    }

    /// Applies the result of a regeneration round-trip.
    ///
    /// A returned draft is appended and becomes current; history is never
    /// truncated here.
    pub fn complete_regenerate(&mut self, result: Result<UpdateOutcome>) -> Transition {
        self.is_regenerating = false;
        match result {
            Ok(UpdateOutcome {
                draft: Some(draft),
                message,
                ..
            }) => {
                self.history.push(draft);
                self.cursor = Some(self.history.len() - 1);
                self.feedback.clear();
                info!(revisions = self.history.len(), "Appended regenerated draft");
                let id = self.notify(NotificationKind::Info, message);
                Transition::applied(Some(id))
            }
            Ok(_) => {
                warn!("Regenerate response carried no draft; history unchanged");
                Transition::no_op()
            }
            Err(err) => self.fail("regenerate", &err),
        }
    }

    // ============================================================================
    // approve
    // ============================================================================

    /// Starts an approval. Returns `None` without an active session.
    pub fn begin_approve(&mut self) -> Option<PendingUpdate> {
        let Some(thread_id) = self.thread_id.clone() else {
            debug!("Approve ignored: no active session");
            return None;
        };

        self.is_loading = true;
        Some(PendingUpdate {
            thread_id,
            decision: Decision::Approve,
            feedback: None,
        })
    }

    /// Applies the result of an approval round-trip.
    ///
    /// Success is terminal: the workflow returns to its initial empty state.
    /// Failure leaves everything but the loading flag untouched.
    pub fn complete_approve(&mut self, result: Result<UpdateOutcome>) -> Transition {
        self.is_loading = false;
        match result {
            Ok(outcome) => {
                if outcome.is_done == Some(false) {
                    warn!("Approve response reports the session as not done");
                }
                info!("Draft approved");
                let id = self.notify(NotificationKind::Success, outcome.message);
                self.reset_session();
                Transition::applied(Some(id))
            }
            Err(err) => self.fail("approve", &err),
        }
    }

    // ============================================================================
    // edit / navigate
    // ============================================================================

    /// Enters or leaves edit-mode.
    ///
    /// Entering copies the current draft into the edit buffer and requires one
    /// to exist. Leaving commits the buffer: history after the cursor is
    /// discarded and the buffer is appended as the new current draft, even if
    /// it was not modified. If history was emptied while editing, leaving just
    /// drops the buffer.
    pub fn toggle_edit(&mut self) -> TransitionOutcome {
        match self.edit_buffer.take() {
            None => {
                let Some(current) = self.current_draft().cloned() else {
                    debug!("Edit ignored: no current draft");
                    return TransitionOutcome::NoOp;
                };
                self.edit_buffer = Some(current);
                TransitionOutcome::Applied
            }
            Some(buffer) => {
                let Some(cursor) = self.cursor else {
                    debug!("Edit buffer dropped: history is empty");
                    return TransitionOutcome::Applied;
                };
                let discarded = self.history.len() - (cursor + 1);
                self.history.truncate(cursor + 1);
                self.history.push(buffer);
                self.cursor = Some(self.history.len() - 1);
                debug!(discarded, "Committed edited draft");
                TransitionOutcome::Applied
            }
        }
    }

    /// Moves the cursor one step, clamped to the history bounds.
    ///
    /// Leaves edit-mode unconditionally, discarding uncommitted edits. A no-op
    /// when history is empty.
    pub fn navigate(&mut self, direction: Direction) -> TransitionOutcome {
        let Some(cursor) = self.cursor else {
            debug!("Navigate ignored: history is empty");
            return TransitionOutcome::NoOp;
        };

        let was_editing = self.edit_buffer.take().is_some();
        let last = self.history.len() - 1;
        let target = match direction {
            Direction::Back => cursor.saturating_sub(1),
            Direction::Forward => (cursor + 1).min(last),
        };
        self.cursor = Some(target);

        if target == cursor && !was_editing {
            TransitionOutcome::NoOp
        } else {
            TransitionOutcome::Applied
        }
    }
}
