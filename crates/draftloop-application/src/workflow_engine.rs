//! Workflow engine use case.
//!
//! Drives [`WorkflowState`] transitions around calls to the generation
//! service and schedules notification dismissal.

use std::sync::Arc;
use std::time::Duration;

use draftloop_core::config::ClientConfig;
use draftloop_core::draft::{Draft, GenerationInputs};
use draftloop_core::notification::{NotificationKind, NOTIFICATION_DISMISS_DELAY};
use draftloop_core::service::GenerationService;
use draftloop_core::workflow::{
    Direction, PendingUpdate, Transition, TransitionOutcome, WorkflowState, WorkflowView,
};
use draftloop_core::Result;
use draftloop_core::UpdateOutcome;
use tokio::sync::RwLock;

use crate::notification_scheduler::NotificationScheduler;

/// The single writer of workflow state.
///
/// Round-trip transitions run in two phases: `begin_*` is applied under the
/// state lock before the remote call, the lock is released while the call is
/// in flight, and `complete_*` is applied under the lock with the result.
/// Each phase is atomic; a pending call always runs to completion.
///
/// Transitions are never rejected because another round-trip is in flight.
/// Use the `can_*` fields of [`WorkflowView`] to disable controls instead.
#[derive(Clone)]
pub struct WorkflowEngine {
    state: Arc<RwLock<WorkflowState>>,
    service: Arc<dyn GenerationService>,
    notifications: Arc<NotificationScheduler>,
}

impl WorkflowEngine {
    /// Creates an engine with the given form inputs and the default
    /// notification delay.
    pub fn new(service: Arc<dyn GenerationService>, inputs: GenerationInputs) -> Self {
        Self::with_notification_delay(service, inputs, NOTIFICATION_DISMISS_DELAY)
    }

    /// Creates an engine pre-filled from configuration.
    pub fn from_config(service: Arc<dyn GenerationService>, config: &ClientConfig) -> Self {
        Self::with_notification_delay(
            service,
            config.default_inputs(),
            config.notification_timeout(),
        )
    }

    pub fn with_notification_delay(
        service: Arc<dyn GenerationService>,
        inputs: GenerationInputs,
        delay: Duration,
    ) -> Self {
        let state = Arc::new(RwLock::new(WorkflowState::new(inputs)));
        let notifications = Arc::new(NotificationScheduler::new(Arc::clone(&state), delay));
        Self {
            state,
            service,
            notifications,
        }
    }

    /// Returns a snapshot of the current state.
    pub async fn view(&self) -> WorkflowView {
        self.state.read().await.view()
    }

    // ============================================================================
    // Round-trip transitions
    // ============================================================================

    /// Generates a first draft from the held form inputs.
    pub async fn generate(&self) -> TransitionOutcome {
        self.run_generate(None).await
    }

    /// Replaces the form inputs and generates a first draft from them.
    pub async fn generate_with(&self, inputs: GenerationInputs) -> TransitionOutcome {
        self.run_generate(Some(inputs)).await
    }

    async fn run_generate(&self, inputs: Option<GenerationInputs>) -> TransitionOutcome {
        let pending = {
            let mut state = self.state.write().await;
            if let Some(inputs) = inputs {
                state.set_inputs(inputs);
            }
            state.begin_generate()
        };

        let result = self.service.generate(&pending.inputs).await;

        let transition = self.state.write().await.complete_generate(result);
        self.finish(transition).await
    }

    /// Sets the feedback input and regenerates with it.
    ///
    /// Silently does nothing without an active session or with empty feedback.
    pub async fn regenerate_with_feedback(&self, feedback: impl Into<String>) -> TransitionOutcome {
        let pending = {
            let mut state = self.state.write().await;
            state.set_feedback(feedback);
            state.begin_regenerate()
        };
        self.run_regenerate(pending).await
    }

    /// Regenerates with the feedback input already held in state.
    pub async fn regenerate(&self) -> TransitionOutcome {
        let pending = self.state.write().await.begin_regenerate();
        self.run_regenerate(pending).await
    }

    async fn run_regenerate(&self, pending: Option<PendingUpdate>) -> TransitionOutcome {
        let Some(pending) = pending else {
            return TransitionOutcome::NoOp;
        };

        let result = self.call_update(&pending).await;

        let transition = self.state.write().await.complete_regenerate(result);
        self.finish(transition).await
    }

    /// Approves the current session. Silently does nothing without one.
    pub async fn approve(&self) -> TransitionOutcome {
        let Some(pending) = self.state.write().await.begin_approve() else {
            return TransitionOutcome::NoOp;
        };

        let result = self.call_update(&pending).await;

        let transition = self.state.write().await.complete_approve(result);
        self.finish(transition).await
    }

    async fn call_update(&self, pending: &PendingUpdate) -> Result<UpdateOutcome> {
        tracing::debug!(
            thread_id = %pending.thread_id,
            decision = pending.decision.as_str(),
            "Sending update"
        );
        self.service
            .update(
                &pending.thread_id,
                pending.decision,
                pending.feedback.as_deref(),
            )
            .await
    }

    async fn finish(&self, transition: Transition) -> TransitionOutcome {
        if let Some(id) = transition.notification {
            self.notifications.schedule(id).await;
        }
        transition.outcome
    }

    // ============================================================================
    // Local transitions
    // ============================================================================

    pub async fn toggle_edit(&self) -> TransitionOutcome {
        self.state.write().await.toggle_edit()
    }

    pub async fn navigate(&self, direction: Direction) -> TransitionOutcome {
        self.state.write().await.navigate(direction)
    }

    /// Shows a notification and schedules its dismissal.
    pub async fn notify(&self, kind: NotificationKind, message: impl Into<String>) {
        let id = self.state.write().await.notify(kind, message);
        self.notifications.schedule(id).await;
    }

    // ============================================================================
    // Inputs
    // ============================================================================

    pub async fn set_lead_id(&self, lead_id: impl Into<String>) {
        self.state.write().await.set_lead_id(lead_id);
    }

    pub async fn set_user_id(&self, user_id: impl Into<String>) {
        self.state.write().await.set_user_id(user_id);
    }

    pub async fn set_instructions(&self, instructions: impl Into<String>) {
        self.state.write().await.set_instructions(instructions);
    }

    pub async fn set_feedback(&self, feedback: impl Into<String>) {
        self.state.write().await.set_feedback(feedback);
    }

    /// Returns false when edit-mode is not active.
    pub async fn set_edit_subject(&self, subject: impl Into<String>) -> bool {
        self.state.write().await.set_edit_subject(subject)
    }

    /// Returns false when edit-mode is not active.
    pub async fn set_edit_body(&self, body: impl Into<String>) -> bool {
        self.state.write().await.set_edit_body(body)
    }

    pub async fn set_edit_buffer(&self, draft: Draft) -> bool {
        self.state.write().await.set_edit_buffer(draft)
    }
}
