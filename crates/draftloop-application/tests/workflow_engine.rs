use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use draftloop_application::WorkflowEngine;
use draftloop_core::draft::{Draft, GenerationInputs, RetrievedContext};
use draftloop_core::error::{DraftloopError, Result};
use draftloop_core::notification::NotificationKind;
use draftloop_core::service::{Decision, GeneratedDraft, GenerationService, UpdateOutcome};
use draftloop_core::workflow::{Direction, TransitionOutcome};
use tokio::sync::Semaphore;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Generate(GenerationInputs),
    Update {
        thread_id: String,
        decision: Decision,
        feedback: Option<String>,
    },
}

// Mock GenerationService with scripted responses
struct MockGenerationService {
    generate_results: Mutex<VecDeque<Result<GeneratedDraft>>>,
    update_results: Mutex<VecDeque<Result<UpdateOutcome>>>,
    calls: Mutex<Vec<Call>>,
    // When set, every call waits for a permit before answering.
    gate: Option<Semaphore>,
}

impl MockGenerationService {
    fn new() -> Self {
        Self {
            generate_results: Mutex::new(VecDeque::new()),
            update_results: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new()
        }
    }

    fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    fn push_generate(&self, result: Result<GeneratedDraft>) {
        self.generate_results.lock().unwrap().push_back(result);
    }

    fn push_update(&self, result: Result<UpdateOutcome>) {
        self.update_results.lock().unwrap().push_back(result);
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    async fn wait_for_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
    }
}

#[async_trait::async_trait]
impl GenerationService for MockGenerationService {
    async fn generate(&self, inputs: &GenerationInputs) -> Result<GeneratedDraft> {
        self.calls.lock().unwrap().push(Call::Generate(inputs.clone()));
        self.wait_for_gate().await;
        self.generate_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DraftloopError::internal("no scripted generate result")))
    }

    async fn update(
        &self,
        thread_id: &str,
        decision: Decision,
        feedback: Option<&str>,
    ) -> Result<UpdateOutcome> {
        self.calls.lock().unwrap().push(Call::Update {
            thread_id: thread_id.to_string(),
            decision,
            feedback: feedback.map(str::to_string),
        });
        self.wait_for_gate().await;
        self.update_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(DraftloopError::internal("no scripted update result")))
    }
}

fn draft(label: &str) -> Draft {
    Draft::new(format!("Subject {label}"), format!("Body {label}"))
}

fn generated(d: Draft, thread_id: &str) -> Result<GeneratedDraft> {
    Ok(GeneratedDraft {
        draft: d,
        thread_id: thread_id.to_string(),
        retrieved_context: Some(RetrievedContext::default()),
    })
}

fn regenerated(d: Draft) -> Result<UpdateOutcome> {
    Ok(UpdateOutcome {
        draft: Some(d),
        message: "Email regenerated.".to_string(),
        is_done: Some(false),
    })
}

fn approved() -> Result<UpdateOutcome> {
    Ok(UpdateOutcome {
        draft: None,
        message: "Email approved and process finished.".to_string(),
        is_done: Some(true),
    })
}

fn engine_with(service: Arc<MockGenerationService>) -> WorkflowEngine {
    WorkflowEngine::new(service, GenerationInputs::new("2094", "53", ""))
}

#[tokio::test]
async fn test_revision_scenario_end_to_end() {
    let service = Arc::new(MockGenerationService::new());
    service.push_generate(generated(draft("D0"), "T1"));
    service.push_update(regenerated(draft("D1")));
    service.push_update(approved());
    let engine = engine_with(Arc::clone(&service));

    assert_eq!(engine.generate().await, TransitionOutcome::Applied);
    let view = engine.view().await;
    assert_eq!(view.history_len, 1);
    assert_eq!(view.history_index, 0);
    assert_eq!(view.thread_id.as_deref(), Some("T1"));

    assert_eq!(
        engine.regenerate_with_feedback("more formal").await,
        TransitionOutcome::Applied
    );
    let view = engine.view().await;
    assert_eq!(view.history_len, 2);
    assert_eq!(view.history_index, 1);
    assert_eq!(view.current_draft, Some(draft("D1")));
    assert!(view.feedback.is_empty());

    engine.navigate(Direction::Back).await;
    assert_eq!(engine.view().await.history_index, 0);

    engine.toggle_edit().await;
    assert!(engine.set_edit_body("Body D0, edited").await);
    engine.toggle_edit().await;
    let view = engine.view().await;
    assert_eq!(view.history_len, 2);
    assert_eq!(view.history_index, 1);
    assert_eq!(
        view.current_draft,
        Some(Draft::new("Subject D0", "Body D0, edited"))
    );

    assert_eq!(engine.approve().await, TransitionOutcome::Applied);
    let view = engine.view().await;
    assert_eq!(view.history_len, 0);
    assert_eq!(view.history_index, -1);
    assert_eq!(view.thread_id, None);
    assert_eq!(view.notification.kind, NotificationKind::Success);

    assert_eq!(
        service.calls(),
        vec![
            Call::Generate(GenerationInputs::new("2094", "53", "")),
            Call::Update {
                thread_id: "T1".to_string(),
                decision: Decision::Regenerate,
                feedback: Some("more formal".to_string()),
            },
            Call::Update {
                thread_id: "T1".to_string(),
                decision: Decision::Approve,
                feedback: None,
            },
        ]
    );
}

#[tokio::test]
async fn test_preconditions_skip_remote_calls() {
    let service = Arc::new(MockGenerationService::new());
    let engine = engine_with(Arc::clone(&service));

    assert_eq!(engine.approve().await, TransitionOutcome::NoOp);
    assert_eq!(
        engine.regenerate_with_feedback("more formal").await,
        TransitionOutcome::NoOp
    );
    assert_eq!(engine.navigate(Direction::Forward).await, TransitionOutcome::NoOp);
    assert_eq!(engine.toggle_edit().await, TransitionOutcome::NoOp);

    service.push_generate(generated(draft("D0"), "T1"));
    engine.generate().await;
    assert_eq!(engine.regenerate_with_feedback("").await, TransitionOutcome::NoOp);

    assert_eq!(service.calls().len(), 1);
    assert_eq!(engine.view().await.history_len, 1);
}

#[tokio::test]
async fn test_generate_with_replaces_inputs() {
    let service = Arc::new(MockGenerationService::new());
    service.push_generate(generated(draft("D0"), "T9"));
    let engine = engine_with(Arc::clone(&service));

    let inputs = GenerationInputs::new("77", "8", "Mention a 10% discount.");
    engine.generate_with(inputs.clone()).await;

    assert_eq!(service.calls(), vec![Call::Generate(inputs.clone())]);
    assert_eq!(engine.view().await.inputs, inputs);
}

#[tokio::test]
async fn test_generate_failure_surfaces_error() {
    let service = Arc::new(MockGenerationService::new());
    service.push_generate(generated(draft("D0"), "T1"));
    service.push_generate(Err(DraftloopError::remote(Some(500), "Failed to generate email.")));
    let engine = engine_with(Arc::clone(&service));

    engine.generate().await;
    let outcome = engine.generate().await;

    assert_eq!(
        outcome,
        TransitionOutcome::Failed {
            message: "Failed to generate email.".to_string()
        }
    );
    let view = engine.view().await;
    assert_eq!(view.history_len, 0);
    assert_eq!(view.history_index, -1);
    assert_eq!(view.thread_id, None);
    assert!(!view.flags.is_loading);
    assert!(view.notification.show);
    assert_eq!(view.notification.kind, NotificationKind::Error);
}

#[tokio::test]
async fn test_approve_failure_keeps_session() {
    let service = Arc::new(MockGenerationService::new());
    service.push_generate(generated(draft("D0"), "T1"));
    service.push_update(Err(DraftloopError::transport("connection reset")));
    let engine = engine_with(Arc::clone(&service));

    engine.generate().await;
    let outcome = engine.approve().await;

    assert!(matches!(outcome, TransitionOutcome::Failed { .. }));
    let view = engine.view().await;
    assert_eq!(view.history_len, 1);
    assert_eq!(view.thread_id.as_deref(), Some("T1"));
    assert!(!view.flags.is_loading);
    assert_eq!(view.notification.message, "connection reset");
}

#[tokio::test]
async fn test_reset_is_visible_while_generate_in_flight() {
    let service = Arc::new(MockGenerationService::gated());
    service.push_generate(generated(draft("D0"), "T1"));
    service.release();
    service.push_generate(generated(draft("E0"), "T2"));
    let engine = engine_with(Arc::clone(&service));
    engine.generate().await;

    let task = tokio::spawn({
        let engine = engine.clone();
        async move { engine.generate().await }
    });
    while !engine.view().await.flags.is_loading {
        tokio::task::yield_now().await;
    }

    let view = engine.view().await;
    assert_eq!(view.history_len, 0);
    assert_eq!(view.history_index, -1);
    assert_eq!(view.thread_id, None);
    assert!(view.retrieved_context.is_none());

    service.release();
    assert_eq!(task.await.unwrap(), TransitionOutcome::Applied);
    let view = engine.view().await;
    assert_eq!(view.thread_id.as_deref(), Some("T2"));
    assert_eq!(view.current_draft, Some(draft("E0")));
    assert!(!view.flags.is_loading);
}

// Transitions are not rejected while a round-trip is in flight: navigation
// during a regeneration is applied and the regenerated draft is still
// appended when the call resolves.
#[tokio::test]
async fn test_navigate_during_regeneration_is_lenient() {
    let service = Arc::new(MockGenerationService::gated());
    service.push_generate(generated(draft("D0"), "T1"));
    service.push_update(regenerated(draft("D1")));
    service.push_update(regenerated(draft("D2")));
    let engine = engine_with(Arc::clone(&service));

    service.release();
    engine.generate().await;
    service.release();
    engine.regenerate_with_feedback("shorter").await;
    assert_eq!(engine.view().await.history_index, 1);

    let task = tokio::spawn({
        let engine = engine.clone();
        async move { engine.regenerate_with_feedback("warmer").await }
    });
    while !engine.view().await.flags.is_regenerating {
        tokio::task::yield_now().await;
    }

    assert_eq!(engine.navigate(Direction::Back).await, TransitionOutcome::Applied);
    assert_eq!(engine.view().await.history_index, 0);
    assert!(!engine.view().await.can_regenerate);

    service.release();
    assert_eq!(task.await.unwrap(), TransitionOutcome::Applied);

    let view = engine.view().await;
    assert_eq!(view.history_len, 3);
    assert_eq!(view.history_index, 2);
    assert_eq!(view.current_draft, Some(draft("D2")));
    assert!(!view.flags.is_regenerating);
}

#[tokio::test(start_paused = true)]
async fn test_notification_clears_after_delay() {
    let service = Arc::new(MockGenerationService::new());
    service.push_generate(Err(DraftloopError::remote(Some(500), "boom")));
    let engine = engine_with(service);

    engine.generate().await;
    assert!(engine.view().await.notification.show);

    tokio::time::sleep(Duration::from_millis(2999)).await;
    assert!(engine.view().await.notification.show);

    tokio::time::sleep(Duration::from_millis(2)).await;
    let notification = engine.view().await.notification;
    assert!(!notification.show);
    assert!(notification.message.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_new_notification_restarts_window() {
    let service = Arc::new(MockGenerationService::new());
    let engine = engine_with(service);

    engine.notify(NotificationKind::Info, "first").await;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    engine.notify(NotificationKind::Error, "second").await;

    // Past the first notification's deadline, inside the second's.
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let notification = engine.view().await.notification;
    assert!(notification.show);
    assert_eq!(notification.message, "second");
    assert_eq!(notification.kind, NotificationKind::Error);

    tokio::time::sleep(Duration::from_millis(1501)).await;
    assert!(!engine.view().await.notification.show);
}
