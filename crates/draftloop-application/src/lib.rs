//! Application layer for Draftloop.
//!
//! Coordinates the workflow state with the generation service.

pub mod notification_scheduler;
pub mod workflow_engine;

pub use notification_scheduler::NotificationScheduler;
pub use workflow_engine::WorkflowEngine;
