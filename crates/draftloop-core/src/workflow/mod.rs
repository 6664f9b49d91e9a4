//! Revision workflow module.
//!
//! # Module Structure
//!
//! - `state`: the owned workflow state and its transitions (`WorkflowState`)
//! - `transition`: transition inputs and results (`Direction`, `Transition`, ...)
//! - `view`: the read-only projection (`WorkflowView`, `WorkflowFlags`)

mod state;
mod transition;
mod view;

pub use state::WorkflowState;
pub use transition::{
    Direction, PendingGenerate, PendingUpdate, Transition, TransitionOutcome,
};
pub use view::{WorkflowFlags, WorkflowView};
