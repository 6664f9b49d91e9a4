//! Terminal rendering of the workflow projection.

use colored::Colorize;
use draftloop_core::notification::{Notification, NotificationKind};
use draftloop_core::workflow::{TransitionOutcome, WorkflowView};

pub fn print_view(view: &WorkflowView) {
    let Some((position, total)) = view.position() else {
        println!(
            "{}",
            format!(
                "No draft yet. Lead {} / user {} - type 'generate' to start.",
                view.inputs.lead_id, view.inputs.user_id
            )
            .bright_black()
        );
        return;
    };

    let mut header = format!("Draft {position} / {total}");
    if view.can_navigate_back {
        header.push_str("  [prev]");
    }
    if view.can_navigate_forward {
        header.push_str("  [next]");
    }
    println!("{}", header.bright_magenta().bold());

    if let Some(buffer) = &view.edit_buffer {
        println!("{}", "(editing - 'edit' saves, 'prev'/'next' discards)".yellow());
        println!("{}", buffer.subject.bold());
        for line in buffer.body.lines() {
            println!("{}", line.yellow());
        }
    } else if let Some(draft) = &view.current_draft {
        println!("{}", draft.subject.bold());
        for line in draft.body.lines() {
            println!("{}", line.bright_blue());
        }
    }
}

pub fn print_context(view: &WorkflowView) {
    let Some(context) = &view.retrieved_context else {
        println!("{}", "No retrieved data.".bright_black());
        return;
    };

    for (title, value) in context.sections() {
        println!("{}", title.bright_magenta());
        let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        for line in pretty.lines() {
            println!("  {}", line.bright_black());
        }
    }
}

pub fn print_notification(notification: &Notification) {
    if !notification.show {
        return;
    }
    let line = format!("[{}] {}", notification.kind.as_str(), notification.message);
    match notification.kind {
        NotificationKind::Success => println!("{}", line.bright_green()),
        NotificationKind::Info => println!("{}", line.bright_cyan()),
        NotificationKind::Error => println!("{}", line.red()),
    }
}

pub fn print_outcome(action: &str, outcome: &TransitionOutcome) {
    if matches!(outcome, TransitionOutcome::NoOp) {
        println!("{}", format!("{action}: nothing to do").bright_black());
    }
}
