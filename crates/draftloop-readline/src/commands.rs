//! REPL command parsing.

use draftloop_core::workflow::Direction;

/// Command names offered for completion.
pub const COMMAND_NAMES: &[&str] = &[
    "generate",
    "lead",
    "user",
    "instructions",
    "feedback",
    "edit",
    "subject",
    "body",
    "prev",
    "next",
    "approve",
    "show",
    "context",
    "help",
    "quit",
];

pub const HELP_TEXT: &str = "\
generate [instructions]  start a new draft (optionally replacing the instructions)
lead <id> | user <id>    set the lead / user id used by generate
instructions [text]      set or clear the generation instructions
feedback <text>          regenerate the draft with feedback
edit                     enter edit-mode, or save the edit
subject <text>           replace the subject while editing
body <text>              replace the body while editing (\\n for line breaks)
prev | next              move through the draft history
approve                  approve the current draft
show | context           print the current draft / retrieved records
quit                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Generate { instructions: Option<String> },
    SetLead(String),
    SetUser(String),
    SetInstructions(String),
    Feedback(String),
    ToggleEdit,
    Subject(String),
    Body(String),
    Navigate(Direction),
    Approve,
    Show,
    Context,
    Help,
    Quit,
}

/// Parses one input line.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let required = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            Err(format!("'{name}' needs {what}"))
        } else {
            Ok(rest.to_string())
        }
    };

    match name {
        "generate" | "gen" => Ok(Command::Generate {
            instructions: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "lead" => required("a lead id").map(Command::SetLead),
        "user" => required("a user id").map(Command::SetUser),
        "instructions" => Ok(Command::SetInstructions(rest.to_string())),
        "feedback" | "regenerate" => required("feedback text").map(Command::Feedback),
        "edit" | "save" => Ok(Command::ToggleEdit),
        "subject" => required("a subject").map(Command::Subject),
        "body" => required("body text").map(|body| Command::Body(unescape_newlines(&body))),
        "prev" | "back" => Ok(Command::Navigate(Direction::Back)),
        "next" | "forward" => Ok(Command::Navigate(Direction::Forward)),
        "approve" => Ok(Command::Approve),
        "show" => Ok(Command::Show),
        "context" => Ok(Command::Context),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(format!("Unknown command '{other}'. Type 'help' for a list.")),
    }
}

fn unescape_newlines(text: &str) -> String {
    text.replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_with_and_without_instructions() {
        assert_eq!(
            parse_command("generate"),
            Ok(Command::Generate { instructions: None })
        );
        assert_eq!(
            parse_command("generate  Be very formal "),
            Ok(Command::Generate {
                instructions: Some("Be very formal".to_string())
            })
        );
    }

    #[test]
    fn test_feedback_requires_text() {
        assert_eq!(
            parse_command("feedback make it shorter"),
            Ok(Command::Feedback("make it shorter".to_string()))
        );
        assert!(parse_command("feedback").is_err());
    }

    #[test]
    fn test_body_unescapes_newlines() {
        assert_eq!(
            parse_command(r"body Hi there,\nThanks"),
            Ok(Command::Body("Hi there,\nThanks".to_string()))
        );
    }

    #[test]
    fn test_navigation_aliases() {
        assert_eq!(parse_command("back"), Ok(Command::Navigate(Direction::Back)));
        assert_eq!(parse_command("next"), Ok(Command::Navigate(Direction::Forward)));
    }

    #[test]
    fn test_instructions_may_be_cleared() {
        assert_eq!(
            parse_command("instructions"),
            Ok(Command::SetInstructions(String::new()))
        );
    }

    #[test]
    fn test_unknown_command() {
        assert!(parse_command("send").unwrap_err().contains("Unknown command"));
    }
}
