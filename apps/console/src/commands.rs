//! Typed console input mapped onto controller operations.

use std::ops::ControlFlow;

use client_core::SessionController;
use shared::{domain::ConflictApproach, protocol::Action};
use tracing::debug;

pub const HELP: &str = "\
commands:
  start                               start a new session
  refresh                             re-fetch the session state
  ask <member> <question>             ask a team member a question
  message <member> <text>             send a team member a message
  delegate <task> <member> [note]     delegate a task
  conflict <approach>                 address the team conflict
  log                                 show the activity log
  help                                show this text
  quit                                end the session and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Refresh,
    Submit(Action),
    ShowLog,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    pub fn name(&self) -> &'static str {
        match self {
            ConsoleCommand::Start => "start",
            ConsoleCommand::Refresh => "refresh",
            ConsoleCommand::Submit(action) => action.tag(),
            ConsoleCommand::ShowLog => "log",
            ConsoleCommand::Help => "help",
            ConsoleCommand::Quit => "quit",
            ConsoleCommand::Unknown(_) => "unknown",
        }
    }
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

/// Missing arguments are passed through as blanks so the controller's own
/// validation decides what the user is told.
pub fn parse_command(line: &str) -> Option<ConsoleCommand> {
    let (verb, rest) = split_word(line);
    if verb.is_empty() {
        return None;
    }

    let command = match verb.to_ascii_lowercase().as_str() {
        "start" => ConsoleCommand::Start,
        "refresh" | "state" => ConsoleCommand::Refresh,
        "ask" => {
            let (member, text) = split_word(rest);
            ConsoleCommand::Submit(Action::ask_question(member, text))
        }
        "message" | "msg" => {
            let (member, text) = split_word(rest);
            ConsoleCommand::Submit(Action::send_message(member, text))
        }
        "delegate" => {
            let (task, rest) = split_word(rest);
            let (member, note) = split_word(rest);
            ConsoleCommand::Submit(Action::delegate_task(
                task,
                member,
                Some(note.to_string()),
            ))
        }
        "conflict" => {
            let (approach, _) = split_word(rest);
            ConsoleCommand::Submit(Action::address_conflict(approach))
        }
        "log" => ConsoleCommand::ShowLog,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => ConsoleCommand::Unknown(other.to_string()),
    };
    Some(command)
}

pub fn conflict_hint() -> String {
    let approaches: Vec<_> = ConflictApproach::ALL
        .iter()
        .map(|approach| approach.as_str())
        .collect();
    format!("known approaches: {}", approaches.join(", "))
}

/// Runs one command against the controller. Failures are already published
/// as notices by the controller, so they are only traced here.
pub async fn dispatch(controller: &SessionController, command: ConsoleCommand) -> ControlFlow<()> {
    debug!(command = command.name(), "dispatching console command");
    match command {
        ConsoleCommand::Start => {
            let _ = controller.start_session().await;
        }
        ConsoleCommand::Refresh => {
            let _ = controller.refresh_state().await;
        }
        ConsoleCommand::Submit(action) => {
            if let Err(err) = controller.submit_action(action).await {
                debug!("action not applied: {err}");
            }
        }
        ConsoleCommand::ShowLog => {
            let log = controller.activity_log().await;
            if log.is_empty() {
                println!("(no activity yet)");
            }
            for entry in &log {
                println!("{}", crate::render::render_activity(entry));
            }
        }
        ConsoleCommand::Help => {
            println!("{HELP}");
            println!("{}", conflict_hint());
        }
        ConsoleCommand::Unknown(verb) => {
            println!("unknown command '{verb}'");
            println!("{HELP}");
        }
        ConsoleCommand::Quit => {
            controller.teardown().await;
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actions_with_free_text() {
        assert_eq!(
            parse_command("ask sam how is the design going?"),
            Some(ConsoleCommand::Submit(Action::ask_question(
                "sam",
                "how is the design going?"
            )))
        );
        assert_eq!(
            parse_command("delegate backend_api alex  you know this stack"),
            Some(ConsoleCommand::Submit(Action::delegate_task(
                "backend_api",
                "alex",
                Some("you know this stack".to_string())
            )))
        );
        assert_eq!(
            parse_command("conflict private_meetings"),
            Some(ConsoleCommand::Submit(Action::address_conflict(
                "private_meetings"
            )))
        );
    }

    #[test]
    fn missing_arguments_become_blank_fields() {
        assert_eq!(
            parse_command("message"),
            Some(ConsoleCommand::Submit(Action::send_message("", "")))
        );
        assert_eq!(
            parse_command("delegate backend_api"),
            Some(ConsoleCommand::Submit(Action::delegate_task(
                "backend_api",
                "",
                None
            )))
        );
    }

    #[test]
    fn blank_and_unknown_lines() {
        assert_eq!(parse_command("   "), None);
        assert_eq!(
            parse_command("dance"),
            Some(ConsoleCommand::Unknown("dance".to_string()))
        );
        assert_eq!(parse_command("QUIT"), Some(ConsoleCommand::Quit));
    }
}
