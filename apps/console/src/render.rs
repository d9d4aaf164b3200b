//! Plain-text rendering of controller view-models.

use std::fmt::Write as _;

use client_core::{
    view::{ActivityEntry, ResultsView, SimulationView, MEMBER_PLACEHOLDER, TASK_PLACEHOLDER},
    ControllerEvent,
};

const WORKLOAD_BAR_WIDTH: usize = 20;

fn workload_bar(workload: u8) -> String {
    let filled = usize::from(workload) * WORKLOAD_BAR_WIDTH / 100;
    format!(
        "[{}{}] {workload}%",
        "#".repeat(filled),
        "-".repeat(WORKLOAD_BAR_WIDTH - filled)
    )
}

pub fn render_state(view: &SimulationView, clock: Option<&str>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} | {}", view.title, view.phase_label);
    if let Some(clock) = clock {
        let _ = writeln!(out, "   {clock}");
    }
    let _ = writeln!(out, "   {}", view.description);

    let _ = writeln!(out, "-- team");
    for member in &view.members {
        let _ = writeln!(
            out,
            "  [{}] {} {} ({})",
            member.key, member.name, member.glyph, member.role
        );
        if !member.description.is_empty() {
            let _ = writeln!(out, "      {}", member.description);
        }
        let _ = writeln!(out, "      workload {}", workload_bar(member.workload));
        for task in &member.current_tasks {
            let _ = writeln!(out, "      • {task}");
        }
    }

    if !view.tasks.is_empty() {
        let _ = writeln!(out, "-- available tasks");
        for task in &view.tasks {
            let _ = writeln!(
                out,
                "  [{}] {} ({} • {}/{})",
                task.id,
                task.name,
                task.hours_label,
                task.urgency,
                task.severity.css_class()
            );
            if !task.description.is_empty() {
                let _ = writeln!(out, "      {}", task.description);
            }
        }
    }

    let members: Vec<_> = view
        .member_options
        .iter()
        .map(|option| format!("{}={}", option.value, option.label))
        .collect();
    let _ = writeln!(out, "-- {MEMBER_PLACEHOLDER} {}", members.join(", "));
    if !view.task_options.is_empty() {
        let tasks: Vec<_> = view
            .task_options
            .iter()
            .map(|option| format!("{}={}", option.value, option.label))
            .collect();
        let _ = writeln!(out, "-- {TASK_PLACEHOLDER} {}", tasks.join(", "));
    }
    out.trim_end().to_string()
}

pub fn render_activity(entry: &ActivityEntry) -> String {
    let mut out = format!("> {}\n  {}", entry.description, entry.message);
    if let Some(reaction) = &entry.reaction {
        let _ = write!(out, "\n  \"{reaction}\"");
    }
    if let Some(consequences) = &entry.consequences {
        let _ = write!(out, "\n  ! {consequences}");
    }
    out
}

pub fn render_results(view: &ResultsView) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "== Overall Rating: {} ({})",
        view.rating.label(),
        view.rating.severity().css_class()
    );
    let _ = writeln!(out, "   Average Score: {}%", view.rounded_mean);
    let _ = writeln!(
        out,
        "   Duration: {} minutes | Actions Taken: {}",
        view.duration_minutes, view.actions_taken
    );
    for competency in &view.competencies {
        let _ = writeln!(
            out,
            "-- {} {}% ({})",
            competency.name,
            competency.score,
            competency.severity.css_class()
        );
        if !competency.feedback.is_empty() {
            let _ = writeln!(out, "   {}", competency.feedback);
        }
        for item in &competency.evidence {
            let _ = writeln!(out, "   • {item}");
        }
    }
    out.trim_end().to_string()
}

/// Keeps the latest clock label so state renders can show it without printing
/// every tick.
#[derive(Default)]
pub struct EventPrinter {
    clock: Option<String>,
}

impl EventPrinter {
    pub fn render(&mut self, event: &ControllerEvent) -> Option<String> {
        match event {
            ControllerEvent::SessionStarted { session_id, .. } => {
                Some(format!("session {session_id} started"))
            }
            ControllerEvent::Clock(label) => {
                self.clock = Some(label.clone());
                None
            }
            ControllerEvent::StateRendered(view) => Some(render_state(view, self.clock.as_deref())),
            ControllerEvent::ActivityLogged(entry) => Some(render_activity(entry)),
            ControllerEvent::ResultsReady(view) => Some(render_results(view)),
            ControllerEvent::Notice(notice) => Some(format!("!! {}", notice.message)),
            ControllerEvent::SessionEnded => {
                self.clock = None;
                Some("session ended".to_string())
            }
        }
    }
}
