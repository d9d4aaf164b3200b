//! Pure projections from session data into the view-models the presentation
//! layer consumes. Nothing here touches the network or the controller state.

use std::time::Duration;

use shared::{
    domain::{MemberKey, Mood, Phase, SessionResults, SimulationState, TaskId, Urgency},
    protocol::{Action, ActionResult},
};

pub const MEMBER_PLACEHOLDER: &str = "Choose a team member...";
pub const TASK_PLACEHOLDER: &str = "Choose a task...";

const EXCELLENT_THRESHOLD: f64 = 80.0;
const GOOD_THRESHOLD: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseCopy {
    pub title: &'static str,
    pub description: &'static str,
}

pub fn phase_copy(phase: Phase) -> PhaseCopy {
    match phase {
        Phase::MeetTeam => PhaseCopy {
            title: "Meet Your Team (2 minutes)",
            description: "Get to know your team members and understand their working styles.",
        },
        Phase::DelegateTasks => PhaseCopy {
            title: "Delegate Tasks (5 minutes)",
            description: "Assign project tasks based on team member skills and availability.",
        },
        Phase::NavigateConflicts => PhaseCopy {
            title: "Navigate Conflicts (3 minutes)",
            description: "Handle any tensions and ensure team cohesion.",
        },
        Phase::Completed => PhaseCopy {
            title: "Simulation Complete",
            description: "Review your performance and get feedback.",
        },
        Phase::Unknown => PhaseCopy {
            title: "Simulation In Progress",
            description: "Waiting for the next update from the simulation.",
        },
    }
}

pub fn mood_glyph(mood: Mood) -> &'static str {
    match mood {
        Mood::Happy => "😊",
        Mood::Frustrated => "😟",
        Mood::Neutral | Mood::Unknown => "😐",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Danger,
    Secondary,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Danger => "danger",
            Severity::Secondary => "secondary",
        }
    }

    pub fn from_score(score: f64) -> Self {
        if score >= EXCELLENT_THRESHOLD {
            Severity::Success
        } else if score >= GOOD_THRESHOLD {
            Severity::Warning
        } else {
            Severity::Danger
        }
    }
}

pub fn urgency_severity(urgency: Urgency) -> Severity {
    match urgency {
        Urgency::High => Severity::Danger,
        Urgency::Medium => Severity::Warning,
        Urgency::Low => Severity::Success,
        Urgency::Unknown => Severity::Secondary,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Excellent,
    Good,
    NeedsImprovement,
}

impl Rating {
    pub fn from_mean(mean: f64) -> Self {
        if mean >= EXCELLENT_THRESHOLD {
            Rating::Excellent
        } else if mean >= GOOD_THRESHOLD {
            Rating::Good
        } else {
            Rating::NeedsImprovement
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::NeedsImprovement => "Needs Improvement",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            Rating::Excellent => Severity::Success,
            Rating::Good => Severity::Warning,
            Rating::NeedsImprovement => Severity::Danger,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberCard {
    pub key: MemberKey,
    pub name: String,
    pub glyph: &'static str,
    pub role: String,
    pub description: String,
    /// Clamped to 0..=100 for the workload bar.
    pub workload: u8,
    pub current_tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskCard {
    pub id: TaskId,
    pub name: String,
    pub description: String,
    pub hours_label: String,
    pub urgency: &'static str,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationView {
    pub phase: Phase,
    pub phase_label: String,
    pub title: &'static str,
    pub description: &'static str,
    pub members: Vec<MemberCard>,
    pub tasks: Vec<TaskCard>,
    pub member_options: Vec<SelectOption>,
    pub task_options: Vec<SelectOption>,
}

pub fn render_state(state: &SimulationState) -> SimulationView {
    let copy = phase_copy(state.phase);

    let members = state
        .team_members
        .iter()
        .map(|(key, member)| MemberCard {
            key: key.clone(),
            name: member.name.clone(),
            glyph: mood_glyph(member.mood),
            role: member.role.clone(),
            description: member.description.clone(),
            workload: u8::try_from(member.workload.min(100)).unwrap_or(100),
            current_tasks: member.current_tasks.clone(),
        })
        .collect();

    let tasks = state
        .available_tasks
        .iter()
        .map(|task| TaskCard {
            id: task.id.clone(),
            name: task.name.clone(),
            description: task.description.clone(),
            hours_label: format!("{}h", task.estimated_hours),
            urgency: task.urgency.as_str(),
            severity: urgency_severity(task.urgency),
        })
        .collect();

    let member_options = state
        .team_members
        .iter()
        .map(|(key, member)| SelectOption {
            value: key.to_string(),
            label: format!("{} ({})", member.name, member.role),
        })
        .collect();

    let task_options = state
        .available_tasks
        .iter()
        .map(|task| SelectOption {
            value: task.id.to_string(),
            label: task.name.clone(),
        })
        .collect();

    SimulationView {
        phase: state.phase,
        phase_label: format!("Phase: {}", state.phase.as_str()),
        title: copy.title,
        description: copy.description,
        members,
        tasks,
        member_options,
        task_options,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    pub action: &'static str,
    pub description: String,
    pub message: String,
    pub reaction: Option<String>,
    /// Consequences joined with ", "; `None` when the server reported none.
    pub consequences: Option<String>,
}

/// Names resolve against `state` as it is when the entry is built. A key the
/// state no longer knows falls back to the raw key.
pub fn describe_action(action: &Action, state: Option<&SimulationState>) -> String {
    let name = |key: &MemberKey| {
        state
            .and_then(|state| state.member_name(key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    };

    match action {
        Action::AskQuestion { target_member, .. } => {
            format!("Asked question to {}", name(target_member))
        }
        Action::SendMessage { target_member, .. } => {
            format!("Sent message to {}", name(target_member))
        }
        Action::DelegateTask { target_member, .. } => {
            format!("Delegated task to {}", name(target_member))
        }
        Action::AddressConflict { .. } => "Addressed team conflict".to_string(),
    }
}

pub fn activity_entry(
    action: &Action,
    result: &ActionResult,
    state: Option<&SimulationState>,
) -> ActivityEntry {
    let consequences = if result.consequences.is_empty() {
        None
    } else {
        Some(result.consequences.join(", "))
    };

    ActivityEntry {
        action: action.tag(),
        description: describe_action(action, state),
        message: result.message.clone(),
        reaction: result
            .team_member_reaction
            .clone()
            .filter(|reaction| !reaction.is_empty()),
        consequences,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompetencyCard {
    pub key: String,
    pub name: String,
    pub score: u8,
    pub severity: Severity,
    pub feedback: String,
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultsView {
    pub rating: Rating,
    pub mean_score: f64,
    pub rounded_mean: i64,
    pub duration_minutes: i64,
    pub actions_taken: u32,
    pub competencies: Vec<CompetencyCard>,
}

/// Unweighted mean of every competency score. An empty score table means 0.
pub fn mean_score(results: &SessionResults) -> f64 {
    let scores = &results.competency_scores;
    if scores.is_empty() {
        return 0.0;
    }
    let total: f64 = scores.values().map(|c| f64::from(c.score)).sum();
    total / scores.len() as f64
}

pub fn render_results(results: &SessionResults) -> ResultsView {
    let mean = mean_score(results);

    let competencies = results
        .competency_scores
        .iter()
        .map(|(key, competency)| CompetencyCard {
            key: key.clone(),
            name: competency.name.clone(),
            score: competency.score,
            severity: Severity::from_score(f64::from(competency.score)),
            feedback: competency.feedback.clone(),
            evidence: competency.evidence.clone(),
        })
        .collect();

    ResultsView {
        rating: Rating::from_mean(mean),
        mean_score: mean,
        rounded_mean: mean.round() as i64,
        duration_minutes: results.total_duration.round() as i64,
        actions_taken: results.actions_taken,
        competencies,
    }
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("Time: {:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
