use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

id_newtype!(SessionId);
id_newtype!(MemberKey);
id_newtype!(TaskId);

/// Coarse stage of the exercise. The server owns transitions; unknown values
/// decode to [`Phase::Unknown`] instead of failing the whole state payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    MeetTeam,
    DelegateTasks,
    NavigateConflicts,
    Completed,
    #[serde(other)]
    Unknown,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::MeetTeam => "meet_team",
            Phase::DelegateTasks => "delegate_tasks",
            Phase::NavigateConflicts => "navigate_conflicts",
            Phase::Completed => "completed",
            Phase::Unknown => "unknown",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Completed
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Happy,
    #[default]
    Neutral,
    Frustrated,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    Medium,
    Low,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Urgency {
    pub fn as_str(self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
            Urgency::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mood: Mood,
    /// Grows with every delegation and has no upper bound on the wire.
    #[serde(default)]
    pub workload: u32,
    #[serde(default)]
    pub current_tasks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_hours: f64,
    #[serde(default)]
    pub urgency: Urgency,
}

/// Remote-authoritative snapshot of one session. Replaced wholesale on refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    pub phase: Phase,
    #[serde(default)]
    pub team_members: BTreeMap<MemberKey, TeamMember>,
    #[serde(default)]
    pub available_tasks: Vec<Task>,
}

impl SimulationState {
    pub fn member_name(&self, key: &MemberKey) -> Option<&str> {
        self.team_members.get(key).map(|member| member.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConflictApproach {
    AddressBoth,
    PrivateMeetings,
}

impl ConflictApproach {
    pub const ALL: [ConflictApproach; 2] =
        [ConflictApproach::AddressBoth, ConflictApproach::PrivateMeetings];

    pub fn as_str(self) -> &'static str {
        match self {
            ConflictApproach::AddressBoth => "address_both",
            ConflictApproach::PrivateMeetings => "private_meetings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub name: String,
    pub score: u8,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResults {
    #[serde(default)]
    pub competency_scores: BTreeMap<String, CompetencyScore>,
    /// Minutes, as measured by the server.
    pub total_duration: f64,
    pub actions_taken: u32,
}
