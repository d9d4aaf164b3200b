use serde::{Deserialize, Serialize};

use crate::domain::{ConflictApproach, MemberKey, SessionId, TaskId};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: SessionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictData {
    pub approach: String,
}

/// A single user-initiated request against the simulation. Sent once; the
/// client never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    AskQuestion {
        target_member: MemberKey,
        message: String,
    },
    SendMessage {
        target_member: MemberKey,
        message: String,
    },
    DelegateTask {
        target_member: MemberKey,
        task_id: TaskId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    AddressConflict {
        data: ConflictData,
    },
}

impl Action {
    pub fn ask_question(target: impl Into<String>, message: impl Into<String>) -> Self {
        Action::AskQuestion {
            target_member: MemberKey::new(target),
            message: message.into(),
        }
    }

    pub fn send_message(target: impl Into<String>, message: impl Into<String>) -> Self {
        Action::SendMessage {
            target_member: MemberKey::new(target),
            message: message.into(),
        }
    }

    /// Blank notes are dropped so the body only carries a message when one was written.
    pub fn delegate_task(
        task_id: impl Into<String>,
        assignee: impl Into<String>,
        message: Option<String>,
    ) -> Self {
        Action::DelegateTask {
            target_member: MemberKey::new(assignee),
            task_id: TaskId::new(task_id),
            message: message.filter(|text| !text.trim().is_empty()),
        }
    }

    pub fn address_conflict(approach: impl Into<String>) -> Self {
        Action::AddressConflict {
            data: ConflictData {
                approach: approach.into(),
            },
        }
    }

    pub fn resolve_conflict(approach: ConflictApproach) -> Self {
        Self::address_conflict(approach.as_str())
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Action::AskQuestion { .. } => "ask_question",
            Action::SendMessage { .. } => "send_message",
            Action::DelegateTask { .. } => "delegate_task",
            Action::AddressConflict { .. } => "address_conflict",
        }
    }

    pub fn target_member(&self) -> Option<&MemberKey> {
        match self {
            Action::AskQuestion { target_member, .. }
            | Action::SendMessage { target_member, .. }
            | Action::DelegateTask { target_member, .. } => Some(target_member),
            Action::AddressConflict { .. } => None,
        }
    }
}

/// Narrative feedback for one action. Does not carry the new state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_member_reaction: Option<String>,
    #[serde(default)]
    pub consequences: Vec<String>,
}
