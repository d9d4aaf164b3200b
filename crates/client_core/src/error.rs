use thiserror::Error;

/// Local checks that run before an action is sent. Messages are shown to the
/// user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a team member and enter a question.")]
    MissingQuestion,
    #[error("Please select a team member and enter a message.")]
    MissingMessage,
    #[error("Please select both a task and a team member.")]
    MissingDelegation,
    #[error("Please select an approach to address the conflict.")]
    MissingApproach,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    SessionStart,
    StateRefresh,
    Validation,
    ActionSubmit,
    ResultsFetch,
    NoSession,
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("failed to start session: {0:#}")]
    SessionStart(anyhow::Error),
    #[error("failed to refresh session state: {0:#}")]
    StateRefresh(anyhow::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to submit {tag} action: {reason:#}")]
    ActionSubmit {
        tag: &'static str,
        reason: anyhow::Error,
    },
    #[error("failed to fetch session results: {0:#}")]
    ResultsFetch(anyhow::Error),
    #[error("no active session")]
    NoActiveSession,
    /// The session the request was made for ended before the response
    /// arrived. The response was discarded.
    #[error("session ended while the request was in flight")]
    Superseded,
}

impl ControllerError {
    pub fn kind(&self) -> NoticeKind {
        match self {
            ControllerError::SessionStart(_) => NoticeKind::SessionStart,
            ControllerError::StateRefresh(_) => NoticeKind::StateRefresh,
            ControllerError::Validation(_) => NoticeKind::Validation,
            ControllerError::ActionSubmit { .. } => NoticeKind::ActionSubmit,
            ControllerError::ResultsFetch(_) => NoticeKind::ResultsFetch,
            ControllerError::NoActiveSession | ControllerError::Superseded => {
                NoticeKind::NoSession
            }
        }
    }

    /// Text suitable for the user. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ControllerError::SessionStart(_) => {
                "Failed to start simulation. Please try again.".to_string()
            }
            ControllerError::StateRefresh(_) => {
                "Failed to update the simulation state. Showing the last known state.".to_string()
            }
            ControllerError::Validation(err) => err.to_string(),
            ControllerError::ActionSubmit { .. } => {
                "Failed to submit action. Please try again.".to_string()
            }
            ControllerError::ResultsFetch(_) => "Failed to get simulation results.".to_string(),
            ControllerError::NoActiveSession => {
                "No simulation is running. Start a session first.".to_string()
            }
            ControllerError::Superseded => {
                "The simulation ended before the request finished.".to_string()
            }
        }
    }
}

/// A non-fatal, user-visible report of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&ControllerError> for Notice {
    fn from(err: &ControllerError) -> Self {
        Self {
            kind: err.kind(),
            message: err.user_message(),
        }
    }
}
