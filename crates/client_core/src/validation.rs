use shared::protocol::Action;

use crate::error::ValidationError;

/// Checks that every field the action needs is present and non-blank.
pub fn validate_action(action: &Action) -> Result<(), ValidationError> {
    match action {
        Action::AskQuestion {
            target_member,
            message,
        } => {
            if target_member.is_blank() || message.trim().is_empty() {
                return Err(ValidationError::MissingQuestion);
            }
        }
        Action::SendMessage {
            target_member,
            message,
        } => {
            if target_member.is_blank() || message.trim().is_empty() {
                return Err(ValidationError::MissingMessage);
            }
        }
        Action::DelegateTask {
            target_member,
            task_id,
            ..
        } => {
            if target_member.is_blank() || task_id.is_blank() {
                return Err(ValidationError::MissingDelegation);
            }
        }
        Action::AddressConflict { data } => {
            if data.approach.trim().is_empty() {
                return Err(ValidationError::MissingApproach);
            }
        }
    }
    Ok(())
}
