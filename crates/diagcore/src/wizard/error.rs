use thiserror::Error;

use super::messages;
use super::submission::TransportError;
use super::view::Field;

/// Why a wizard operation did not advance
///
/// Every variant is recoverable: the session stays usable and the message
/// has already been shown through the feedback channel when this is returned.
#[derive(Debug, Error)]
pub enum WizardError {
    /// Local input check failed on `field`; nothing was sent
    #[error("{message}")]
    Validation { field: Field, message: &'static str },

    /// Operation not allowed in the current state
    #[error("{0}")]
    Precondition(&'static str),

    /// The deployment requires a Telegram identity and none was resolved
    #[error("no Telegram identity available")]
    IdentityRequired,

    /// The request never produced a usable response
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The server answered but did not accept the submission
    #[error("submission rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },
}

impl WizardError {
    /// Text shown on the status line for this error
    pub fn user_message(&self) -> &str {
        match self {
            WizardError::Validation { message, .. } => message,
            WizardError::Precondition(message) => message,
            WizardError::IdentityRequired => messages::IDENTITY_REQUIRED,
            WizardError::Transport(_) => messages::NETWORK_ERROR,
            WizardError::Rejected { message } => message.as_deref().unwrap_or(messages::SUBMIT_FAILED),
        }
    }

    /// The input to mark, for field-level errors
    pub fn field(&self) -> Option<Field> {
        match self {
            WizardError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}
