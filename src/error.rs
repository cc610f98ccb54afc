use thiserror::Error;

/// Failures of a single bridge interaction or of bridge construction.
///
/// A portal reply whose `status` is not `"success"` is not an error: it is
/// reported to the user like any other message.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Request to the portal failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Portal replied with a malformed body: {0}")]
    MalformedResponse(String),
    #[error("Clicked element carries no slot identifier")]
    MissingSlotId,
    #[error("Slot identifier {0:?} cannot be sent as a path segment")]
    InvalidSlotId(String),
    #[error("Invalid portal base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Transport and decode failures are the ones the user gets no server
    /// message for.
    pub fn is_silent_to_user(&self) -> bool {
        matches!(
            self,
            BridgeError::Transport(_)
                | BridgeError::MalformedResponse(_)
                | BridgeError::MissingSlotId
                | BridgeError::InvalidSlotId(_)
        )
    }
}
