use serde::{Deserialize, Serialize};

/// A pending login: the code has been "sent" and the resend cooldown is
/// running. Only ever one at a time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChallengeView {
    pub contact: String,
    pub resend_in_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid contact: {0}")]
    InvalidContact(String),

    #[error("No login in progress")]
    NoPendingLogin,

    #[error("Invalid verification code")]
    InvalidCode,

    #[error("Resend available in {remaining_secs} seconds")]
    ResendCooldown { remaining_secs: u64 },

    #[error("Session storage error: {0}")]
    Storage(String),
}
