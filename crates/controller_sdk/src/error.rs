//! System SDK error types.

use crate::state::LifecycleState;

/// Errors reported by a system or participant handle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
    /// A participant with this name is already part of the system.
    #[error("participant '{0}' is already part of the system")]
    DuplicateParticipant(String),

    /// No running participant answers to this name.
    #[error("participant '{0}' not found")]
    ParticipantNotFound(String),

    /// The participant exists but cannot be reached.
    #[error("participant '{0}' is unreachable")]
    Unreachable(String),

    /// A lifecycle transition was refused.
    #[error("participant '{participant}' can not change state to {target}: {reason}")]
    Transition {
        /// The participant that refused.
        participant: String,
        /// The requested state.
        target: LifecycleState,
        /// Why the transition failed.
        reason: String,
    },

    /// A timing entry point could not be applied.
    #[error("timing configuration of system '{system}' failed: {reason}")]
    Timing {
        /// The system being configured.
        system: String,
        /// What went wrong.
        reason: String,
    },
}
