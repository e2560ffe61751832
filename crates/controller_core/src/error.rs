//! Controller error types.

use std::fmt;

use controller_model::LoadError;
use controller_sdk::{LifecycleState, SdkError};

/// The property node a participant could not serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyScope {
    /// The participant's root node `/`.
    Root,
    /// The participant's `/system` node.
    System,
}

impl fmt::Display for PropertyScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Root => f.write_str("root property"),
            Self::System => f.write_str("system properties"),
        }
    }
}

/// Errors returned by the controller.
#[derive(Debug, thiserror::Error)]
pub enum ControllerError {
    /// A descriptor or property file could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The system did not settle in a homogeneous `loaded` state.
    #[error("the system {system} must be in homogeneous loaded state to configure it!")]
    Precondition {
        /// The system name.
        system: String,
        /// The aggregated state observed.
        state: LifecycleState,
    },

    /// A participant's configuration could not be reached.
    #[error("Unable to access {scope} of participant '{participant}': {source}")]
    RpcUnavailable {
        /// The node being fetched.
        scope: PropertyScope,
        /// The participant.
        participant: String,
        /// The transport failure.
        source: SdkError,
    },

    /// A participant rejected a property write.
    #[error("Error setting property '{property}' of participant '{participant}'.")]
    PropertyWrite {
        /// The property name as declared.
        property: String,
        /// The participant.
        participant: String,
    },

    /// The timing table names a mode the controller does not know.
    #[error("unsupported timing type {timing_type} within system {system}")]
    UnsupportedTimingType {
        /// The declared mode.
        timing_type: String,
        /// The system name.
        system: String,
    },

    /// The working directory could not be determined.
    #[error("unable to determine the working directory: {0}")]
    WorkingDirectory(#[source] std::io::Error),

    /// Any other failure reported by the system.
    #[error(transparent)]
    Sdk(#[from] SdkError),
}
