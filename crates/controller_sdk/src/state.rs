//! Participant lifecycle and aggregated system state.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a participant, ordered from least to most progressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleState {
    /// The participant did not answer.
    Unreachable,
    /// Running, nothing loaded.
    Unloaded,
    /// Components loaded; configuration is possible.
    Loaded,
    /// Initialized and ready to start.
    Initialized,
    /// Started but paused.
    Paused,
    /// Running.
    Running,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unreachable => "unreachable",
            Self::Unloaded => "unloaded",
            Self::Loaded => "loaded",
            Self::Initialized => "initialized",
            Self::Paused => "paused",
            Self::Running => "running",
        };
        f.write_str(name)
    }
}

/// Aggregated state of a whole system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemState {
    /// The least progressed participant state.
    pub state: LifecycleState,
    /// `true` iff every participant reports the same state.
    pub homogeneous: bool,
}

impl SystemState {
    /// Aggregate participant states. An empty system is homogeneously
    /// unloaded.
    #[must_use]
    pub fn aggregate(states: impl IntoIterator<Item = LifecycleState>) -> Self {
        let mut iter = states.into_iter();
        let Some(first) = iter.next() else {
            return Self {
                state: LifecycleState::Unloaded,
                homogeneous: true,
            };
        };
        iter.fold(
            Self {
                state: first,
                homogeneous: true,
            },
            |acc, s| Self {
                state: acc.state.min(s),
                homogeneous: acc.homogeneous && s == first,
            },
        )
    }

    /// Returns `true` if every participant reports `state`.
    #[must_use]
    pub fn is_homogeneous(&self, state: LifecycleState) -> bool {
        self.homogeneous && self.state == state
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.homogeneous {
            write!(f, "{} (homogeneous)", self.state)
        } else {
            write!(f, "{} (heterogeneous)", self.state)
        }
    }
}
