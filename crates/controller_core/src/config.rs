//! Controller configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// What to do when a participant rejects a property write.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteFailurePolicy {
    /// Stop at the first rejected write.
    #[default]
    Abort,
    /// Log the rejection, record it in the report and keep going.
    Continue,
}

/// How property writes are sequenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// Write properties as they are visited. A failure leaves earlier writes
    /// in place.
    #[default]
    SinglePhase,
    /// Check every participant, node and element property before the first
    /// write.
    ValidateThenApply,
}

/// Configuration of a [`Controller`](crate::Controller).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Policy for properties written into each participant's `/system` node.
    pub system_properties: WriteFailurePolicy,
    /// Policy for per-participant properties.
    pub element_properties: WriteFailurePolicy,
    /// Write sequencing.
    pub apply_mode: ApplyMode,
    /// Directory relative descriptor paths are resolved against. Defaults to
    /// the process working directory.
    pub working_dir: Option<PathBuf>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            system_properties: WriteFailurePolicy::Continue,
            element_properties: WriteFailurePolicy::Abort,
            apply_mode: ApplyMode::SinglePhase,
            working_dir: None,
        }
    }
}

impl ControllerConfig {
    /// The default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the policy for `/system` node writes.
    #[must_use]
    pub fn with_system_properties(mut self, policy: WriteFailurePolicy) -> Self {
        self.system_properties = policy;
        self
    }

    /// Set the policy for per-participant writes.
    #[must_use]
    pub fn with_element_properties(mut self, policy: WriteFailurePolicy) -> Self {
        self.element_properties = policy;
        self
    }

    /// Set the apply mode.
    #[must_use]
    pub fn with_apply_mode(mut self, mode: ApplyMode) -> Self {
        self.apply_mode = mode;
        self
    }

    /// Resolve relative descriptor paths against `dir`.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}
