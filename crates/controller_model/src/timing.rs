//! Timing configuration modes.
//!
//! The timing block of a property file is a key/value table. The key
//! [`TIMING_CONFIGURATION_TYPE`] selects one of a closed set of
//! [`TimingMode`]s; each mode reads a fixed set of parameter keys, each with a
//! default. [`MODE_TABLE`] holds that mapping and [`TimingConfiguration`] is
//! the resolved result.

use serde::{Deserialize, Serialize};

use crate::properties::Property;

// ── Keys ────────────────────────────────────────────────────────────────────

/// Selects the timing mode.
pub const TIMING_CONFIGURATION_TYPE: &str = "timing_configuration_type";
/// Id of the timing master participant.
pub const MASTER_ELEMENT_ID: &str = "master_element_id";
/// Step size of the master clock.
pub const MASTER_TIME_STEPSIZE: &str = "master_time_stepsize";
/// Time factor of the master clock.
pub const MASTER_TIME_FACTOR: &str = "master_time_factor";
/// Synchronization step size of the slaves.
pub const SLAVE_TIME_STEPSIZE: &str = "slave_time_stepsize";

/// Prefix shared by all modes that are resolved into clock properties.
pub const TIMING3_PREFIX: &str = "Timing3";

const NO_PARAMETERS: &[(&str, &str)] = &[];
const CLOCK_SYNC_PARAMETERS: &[(&str, &str)] = &[(MASTER_ELEMENT_ID, ""), (SLAVE_TIME_STEPSIZE, "100")];
const DISCRETE_STEPS_PARAMETERS: &[(&str, &str)] = &[
    (MASTER_ELEMENT_ID, ""),
    (MASTER_TIME_STEPSIZE, "100"),
    (MASTER_TIME_FACTOR, "1.0"),
];
const AFAP_PARAMETERS: &[(&str, &str)] = &[(MASTER_ELEMENT_ID, ""), (MASTER_TIME_STEPSIZE, "100")];

// ── Modes ───────────────────────────────────────────────────────────────────

/// The supported values of [`TIMING_CONFIGURATION_TYPE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimingMode {
    /// Timing is fully described by ordinary properties.
    PropertyBased,
    /// No timing master; every participant free-runs.
    Timing3NoMaster,
    /// Clock sync only; slaves interpolate between master ticks.
    Timing3ClockSyncOnlyInterpolation,
    /// Clock sync only; slaves step discretely.
    Timing3ClockSyncOnlyDiscrete,
    /// The master drives discrete simulation steps.
    Timing3DiscreteSteps,
    /// The master runs as fast as possible.
    Timing3Afap,
}

/// One row of [`MODE_TABLE`].
#[derive(Debug)]
pub struct ModeEntry {
    /// The mode.
    pub mode: TimingMode,
    /// The value of [`TIMING_CONFIGURATION_TYPE`] selecting it.
    pub name: &'static str,
    /// Parameter keys read by the mode, with their defaults.
    pub parameters: &'static [(&'static str, &'static str)],
}

/// Mode name → parameters with defaults.
pub static MODE_TABLE: &[ModeEntry] = &[
    ModeEntry {
        mode: TimingMode::PropertyBased,
        name: "PropertyBased",
        parameters: NO_PARAMETERS,
    },
    ModeEntry {
        mode: TimingMode::Timing3NoMaster,
        name: "Timing3NoMaster",
        parameters: NO_PARAMETERS,
    },
    ModeEntry {
        mode: TimingMode::Timing3ClockSyncOnlyInterpolation,
        name: "Timing3ClockSyncOnlyInterpolation",
        parameters: CLOCK_SYNC_PARAMETERS,
    },
    ModeEntry {
        mode: TimingMode::Timing3ClockSyncOnlyDiscrete,
        name: "Timing3ClockSyncOnlyDiscrete",
        parameters: CLOCK_SYNC_PARAMETERS,
    },
    ModeEntry {
        mode: TimingMode::Timing3DiscreteSteps,
        name: "Timing3DiscreteSteps",
        parameters: DISCRETE_STEPS_PARAMETERS,
    },
    ModeEntry {
        mode: TimingMode::Timing3Afap,
        name: "Timing3AFAP",
        parameters: AFAP_PARAMETERS,
    },
];

impl TimingMode {
    /// The mode used when the timing block does not name one.
    pub const DEFAULT: Self = Self::PropertyBased;

    /// Look up a mode by its declared name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        MODE_TABLE.iter().find(|e| e.name == name).map(|e| e.mode)
    }

    fn entry(self) -> &'static ModeEntry {
        MODE_TABLE
            .iter()
            .find(|e| e.mode == self)
            .unwrap_or(&MODE_TABLE[0])
    }

    /// The declared name of this mode.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Parameter keys and defaults read by this mode.
    #[must_use]
    pub fn parameters(self) -> &'static [(&'static str, &'static str)] {
        self.entry().parameters
    }
}

/// The timing block named a mode outside [`MODE_TABLE`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported timing type {0}")]
pub struct UnsupportedTimingMode(pub String);

/// Value of `key` in a timing table. When a key is declared more than once
/// the last declaration wins.
#[must_use]
pub fn lookup<'a>(properties: &'a [Property], key: &str) -> Option<&'a str> {
    properties
        .iter()
        .rev()
        .find(|p| p.name == key)
        .map(|p| p.value.as_str())
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// A timing mode with all of its parameters filled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TimingConfiguration {
    /// Nothing to do.
    PropertyBased,
    /// See [`TimingMode::Timing3NoMaster`].
    NoMaster,
    /// See [`TimingMode::Timing3ClockSyncOnlyInterpolation`].
    ClockSyncOnlyInterpolation {
        master_element_id: String,
        slave_time_stepsize: String,
    },
    /// See [`TimingMode::Timing3ClockSyncOnlyDiscrete`].
    ClockSyncOnlyDiscrete {
        master_element_id: String,
        slave_time_stepsize: String,
    },
    /// See [`TimingMode::Timing3DiscreteSteps`].
    DiscreteSteps {
        master_element_id: String,
        master_time_stepsize: String,
        master_time_factor: String,
    },
    /// See [`TimingMode::Timing3Afap`].
    Afap {
        master_element_id: String,
        master_time_stepsize: String,
    },
}

impl TimingConfiguration {
    /// Resolve a timing table.
    ///
    /// A missing [`TIMING_CONFIGURATION_TYPE`] means
    /// [`TimingMode::PropertyBased`]. Parameters absent from the table take
    /// the defaults from [`MODE_TABLE`].
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedTimingMode`] if the table names an unknown mode,
    /// including unknown names carrying the [`TIMING3_PREFIX`].
    pub fn resolve(properties: &[Property]) -> Result<Self, UnsupportedTimingMode> {
        let name = lookup(properties, TIMING_CONFIGURATION_TYPE)
            .unwrap_or_else(|| TimingMode::DEFAULT.name());
        let mode =
            TimingMode::from_name(name).ok_or_else(|| UnsupportedTimingMode(name.to_string()))?;

        let param = |key: &str| -> String {
            lookup(properties, key)
                .or_else(|| {
                    mode.parameters()
                        .iter()
                        .find(|(k, _)| *k == key)
                        .map(|(_, default)| *default)
                })
                .unwrap_or_default()
                .to_string()
        };

        Ok(match mode {
            TimingMode::PropertyBased => Self::PropertyBased,
            TimingMode::Timing3NoMaster => Self::NoMaster,
            TimingMode::Timing3ClockSyncOnlyInterpolation => Self::ClockSyncOnlyInterpolation {
                master_element_id: param(MASTER_ELEMENT_ID),
                slave_time_stepsize: param(SLAVE_TIME_STEPSIZE),
            },
            TimingMode::Timing3ClockSyncOnlyDiscrete => Self::ClockSyncOnlyDiscrete {
                master_element_id: param(MASTER_ELEMENT_ID),
                slave_time_stepsize: param(SLAVE_TIME_STEPSIZE),
            },
            TimingMode::Timing3DiscreteSteps => Self::DiscreteSteps {
                master_element_id: param(MASTER_ELEMENT_ID),
                master_time_stepsize: param(MASTER_TIME_STEPSIZE),
                master_time_factor: param(MASTER_TIME_FACTOR),
            },
            TimingMode::Timing3Afap => Self::Afap {
                master_element_id: param(MASTER_ELEMENT_ID),
                master_time_stepsize: param(MASTER_TIME_STEPSIZE),
            },
        })
    }

    /// The mode this configuration was resolved from.
    #[must_use]
    pub fn mode(&self) -> TimingMode {
        match self {
            Self::PropertyBased => TimingMode::PropertyBased,
            Self::NoMaster => TimingMode::Timing3NoMaster,
            Self::ClockSyncOnlyInterpolation { .. } => TimingMode::Timing3ClockSyncOnlyInterpolation,
            Self::ClockSyncOnlyDiscrete { .. } => TimingMode::Timing3ClockSyncOnlyDiscrete,
            Self::DiscreteSteps { .. } => TimingMode::Timing3DiscreteSteps,
            Self::Afap { .. } => TimingMode::Timing3Afap,
        }
    }

    /// The timing master, if the mode has one.
    #[must_use]
    pub fn master_element_id(&self) -> Option<&str> {
        match self {
            Self::PropertyBased | Self::NoMaster => None,
            Self::ClockSyncOnlyInterpolation {
                master_element_id, ..
            }
            | Self::ClockSyncOnlyDiscrete {
                master_element_id, ..
            }
            | Self::DiscreteSteps {
                master_element_id, ..
            }
            | Self::Afap {
                master_element_id, ..
            } => Some(master_element_id),
        }
    }
}
