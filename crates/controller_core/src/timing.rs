//! Resolves the timing table and drives the system's timing entry points.

use tracing::info;

use controller_model::{Property, TimingConfiguration, UnsupportedTimingMode};
use controller_sdk::System;

use crate::error::ControllerError;

/// Resolve a timing table for `system`.
///
/// # Errors
///
/// Returns [`ControllerError::UnsupportedTimingType`] if the table names an
/// unknown mode.
pub fn resolve_timing<S: System>(
    system: &S,
    properties: &[Property],
) -> Result<TimingConfiguration, ControllerError> {
    TimingConfiguration::resolve(properties).map_err(|UnsupportedTimingMode(timing_type)| {
        ControllerError::UnsupportedTimingType {
            timing_type,
            system: system.name().to_string(),
        }
    })
}

/// Call the timing entry point matching `timing`.
///
/// # Errors
///
/// Returns [`ControllerError::Sdk`] if the system rejects the configuration.
pub fn apply_timing<S: System>(
    system: &mut S,
    timing: &TimingConfiguration,
) -> Result<(), ControllerError> {
    match timing {
        TimingConfiguration::PropertyBased => {}
        TimingConfiguration::NoMaster => system.configure_timing3_no_master()?,
        TimingConfiguration::ClockSyncOnlyInterpolation {
            master_element_id,
            slave_time_stepsize,
        } => system.configure_timing3_clock_sync_only_interpolation(
            master_element_id,
            slave_time_stepsize,
        )?,
        TimingConfiguration::ClockSyncOnlyDiscrete {
            master_element_id,
            slave_time_stepsize,
        } => system
            .configure_timing3_clock_sync_only_discrete(master_element_id, slave_time_stepsize)?,
        TimingConfiguration::DiscreteSteps {
            master_element_id,
            master_time_stepsize,
            master_time_factor,
        } => system.configure_timing3_discrete_steps(
            master_element_id,
            master_time_stepsize,
            master_time_factor,
        )?,
        TimingConfiguration::Afap {
            master_element_id,
            master_time_stepsize,
        } => system.configure_timing3_afap(master_element_id, master_time_stepsize)?,
    }
    info!(system = system.name(), mode = timing.mode().name(), "timing applied");
    Ok(())
}

/// Resolve `properties` and apply the result to `system`.
///
/// # Errors
///
/// See [`resolve_timing`] and [`apply_timing`].
pub fn configure_timing<S: System>(
    system: &mut S,
    properties: &[Property],
) -> Result<TimingConfiguration, ControllerError> {
    let timing = resolve_timing(system, properties)?;
    apply_timing(system, &timing)?;
    Ok(timing)
}
