//! Builds a live system from a descriptor.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use controller_model::{FileReferences, ParticipantSpec, SystemModel, canonicalize, normalize};
use controller_sdk::{Participant, System, SystemConnector};

use crate::config::ControllerConfig;
use crate::error::ControllerError;

/// The absolute directory relative paths are resolved against: the
/// configured working directory, itself taken relative to the process working
/// directory, or the process working directory.
///
/// # Errors
///
/// Returns [`ControllerError::WorkingDirectory`] if the process working
/// directory is needed and cannot be read.
pub fn base_dir(config: &ControllerConfig) -> Result<PathBuf, ControllerError> {
    match &config.working_dir {
        Some(dir) if dir.is_absolute() => Ok(dir.clone()),
        Some(dir) => Ok(current_dir()?.join(dir)),
        None => current_dir(),
    }
}

fn current_dir() -> Result<PathBuf, ControllerError> {
    std::env::current_dir().map_err(ControllerError::WorkingDirectory)
}

/// Directory that relative file references of the descriptor at
/// `descriptor_path` are resolved against.
///
/// # Errors
///
/// Returns [`ControllerError::WorkingDirectory`] if `descriptor_path` is
/// relative and [`base_dir`] fails.
pub fn anchor_dir(descriptor_path: &Path, config: &ControllerConfig) -> Result<PathBuf, ControllerError> {
    let absolute = if descriptor_path.is_absolute() {
        descriptor_path.to_path_buf()
    } else {
        base_dir(config)?.join(descriptor_path)
    };
    let canonical = canonicalize(&absolute);
    Ok(canonical
        .parent()
        .map_or_else(|| canonical.clone(), Path::to_path_buf))
}

/// Resolve a participant's declared file references against `anchor`.
#[must_use]
pub fn file_references(spec: &ParticipantSpec, anchor: &Path) -> FileReferences {
    let resolve = |raw: &Option<String>| raw.as_deref().map(|r| normalize(r, anchor).to_string());
    FileReferences {
        timing_file_reference: resolve(&spec.timing_file_ref),
        input_mapping: resolve(&spec.input_mapping_ref),
        output_mapping: resolve(&spec.output_mapping_ref),
    }
}

/// Create the system described by `model` and add its participants in
/// declaration order, with priorities and resolved file references.
///
/// No participant configuration is touched.
///
/// # Errors
///
/// Returns [`ControllerError::Sdk`] if the system cannot be created or a
/// participant cannot be added, and [`ControllerError::WorkingDirectory`] if
/// the anchor directory cannot be computed.
pub fn build_system<C: SystemConnector>(
    model: &SystemModel,
    descriptor_path: &Path,
    connector: &C,
    config: &ControllerConfig,
) -> Result<C::System, ControllerError> {
    let anchor = anchor_dir(descriptor_path, config)?;
    debug!(anchor = %anchor.display(), "resolved descriptor anchor");

    let mut system = connector.create_system(&model.name)?;
    for spec in &model.participants {
        let participant = system.add_participant(&spec.id)?;
        participant.set_init_priority(spec.init_priority)?;
        participant.set_start_priority(spec.start_priority)?;
        let references = file_references(spec, &anchor);
        debug!(
            participant = spec.id,
            init_priority = spec.init_priority,
            start_priority = spec.start_priority,
            ?references,
            "participant added"
        );
        participant.set_file_references(references)?;
    }

    info!(
        system = model.name,
        participants = model.participants.len(),
        "system built"
    );
    Ok(system)
}
