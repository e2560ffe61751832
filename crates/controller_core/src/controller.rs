//! The two controller pipelines: connect a system from a descriptor, and
//! configure a connected system from a property file.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use controller_model::{TimingConfiguration, load_property_file, load_system_descriptor};
use controller_sdk::{System, SystemConnector};

use crate::apply::{ApplyReport, apply_properties};
use crate::builder::{base_dir, build_system};
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::timing::configure_timing;

/// Outcome of [`Controller::configure_with_report`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigureReport {
    /// Property writes.
    pub apply: ApplyReport,
    /// The timing configuration that was applied.
    pub timing: TimingConfiguration,
}

/// Connects and configures systems according to a [`ControllerConfig`].
#[derive(Debug, Clone, Default)]
pub struct Controller {
    config: ControllerConfig,
}

impl Controller {
    /// Create a controller.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// With a configured working directory, relative paths become absolute
    /// paths below it. Otherwise they are left to the process working
    /// directory.
    fn resolve_path(&self, path: &Path) -> Result<PathBuf, ControllerError> {
        if self.config.working_dir.is_some() && path.is_relative() {
            Ok(base_dir(&self.config)?.join(path))
        } else {
            Ok(path.to_path_buf())
        }
    }

    /// Load the descriptor at `descriptor_path` and build the system it
    /// describes through `connector`.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Load`] if the descriptor cannot be loaded and
    /// [`ControllerError::Sdk`] if the system cannot be built.
    pub fn connect<C: SystemConnector>(
        &self,
        descriptor_path: impl AsRef<Path>,
        connector: &C,
    ) -> Result<C::System, ControllerError> {
        let descriptor_path = self.resolve_path(descriptor_path.as_ref())?;
        let model = load_system_descriptor(&descriptor_path)?;
        build_system(&model, &descriptor_path, connector, &self.config)
    }

    /// Load the property file at `properties_path` and apply it to `system`.
    ///
    /// # Errors
    ///
    /// See [`Controller::configure_with_report`].
    pub fn configure<S: System>(
        &self,
        system: &mut S,
        properties_path: impl AsRef<Path>,
    ) -> Result<(), ControllerError> {
        self.configure_with_report(system, properties_path)
            .map(|_| ())
    }

    /// Load the property file at `properties_path`, write its properties into
    /// `system` and apply its timing configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerError::Load`] if the file cannot be loaded, and any
    /// error of [`apply_properties`] or the timing step.
    pub fn configure_with_report<S: System>(
        &self,
        system: &mut S,
        properties_path: impl AsRef<Path>,
    ) -> Result<ConfigureReport, ControllerError> {
        let properties_path = self.resolve_path(properties_path.as_ref())?;
        let model = load_property_file(&properties_path)?;
        let apply = apply_properties(system, &model, &self.config)?;
        let timing = configure_timing(system, &model.timing_properties)?;
        info!(
            system = system.name(),
            file = %properties_path.display(),
            "system configured"
        );
        Ok(ConfigureReport { apply, timing })
    }
}

/// Connect a system with the default configuration.
///
/// # Errors
///
/// See [`Controller::connect`].
pub fn connect_system<C: SystemConnector>(
    descriptor_path: impl AsRef<Path>,
    connector: &C,
) -> Result<C::System, ControllerError> {
    Controller::default().connect(descriptor_path, connector)
}

/// Configure a system with the default configuration.
///
/// # Errors
///
/// See [`Controller::configure_with_report`].
pub fn configure_system<S: System>(
    system: &mut S,
    properties_path: impl AsRef<Path>,
) -> Result<(), ControllerError> {
    Controller::default().configure(system, properties_path)
}
