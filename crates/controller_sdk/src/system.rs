//! Interfaces of the running system consumed by the controller.
//!
//! Handles are cheap proxies: cloning one does not clone the participant, and
//! every call is a fresh round trip to whatever backs it.

use controller_model::{FileReferences, PropertyType};

use crate::error::SdkError;
use crate::state::{LifecycleState, SystemState};

/// A property value as reported by a participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    /// Textual value.
    pub value: String,
    /// Registered type.
    pub property_type: PropertyType,
}

/// A node of a participant's property tree.
///
/// Names passed to a node are slash-delimited and relative to the node; a
/// leading slash is accepted and means the same path.
pub trait PropertyNode {
    /// Absolute path of this node (`/`, `/system`, ...).
    fn path(&self) -> &str;

    /// Set a property below this node. Returns `false` if the property does
    /// not exist, has a different type, or `value` is not valid for `property_type`.
    fn set_property(&self, name: &str, value: &str, property_type: PropertyType) -> bool;

    /// Read a property below this node.
    fn property(&self, name: &str) -> Option<PropertyEntry>;
}

/// Configuration RPC surface of one participant.
pub trait ConfigurationRpc {
    /// Node handle type.
    type Node: PropertyNode;

    /// Resolve the node at `path`. `Ok(None)` means the participant has no
    /// such node.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the participant cannot be reached.
    fn properties(&self, path: &str) -> Result<Option<Self::Node>, SdkError>;
}

/// Proxy of one participant of a system.
pub trait Participant {
    /// Configuration RPC proxy type.
    type Configuration: ConfigurationRpc;

    /// The participant name.
    fn name(&self) -> &str;

    /// Priority used when initializing the system.
    fn init_priority(&self) -> i32;

    /// # Errors
    ///
    /// Returns [`SdkError`] if the priority cannot be stored.
    fn set_init_priority(&self, priority: i32) -> Result<(), SdkError>;

    /// Priority used when starting the system.
    fn start_priority(&self) -> i32;

    /// # Errors
    ///
    /// Returns [`SdkError`] if the priority cannot be stored.
    fn set_start_priority(&self, priority: i32) -> Result<(), SdkError>;

    /// Auxiliary file references attached when the system was built.
    fn file_references(&self) -> FileReferences;

    /// # Errors
    ///
    /// Returns [`SdkError`] if the references cannot be stored.
    fn set_file_references(&self, references: FileReferences) -> Result<(), SdkError>;

    /// Obtain the configuration RPC proxy.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the participant cannot be reached.
    fn configuration(&self) -> Result<Self::Configuration, SdkError>;
}

/// A named set of participants controlled as a unit.
pub trait System {
    /// Participant proxy type.
    type Participant: Participant;

    /// The system name.
    fn name(&self) -> &str;

    /// Add a participant and return its proxy.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the name is taken or cannot be resolved.
    fn add_participant(&mut self, name: &str) -> Result<Self::Participant, SdkError>;

    /// Look up a participant proxy by name.
    fn participant(&self, name: &str) -> Option<Self::Participant>;

    /// All participant proxies, in the order they were added.
    fn participants(&self) -> Vec<Self::Participant>;

    /// Request that every participant transitions to `state`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if a transition is refused.
    fn set_state(&mut self, state: LifecycleState) -> Result<(), SdkError>;

    /// Query the aggregated state.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the state cannot be determined.
    fn state(&self) -> Result<SystemState, SdkError>;

    // ── Timing entry points ─────────────────────────────────────────────────

    /// No timing master; every participant runs on its local real-time clock.
    ///
    /// Not transactional: participants are configured one after another, and
    /// a failure leaves the ones before it reconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if a participant rejects the configuration.
    fn configure_timing3_no_master(&mut self) -> Result<(), SdkError>;

    /// Slaves synchronize to `master_element_id` every `slave_time_stepsize`
    /// and interpolate in between.
    ///
    /// Not transactional: participants are configured one after another, and
    /// a failure leaves the ones before it reconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the master is unknown or a participant rejects
    /// the configuration.
    fn configure_timing3_clock_sync_only_interpolation(
        &mut self,
        master_element_id: &str,
        slave_time_stepsize: &str,
    ) -> Result<(), SdkError>;

    /// Slaves synchronize to `master_element_id` every `slave_time_stepsize`
    /// and step discretely.
    ///
    /// Not transactional: participants are configured one after another, and
    /// a failure leaves the ones before it reconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the master is unknown or a participant rejects
    /// the configuration.
    fn configure_timing3_clock_sync_only_discrete(
        &mut self,
        master_element_id: &str,
        slave_time_stepsize: &str,
    ) -> Result<(), SdkError>;

    /// The master advances simulation time in discrete steps, paced by
    /// `master_time_factor`.
    ///
    /// Not transactional: participants are configured one after another, and
    /// a failure leaves the ones before it reconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the master is unknown or a participant rejects
    /// the configuration.
    fn configure_timing3_discrete_steps(
        &mut self,
        master_element_id: &str,
        master_time_stepsize: &str,
        master_time_factor: &str,
    ) -> Result<(), SdkError>;

    /// The master advances simulation time as fast as possible.
    ///
    /// Not transactional: participants are configured one after another, and
    /// a failure leaves the ones before it reconfigured.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the master is unknown or a participant rejects
    /// the configuration.
    fn configure_timing3_afap(
        &mut self,
        master_element_id: &str,
        master_time_stepsize: &str,
    ) -> Result<(), SdkError>;
}

/// Creates system handles.
pub trait SystemConnector {
    /// System handle type.
    type System: System;

    /// Create an empty system named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError`] if the system cannot be created.
    fn create_system(&self, name: &str) -> Result<Self::System, SdkError>;
}
