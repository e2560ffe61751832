//! # controller_sdk
//!
//! The system/participant object model the controller drives.
//!
//! The controller never owns participant processes or speaks a wire protocol
//! itself. Everything it needs from the running system is expressed by the
//! traits in [`system`]:
//!
//! - [`SystemConnector`] creates a named [`System`] handle.
//! - [`System`] adds and enumerates participants, transitions and reports the
//!   aggregated lifecycle state, and exposes one timing entry point per mode.
//! - [`Participant`] carries priorities and [`FileReferences`] and hands out a
//!   [`ConfigurationRpc`] proxy.
//! - [`ConfigurationRpc`] resolves [`PropertyNode`]s by path.
//!
//! [`local`] implements all of them for participants living in the current
//! process, which is what the tests and the command-line smoke run use.
//! [`names`] lists the clock, clock-sync and scheduler property names the
//! timing entry points write.
//!
//! [`FileReferences`]: controller_model::FileReferences

pub mod error;
pub mod local;
pub mod names;
pub mod state;
pub mod system;

pub use error::SdkError;
pub use local::{LocalNetwork, LocalParticipant, LocalSystem};
pub use state::{LifecycleState, SystemState};
pub use system::{
    ConfigurationRpc, Participant, PropertyEntry, PropertyNode, System, SystemConnector,
};
