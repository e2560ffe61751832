//! # controller_core
//!
//! Connects to a system of participants from a system descriptor file and
//! configures it from a property file.
//!
//! - [`connect_system`] loads a descriptor, creates the system through a
//!   [`SystemConnector`](controller_sdk::SystemConnector) and adds every
//!   participant with its priorities and resolved file references.
//! - [`configure_system`] loads a property file, brings the system to a
//!   homogeneous `loaded` state, writes system and per-participant
//!   properties, and applies the timing configuration.
//!
//! [`Controller`] runs the same pipelines with a [`ControllerConfig`] that
//! chooses write-failure policies and the apply mode.

pub mod apply;
pub mod builder;
pub mod config;
pub mod controller;
pub mod error;
pub mod timing;

pub use apply::{ApplyReport, FailedWrite, apply_properties};
pub use builder::build_system;
pub use config::{ApplyMode, ControllerConfig, WriteFailurePolicy};
pub use controller::{ConfigureReport, Controller, configure_system, connect_system};
pub use error::{ControllerError, PropertyScope};
pub use timing::{apply_timing, configure_timing, resolve_timing};
