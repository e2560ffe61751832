//! # controller_model
//!
//! Declarative inputs of the participant system controller.
//!
//! This crate provides:
//!
//! - [`path`]: lexical normalization of file references against an anchor
//!   directory.
//! - [`descriptor`]: the system descriptor model ([`SystemModel`]) and its
//!   loader.
//! - [`properties`]: the property file model ([`PropertyModel`]) and its
//!   loader.
//! - [`timing`]: the closed set of timing modes and their parameter table.
//! - [`xml`]: DOM loading and structural binding helpers shared by both
//!   loaders.
//! - [`error`]: load and binding error types.

pub mod descriptor;
pub mod error;
pub mod path;
pub mod properties;
pub mod timing;
pub mod xml;

pub use descriptor::{FileReferences, ParticipantSpec, SystemModel, load_system_descriptor};
pub use error::{BindError, LoadError, ModelKind};
pub use path::{PathReference, canonicalize, normalize};
pub use properties::{
    ElementProperties, Property, PropertyModel, PropertyType, load_property_file,
};
pub use timing::{TimingConfiguration, TimingMode, UnsupportedTimingMode};
