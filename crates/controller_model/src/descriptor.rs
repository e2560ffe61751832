//! System descriptor model and loader.
//!
//! A descriptor names a system and lists its participants in declaration
//! order, together with their init/start priorities and optional references to
//! auxiliary files.

use std::path::Path;

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BindError, LoadError, ModelKind};
use crate::xml;

/// Topology of a system as declared in a descriptor file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemModel {
    /// The system name.
    pub name: String,
    /// Participants in declaration order. Ids are unique.
    pub participants: Vec<ParticipantSpec>,
}

impl SystemModel {
    /// Look up a participant by id.
    #[must_use]
    pub fn participant(&self, id: &str) -> Option<&ParticipantSpec> {
        self.participants.iter().find(|p| p.id == id)
    }
}

/// One participant entry of a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    /// Participant identifier, unique within the system.
    pub id: String,
    /// Priority used when initializing the system.
    pub init_priority: i32,
    /// Priority used when starting the system.
    pub start_priority: i32,
    /// Raw timing configuration file reference.
    pub timing_file_ref: Option<String>,
    /// Raw input signal mapping file reference.
    pub input_mapping_ref: Option<String>,
    /// Raw output signal mapping file reference.
    pub output_mapping_ref: Option<String>,
}

impl ParticipantSpec {
    /// A participant with the given priorities and no file references.
    #[must_use]
    pub fn new(id: impl Into<String>, init_priority: i32, start_priority: i32) -> Self {
        Self {
            id: id.into(),
            init_priority,
            start_priority,
            timing_file_ref: None,
            input_mapping_ref: None,
            output_mapping_ref: None,
        }
    }
}

/// Resolved auxiliary file references attached to a live participant.
///
/// These are stored for later consumers and never interpreted by the
/// controller itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReferences {
    /// Timing configuration file.
    pub timing_file_reference: Option<String>,
    /// Input signal mapping file.
    pub input_mapping: Option<String>,
    /// Output signal mapping file.
    pub output_mapping: Option<String>,
}

impl FileReferences {
    /// Metadata key of the timing configuration reference.
    pub const TIMING_FILE_REFERENCE: &'static str = "timing_file_reference";
    /// Metadata key of the input mapping reference.
    pub const INPUT_MAPPING: &'static str = "input_mapping";
    /// Metadata key of the output mapping reference.
    pub const OUTPUT_MAPPING: &'static str = "output_mapping";

    /// Look up a reference by its well-known metadata key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            Self::TIMING_FILE_REFERENCE => self.timing_file_reference.as_deref(),
            Self::INPUT_MAPPING => self.input_mapping.as_deref(),
            Self::OUTPUT_MAPPING => self.output_mapping.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if no reference is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timing_file_reference.is_none()
            && self.input_mapping.is_none()
            && self.output_mapping.is_none()
    }
}

/// Load and bind a system descriptor file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file does not exist, is not well-formed, or
/// does not describe a system.
pub fn load_system_descriptor(path: impl AsRef<Path>) -> Result<SystemModel, LoadError> {
    let path = path.as_ref();
    let model = xml::load(path, ModelKind::SystemDescriptor, bind_system)?;
    info!(
        file = %path.display(),
        system = model.name,
        participants = model.participants.len(),
        "loaded system descriptor"
    );
    Ok(model)
}

/// Bind a `<system>` root element.
pub fn bind_system(root: Node<'_, '_>) -> Result<SystemModel, BindError> {
    xml::expect_root(root, "system")?;
    let name = xml::require_text(root, "name")?;

    let mut participants: Vec<ParticipantSpec> = Vec::new();
    let list = xml::require_child(root, "participants")?;
    for node in xml::children(list, "participant") {
        let spec = bind_participant(node)?;
        if participants.iter().any(|p| p.id == spec.id) {
            return Err(BindError::DuplicateParticipant(spec.id));
        }
        participants.push(spec);
    }

    Ok(SystemModel { name, participants })
}

fn bind_participant(node: Node<'_, '_>) -> Result<ParticipantSpec, BindError> {
    let instance = xml::require_child(node, "element_instance")?;
    Ok(ParticipantSpec {
        id: xml::require_text(instance, "id")?,
        timing_file_ref: file_reference(instance, "timing")?,
        input_mapping_ref: file_reference(instance, "input_mapping")?,
        output_mapping_ref: file_reference(instance, "output_mapping")?,
        init_priority: xml::require_int(node, "init_priority")?,
        start_priority: xml::require_int(node, "start_priority")?,
    })
}

/// `<name><file_reference>...</file_reference></name>`; the wrapper is
/// optional, the inner element is not.
fn file_reference(node: Node<'_, '_>, name: &str) -> Result<Option<String>, BindError> {
    xml::child(node, name)
        .map(|wrapper| xml::require_raw_text(wrapper, "file_reference"))
        .transpose()
}
