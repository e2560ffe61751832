//! Property file model and loader.
//!
//! A property file carries three blocks: properties written into every
//! participant's `/system` node, per-participant property lists, and a
//! key/value table describing the desired timing configuration.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use roxmltree::Node;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{BindError, LoadError, ModelKind};
use crate::xml;

/// Value type tag of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    /// `true` / `false`.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point.
    Double,
    /// Arbitrary text.
    String,
}

impl PropertyType {
    /// The canonical type tag.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Double => "double",
            Self::String => "string",
        }
    }

    /// Returns `true` if `value` is a valid textual value of this type.
    #[must_use]
    pub fn accepts(self, value: &str) -> bool {
        match self {
            Self::Bool => matches!(value, "true" | "false"),
            Self::Int => value.parse::<i64>().is_ok(),
            Self::Double => value.parse::<f64>().is_ok(),
            Self::String => true,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = BindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bool" | "boolean" => Ok(Self::Bool),
            "int" | "integer" | "int32" | "int64" => Ok(Self::Int),
            "double" | "float" => Ok(Self::Double),
            "string" => Ok(Self::String),
            other => Err(BindError::UnknownPropertyType(other.to_string())),
        }
    }
}

/// A single `{name, value, type}` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Slash-delimited property path, stored exactly as declared. The leading
    /// slash is optional.
    pub name: String,
    /// Textual value.
    pub value: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub property_type: PropertyType,
}

impl Property {
    /// Create a property.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        property_type: PropertyType,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            property_type,
        }
    }
}

/// Properties addressed to one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementProperties {
    /// The participant id.
    pub participant_id: String,
    /// Properties in declaration order.
    pub properties: Vec<Property>,
}

/// Contents of a property file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyModel {
    /// Written into each participant's `/system` node.
    pub system_properties: Vec<Property>,
    /// Per-participant blocks in declaration order. Ids may repeat.
    pub element_properties: Vec<ElementProperties>,
    /// Timing configuration table.
    pub timing_properties: Vec<Property>,
}

impl PropertyModel {
    /// The properties addressed to `participant_id`.
    ///
    /// Blocks are scanned in declaration order and the first block with a
    /// matching id wins; later blocks for the same id are ignored.
    #[must_use]
    pub fn properties_for(&self, participant_id: &str) -> Option<&[Property]> {
        self.element_properties
            .iter()
            .find(|block| block.participant_id == participant_id)
            .map(|block| block.properties.as_slice())
    }

    /// Participant blocks shadowed by an earlier block with the same id.
    pub fn shadowed_blocks(&self) -> impl Iterator<Item = &ElementProperties> {
        self.element_properties.iter().enumerate().filter_map(move |(i, block)| {
            self.element_properties[..i]
                .iter()
                .any(|earlier| earlier.participant_id == block.participant_id)
                .then_some(block)
        })
    }
}

/// Load and bind a property file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file does not exist, is not well-formed, or
/// does not describe system properties.
pub fn load_property_file(path: impl AsRef<Path>) -> Result<PropertyModel, LoadError> {
    let path = path.as_ref();
    let model = xml::load(path, ModelKind::SystemProperties, bind_property_file)?;
    info!(
        file = %path.display(),
        system_properties = model.system_properties.len(),
        participant_blocks = model.element_properties.len(),
        timing_properties = model.timing_properties.len(),
        "loaded property file"
    );
    Ok(model)
}

/// Bind a `<system_properties>` root element.
pub fn bind_property_file(root: Node<'_, '_>) -> Result<PropertyModel, BindError> {
    xml::expect_root(root, "system_properties")?;

    let system_properties = match xml::child(root, "system") {
        Some(system) => bind_property_list(system, true)?,
        None => Vec::new(),
    };

    let mut element_properties = Vec::new();
    if let Some(list) = xml::child(root, "participants") {
        for node in xml::children(list, "participant") {
            element_properties.push(ElementProperties {
                participant_id: xml::require_text(node, "id")?,
                properties: bind_property_list(node, true)?,
            });
        }
    }

    let timing_properties = match xml::child(root, "timing") {
        Some(timing) => bind_property_list(timing, false)?,
        None => Vec::new(),
    };

    Ok(PropertyModel {
        system_properties,
        element_properties,
        timing_properties,
    })
}

/// Bind `<properties><property>...</property></properties>` below `node`.
fn bind_property_list(node: Node<'_, '_>, type_required: bool) -> Result<Vec<Property>, BindError> {
    let list = xml::require_child(node, "properties")?;
    xml::children(list, "property")
        .map(|p| bind_property(p, type_required))
        .collect()
}

fn bind_property(node: Node<'_, '_>, type_required: bool) -> Result<Property, BindError> {
    let name = xml::require_text(node, "name")?;
    let value = xml::require_raw_text(node, "value")?;
    let property_type = match xml::child(node, "type") {
        Some(tag) => xml::text(tag).trim().parse()?,
        None if type_required => return Err(BindError::MissingElement("type")),
        None => PropertyType::String,
    };
    Ok(Property {
        name,
        value,
        property_type,
    })
}
