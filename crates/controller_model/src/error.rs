//! Load and binding error types.

use std::fmt;
use std::path::PathBuf;

/// Which data model a file was being bound to when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// A system descriptor file.
    SystemDescriptor,
    /// A system property file.
    SystemProperties,
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemDescriptor => f.write_str("system data model"),
            Self::SystemProperties => f.write_str("system properties data model"),
        }
    }
}

/// Structural errors found while binding a parsed DOM to a data model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The document root is not the element the model expects.
    #[error("unexpected root element \"{found}\", expected \"{expected}\"")]
    UnexpectedRoot {
        /// The expected root element name.
        expected: &'static str,
        /// The root element name found in the document.
        found: String,
    },

    /// A required child element is absent.
    #[error("element \"{0}\" not found")]
    MissingElement(&'static str),

    /// A required element is present but carries no text.
    #[error("element \"{0}\" is empty")]
    EmptyElement(&'static str),

    /// An element that must hold an integer holds something else.
    #[error("element \"{element}\" has invalid integer value \"{value}\"")]
    InvalidInteger {
        /// The offending element.
        element: &'static str,
        /// The raw text found.
        value: String,
    },

    /// A property declares a type tag that is not recognised.
    #[error("element \"type\" has unknown property type \"{0}\"")]
    UnknownPropertyType(String),

    /// The same participant id is declared twice in one descriptor.
    #[error("duplicate participant \"{0}\"")]
    DuplicateParticipant(String),
}

/// Errors that can occur while loading a declarative file.
///
/// Every message embeds the offending file path.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The path does not reference an existing regular file.
    #[error("The file '{}' does not exist", path.display())]
    NotFound {
        /// The requested path.
        path: PathBuf,
    },

    /// The file exists but could not be read.
    #[error("unable to read file '{}' : {source}", path.display())]
    Read {
        /// The requested path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file is not well-formed markup.
    #[error("xml parse error for file '{}' : {detail}", path.display())]
    XmlParse {
        /// The requested path.
        path: PathBuf,
        /// The parser's diagnostic text.
        detail: String,
    },

    /// The markup is well-formed but does not match the data model.
    #[error("{kind} parse error for file '{}' : {source}", path.display())]
    Schema {
        /// The requested path.
        path: PathBuf,
        /// The model being bound.
        kind: ModelKind,
        /// The binder's diagnostic.
        source: BindError,
    },
}

impl LoadError {
    /// The file the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::NotFound { path }
            | Self::Read { path, .. }
            | Self::XmlParse { path, .. }
            | Self::Schema { path, .. } => path,
        }
    }
}
