//! DOM loading and structural binding helpers.
//!
//! Loading a declarative file is two fallible steps: markup parsing
//! (delegated to `roxmltree`) and binding the DOM to a model. [`load`]
//! sequences them and attaches the file path to whichever one fails.
//!
//! Elements are matched by local name, so namespace-prefixed documents bind
//! the same way as unprefixed ones.

use std::path::Path;

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::{BindError, LoadError, ModelKind};

/// Failure of [`parse_str`]: either the markup or the binding was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The markup is not well-formed. Carries the parser diagnostic.
    Markup(String),
    /// The markup does not match the data model.
    Bind(BindError),
}

/// Parse `text` and bind its root element with `bind`.
///
/// # Errors
///
/// Returns [`DocumentError::Markup`] if `text` is not well-formed and
/// [`DocumentError::Bind`] if `bind` rejects the document.
pub fn parse_str<T>(
    text: &str,
    bind: impl FnOnce(Node<'_, '_>) -> Result<T, BindError>,
) -> Result<T, DocumentError> {
    let document = Document::parse(text).map_err(|e| DocumentError::Markup(markup_detail(&e)))?;
    bind(document.root_element()).map_err(DocumentError::Bind)
}

/// Read the file at `path`, parse it, and bind it as `kind`.
///
/// # Errors
///
/// - [`LoadError::NotFound`] if `path` is not an existing regular file.
/// - [`LoadError::Read`] if the file cannot be read.
/// - [`LoadError::XmlParse`] if the markup is malformed (including invalid UTF-8).
/// - [`LoadError::Schema`] if binding fails.
pub fn load<T>(
    path: &Path,
    kind: ModelKind,
    bind: impl FnOnce(Node<'_, '_>) -> Result<T, BindError>,
) -> Result<T, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = std::fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|e| LoadError::XmlParse {
        path: path.to_path_buf(),
        detail: format!("invalid UTF-8: {e}"),
    })?;
    debug!(file = %path.display(), %kind, bytes = text.len(), "parsing file");

    parse_str(&text, bind).map_err(|e| match e {
        DocumentError::Markup(detail) => LoadError::XmlParse {
            path: path.to_path_buf(),
            detail,
        },
        DocumentError::Bind(source) => LoadError::Schema {
            path: path.to_path_buf(),
            kind,
            source,
        },
    })
}

/// Parser diagnostics. Unbalanced tags get a stable leading phrase so callers
/// can recognise them independently of the parser's wording.
fn markup_detail(err: &roxmltree::Error) -> String {
    match err {
        roxmltree::Error::UnexpectedCloseTag(..) => format!("Start-end tags mismatch: {err}"),
        _ => err.to_string(),
    }
}

// ── Binding helpers ─────────────────────────────────────────────────────────

/// Check that `node` is the element `expected`.
pub fn expect_root(node: Node<'_, '_>, expected: &'static str) -> Result<(), BindError> {
    let found = node.tag_name().name();
    if found == expected {
        Ok(())
    } else {
        Err(BindError::UnexpectedRoot {
            expected,
            found: found.to_string(),
        })
    }
}

/// The first child element of `node` named `name`.
#[must_use]
pub fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    children(node, name).next()
}

/// All child elements of `node` named `name`, in document order.
pub fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

/// The first child element named `name`, or [`BindError::MissingElement`].
pub fn require_child<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> Result<Node<'a, 'input>, BindError> {
    child(node, name).ok_or(BindError::MissingElement(name))
}

/// The concatenated text content of an element, untrimmed.
#[must_use]
pub fn text(node: Node<'_, '_>) -> String {
    node.children()
        .filter(Node::is_text)
        .filter_map(|n| n.text())
        .collect()
}

/// The raw text of the required child `name`. May be empty.
pub fn require_raw_text(node: Node<'_, '_>, name: &'static str) -> Result<String, BindError> {
    require_child(node, name).map(text)
}

/// The trimmed, non-empty text of the required child `name`.
pub fn require_text(node: Node<'_, '_>, name: &'static str) -> Result<String, BindError> {
    let value = require_raw_text(node, name)?.trim().to_string();
    if value.is_empty() {
        return Err(BindError::EmptyElement(name));
    }
    Ok(value)
}

/// The required child `name` parsed as an integer.
pub fn require_int(node: Node<'_, '_>, name: &'static str) -> Result<i32, BindError> {
    let value = require_text(node, name)?;
    value
        .parse()
        .map_err(|_| BindError::InvalidInteger {
            element: name,
            value,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bind_answer(node: Node<'_, '_>) -> Result<i32, BindError> {
        expect_root(node, "doc")?;
        require_int(node, "answer")
    }

    #[test]
    fn test_parse_and_bind() {
        let value = parse_str("<doc><answer> 42 </answer></doc>", bind_answer).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_namespaced_elements_match_by_local_name() {
        let xml = r#"<x:doc xmlns:x="urn:test"><x:answer>7</x:answer></x:doc>"#;
        assert_eq!(parse_str(xml, bind_answer).unwrap(), 7);
    }

    #[test]
    fn test_mismatched_tags_reported_as_markup() {
        let err = parse_str("<doc><answer>1</doc>", bind_answer).unwrap_err();
        match err {
            DocumentError::Markup(detail) => {
                assert!(detail.contains("Start-end tags mismatch"), "{detail}");
            }
            DocumentError::Bind(e) => panic!("expected markup error, got {e}"),
        }
    }

    #[test]
    fn test_missing_element() {
        let err = parse_str("<doc/>", bind_answer).unwrap_err();
        assert_eq!(err, DocumentError::Bind(BindError::MissingElement("answer")));
    }

    #[test]
    fn test_wrong_root() {
        let err = parse_str("<other/>", bind_answer).unwrap_err();
        assert_eq!(
            err,
            DocumentError::Bind(BindError::UnexpectedRoot {
                expected: "doc",
                found: "other".to_string(),
            })
        );
    }

    #[test]
    fn test_invalid_integer() {
        let err = parse_str("<doc><answer>many</answer></doc>", bind_answer).unwrap_err();
        assert_eq!(
            err,
            DocumentError::Bind(BindError::InvalidInteger {
                element: "answer",
                value: "many".to_string(),
            })
        );
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(
            Path::new("file_does_not_exist"),
            ModelKind::SystemDescriptor,
            bind_answer,
        )
        .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("file_does_not_exist"));
        assert!(msg.contains("does not exist"));
    }

    #[test]
    fn test_load_wraps_parse_error_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("xml_parse_error.fep_sdk_system");
        std::fs::write(&file, "<doc><answer>1</answer></dok>").unwrap();

        let err = load(&file, ModelKind::SystemDescriptor, bind_answer).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("xml_parse_error.fep_sdk_system"));
        assert!(msg.contains("xml parse error"));
        assert!(msg.contains("Start-end tags mismatch"));
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path(), ModelKind::SystemProperties, bind_answer).unwrap_err();
        assert!(matches!(err, LoadError::NotFound { .. }));
    }
}
