//! Document name validation.
//!
//! A valid document name is a single path component that stays directly
//! under the store root:
//! - Must be non-empty and at most [`MAX_NAME_LEN`] bytes
//! - Must not be `.` or `..`
//! - Must not contain `/`, `\`, or control characters (NUL included)
//! - Must not start with `.` (dot-files are reserved for in-flight writes)

use std::fmt;

use crate::document::DocumentKind;
use crate::error::{StoreError, StoreResult};

/// Longest accepted name, in bytes. Matches the common filesystem limit.
pub const MAX_NAME_LEN: usize = 255;

/// Characters that are forbidden anywhere in a document name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\'];

/// Validate a document name, returning `Ok(())` if it is a safe basename.
///
/// # Examples
///
/// ```
/// use folio_store::validate_document_name;
///
/// assert!(validate_document_name("about.md").is_ok());
/// assert!(validate_document_name("").is_err());
/// assert!(validate_document_name("../etc/passwd").is_err());
/// ```
pub fn validate_document_name(name: &str) -> StoreResult<()> {
    if name.is_empty() {
        return Err(StoreError::invalid_name(name, "a name is required"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(StoreError::invalid_name(
            name,
            format!("name is longer than {MAX_NAME_LEN} bytes"),
        ));
    }

    if name == "." || name == ".." {
        return Err(StoreError::invalid_name(name, "name must not be a directory reference"));
    }

    for ch in FORBIDDEN_CHARS {
        if name.contains(*ch) {
            return Err(StoreError::invalid_name(
                name,
                format!("contains forbidden character: {ch:?}"),
            ));
        }
    }

    if name.chars().any(char::is_control) {
        return Err(StoreError::invalid_name(name, "contains a control character"));
    }

    if name.starts_with('.') {
        return Err(StoreError::invalid_name(name, "must not start with '.'"));
    }

    Ok(())
}

/// A validated, filesystem-safe document name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentName(String);

impl DocumentName {
    /// Validate `name` and wrap it.
    pub fn parse(name: &str) -> StoreResult<Self> {
        validate_document_name(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind implied by this name's extension.
    pub fn kind(&self) -> StoreResult<DocumentKind> {
        DocumentKind::from_name(&self.0).ok_or_else(|| StoreError::UnsupportedKind {
            name: self.0.clone(),
        })
    }
}

impl fmt::Display for DocumentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
