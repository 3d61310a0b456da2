use crate::document::Document;
use crate::error::StoreResult;
use crate::names::{validate_document_name, DocumentName};

/// A flat collection of named documents.
///
/// All implementations must satisfy these invariants:
/// - Every name is validated before use; unsafe names fail with
///   [`StoreError::InvalidName`] and are never reported as present.
/// - A name never resolves outside the store.
/// - Each write fully replaces prior content. There is no versioning.
/// - Concurrent writers to one name race with last-write-wins semantics,
///   but a reader never observes a partially written document.
pub trait DocumentStore: Send + Sync {
    /// Names of all documents, in backend enumeration order.
    ///
    /// The order is not stable across backends or platforms. Callers that
    /// display a listing sort it themselves.
    fn list(&self) -> StoreResult<Vec<String>>;

    /// Whether a document named `name` exists.
    fn exists(&self, name: &str) -> bool;

    /// Raw content of `name`, whatever its kind.
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    fn read_bytes(&self, name: &str) -> StoreResult<Vec<u8>>;

    /// Create or replace `name` with `content`.
    fn write(&self, name: &str, content: &[u8]) -> StoreResult<()>;

    /// Replace the content of an existing document.
    ///
    /// Returns [`StoreError::NotFound`] if the document does not exist.
    fn update(&self, name: &str, content: &[u8]) -> StoreResult<()>;

    /// Delete `name`. Returns [`StoreError::NotFound`] if it does not exist.
    fn delete(&self, name: &str) -> StoreResult<()>;

    /// Read a document along with the kind inferred from its name.
    ///
    /// Existence is checked before kind, so a missing `notes.pdf` reports
    /// [`StoreError::NotFound`] rather than [`StoreError::UnsupportedKind`].
    fn read(&self, name: &str) -> StoreResult<Document> {
        let content = self.read_bytes(name)?;
        let kind = DocumentName::parse(name)?.kind()?;
        Ok(Document {
            name: name.to_string(),
            content,
            kind,
        })
    }

    /// Create a new document. An existing document of the same name is
    /// replaced.
    ///
    /// Returns [`StoreError::InvalidName`] if `name` is empty, regardless of
    /// what the store holds.
    fn create(&self, name: &str, content: &[u8]) -> StoreResult<()> {
        validate_document_name(name)?;
        self.write(name, content)
    }
}
