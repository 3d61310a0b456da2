//! Document storage for Folio.
//!
//! A document is a named file directly under a configured store root. The
//! name determines the document's [`DocumentKind`]: `.txt` files are plain
//! text, `.md` files are markdown. Nothing else is persisted beyond the file
//! itself; every write fully replaces the previous content.
//!
//! # Storage Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`FsDocumentStore`] -- files under a directory on disk
//! - [`InMemoryDocumentStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Names are validated before any path is built ([`DocumentName`]).
//! 2. A name never resolves outside the store root, symlinks included.
//! 3. Writes are atomic: content lands in a temp file and is renamed into place.
//! 4. Mutations of the same name are serialized; different names proceed in parallel.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod document;
pub mod error;
pub mod fs;
pub mod memory;
pub mod names;
pub mod traits;

pub use document::{Document, DocumentKind};
pub use error::{StoreError, StoreResult};
pub use fs::FsDocumentStore;
pub use memory::InMemoryDocumentStore;
pub use names::{validate_document_name, DocumentName, MAX_NAME_LEN};
pub use traits::DocumentStore;
