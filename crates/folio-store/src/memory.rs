use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::names::validate_document_name;
use crate::traits::DocumentStore;

/// In-memory, `BTreeMap`-based document store.
///
/// Intended for tests and embedding. Names go through the same validation
/// as on disk, and listings come back sorted.
pub struct InMemoryDocumentStore {
    documents: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents currently stored.
    pub fn len(&self) -> usize {
        self.documents.read().expect("lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn list(&self) -> StoreResult<Vec<String>> {
        let map = self.documents.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }

    fn exists(&self, name: &str) -> bool {
        self.documents
            .read()
            .expect("lock poisoned")
            .contains_key(name)
    }

    fn read_bytes(&self, name: &str) -> StoreResult<Vec<u8>> {
        validate_document_name(name)?;
        let map = self.documents.read().expect("lock poisoned");
        map.get(name)
            .cloned()
            .ok_or_else(|| StoreError::not_found(name))
    }

    fn write(&self, name: &str, content: &[u8]) -> StoreResult<()> {
        validate_document_name(name)?;
        let mut map = self.documents.write().expect("lock poisoned");
        map.insert(name.to_string(), content.to_vec());
        Ok(())
    }

    fn update(&self, name: &str, content: &[u8]) -> StoreResult<()> {
        validate_document_name(name)?;
        let mut map = self.documents.write().expect("lock poisoned");
        match map.get_mut(name) {
            Some(existing) => {
                *existing = content.to_vec();
                Ok(())
            }
            None => Err(StoreError::not_found(name)),
        }
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        validate_document_name(name)?;
        let mut map = self.documents.write().expect("lock poisoned");
        map.remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(name))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &self.len())
            .finish()
    }
}
