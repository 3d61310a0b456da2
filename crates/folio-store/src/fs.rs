use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::names::DocumentName;
use crate::traits::DocumentStore;

/// Prefix for in-flight temp files. Dot-files are never valid document
/// names, so these never show up in listings.
const TEMP_PREFIX: &str = ".folio-";

/// Document store backed by a directory on disk.
///
/// Each document is a regular file directly under `root`. Writes go through
/// a temp file in the same directory followed by an atomic rename.
pub struct FsDocumentStore {
    root: PathBuf,
    locks: NameLocks,
}

impl FsDocumentStore {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        info!(root = %root.display(), "opened document store");
        Ok(Self {
            root,
            locks: NameLocks::default(),
        })
    }

    /// The canonical store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a name to its path under the root.
    ///
    /// The name is validated first, so the joined path is always a direct
    /// child of the root. An existing symlink must also resolve to a
    /// location inside the root.
    fn resolve(&self, name: &str) -> StoreResult<PathBuf> {
        let name = DocumentName::parse(name)?;
        let path = self.root.join(name.as_str());

        match fs::symlink_metadata(&path) {
            Ok(meta) if meta.file_type().is_symlink() => {
                let target = path
                    .canonicalize()
                    .map_err(|_| StoreError::invalid_name(name.as_str(), "dangling symbolic link"))?;
                if !target.starts_with(&self.root) {
                    return Err(StoreError::invalid_name(
                        name.as_str(),
                        "resolves outside the store root",
                    ));
                }
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        debug!(name = %name, path = %path.display(), "resolved document path");
        Ok(path)
    }

    fn write_atomic(&self, path: &Path, content: &[u8]) -> StoreResult<()> {
        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(&self.root)?;
        tmp.write_all(content)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl DocumentStore for FsDocumentStore {
    fn list(&self) -> StoreResult<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            // Same checks as a lookup, so every listed name can be read back.
            if self.resolve(&name).is_ok_and(|path| path.is_file()) {
                names.push(name);
            }
        }
        Ok(names)
    }

    fn exists(&self, name: &str) -> bool {
        self.resolve(name).map(|path| path.is_file()).unwrap_or(false)
    }

    fn read_bytes(&self, name: &str) -> StoreResult<Vec<u8>> {
        let path = self.resolve(name)?;
        if !path.is_file() {
            return Err(StoreError::not_found(name));
        }
        fs::read(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::not_found(name),
            _ => StoreError::Io(e),
        })
    }

    fn write(&self, name: &str, content: &[u8]) -> StoreResult<()> {
        let path = self.resolve(name)?;
        let lock = self.locks.lock_for(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.write_atomic(&path, content)?;
        info!(name, bytes = content.len(), "wrote document");
        Ok(())
    }

    fn update(&self, name: &str, content: &[u8]) -> StoreResult<()> {
        let path = self.resolve(name)?;
        let lock = self.locks.lock_for(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !path.is_file() {
            return Err(StoreError::not_found(name));
        }
        self.write_atomic(&path, content)?;
        info!(name, bytes = content.len(), "updated document");
        Ok(())
    }

    fn delete(&self, name: &str) -> StoreResult<()> {
        let path = self.resolve(name)?;
        let lock = self.locks.lock_for(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if !path.is_file() {
            return Err(StoreError::not_found(name));
        }
        fs::remove_file(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => StoreError::not_found(name),
            _ => StoreError::Io(e),
        })?;
        info!(name, "deleted document");
        Ok(())
    }
}

impl std::fmt::Debug for FsDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsDocumentStore")
            .field("root", &self.root)
            .finish()
    }
}

/// One mutex per document name, so that mutations of the same name are
/// serialized while different names proceed in parallel.
#[derive(Default)]
struct NameLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl NameLocks {
    fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        let mut map = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(map.entry(name.to_string()).or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentKind;
    use proptest::prelude::*;

    fn open_temp() -> (tempfile::TempDir, FsDocumentStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsDocumentStore::open(dir.path()).unwrap();
        (dir, store)
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = open_temp();
        store.write("history.txt", b"2015 - Ruby 2.3 released.").unwrap();

        let doc = store.read("history.txt").unwrap();
        assert_eq!(doc.content, b"2015 - Ruby 2.3 released.");
        assert_eq!(doc.kind, DocumentKind::Text);
        assert_eq!(doc.name, "history.txt");
    }

    #[test]
    fn markdown_kind_is_inferred() {
        let (_dir, store) = open_temp();
        store.write("about.md", b"# Title").unwrap();
        assert_eq!(store.read("about.md").unwrap().kind, DocumentKind::Markdown);
    }

    #[test]
    fn write_replaces_content_fully() {
        let (_dir, store) = open_temp();
        store.write("changes.txt", b"a much longer original body").unwrap();
        store.write("changes.txt", b"short").unwrap();
        assert_eq!(store.read_bytes("changes.txt").unwrap(), b"short");
    }

    #[test]
    fn create_defaults_to_empty_and_replaces() {
        let (_dir, store) = open_temp();
        store.create("new_doc.txt", b"").unwrap();
        assert!(store.exists("new_doc.txt"));
        assert!(store.read_bytes("new_doc.txt").unwrap().is_empty());

        store.write("new_doc.txt", b"content").unwrap();
        store.create("new_doc.txt", b"").unwrap();
        assert!(store.read_bytes("new_doc.txt").unwrap().is_empty());
    }

    #[test]
    fn create_empty_name_is_invalid() {
        let (_dir, store) = open_temp();
        assert!(matches!(
            store.create("", b""),
            Err(StoreError::InvalidName { .. })
        ));
        store.write("a.txt", b"x").unwrap();
        assert!(matches!(
            store.create("", b"x"),
            Err(StoreError::InvalidName { .. })
        ));
    }

    #[test]
    fn update_requires_existing_document() {
        let (_dir, store) = open_temp();
        assert!(store.update("missing.txt", b"x").unwrap_err().is_not_found());
        assert!(!store.exists("missing.txt"));

        store.write("present.txt", b"old").unwrap();
        store.update("present.txt", b"new").unwrap();
        assert_eq!(store.read_bytes("present.txt").unwrap(), b"new");
    }

    #[test]
    fn delete_removes_document() {
        let (_dir, store) = open_temp();
        store.write("new_doc.txt", b"").unwrap();
        store.delete("new_doc.txt").unwrap();

        assert!(!store.exists("new_doc.txt"));
        assert!(store.read("new_doc.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn delete_missing_is_not_found() {
        let (_dir, store) = open_temp();
        assert!(store.delete("missing.txt").unwrap_err().is_not_found());
    }

    #[test]
    fn read_missing_is_not_found_even_for_unknown_kind() {
        let (_dir, store) = open_temp();
        assert!(store.read("notafile.ext").unwrap_err().is_not_found());
    }

    #[test]
    fn read_unknown_kind_is_unsupported() {
        let (_dir, store) = open_temp();
        store.write("image.png", b"\x89PNG").unwrap();
        assert!(matches!(
            store.read("image.png"),
            Err(StoreError::UnsupportedKind { .. })
        ));
        assert_eq!(store.read_bytes("image.png").unwrap(), b"\x89PNG");
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[test]
    fn list_returns_regular_files_only() {
        let (dir, store) = open_temp();
        store.write("about.md", b"").unwrap();
        store.write("changes.txt", b"").unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join(".hidden"), b"").unwrap();

        let mut names = store.list().unwrap();
        names.sort();
        assert_eq!(names, vec!["about.md", "changes.txt"]);
    }

    #[test]
    fn list_empty_store() {
        let (_dir, store) = open_temp();
        assert!(store.list().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn list_skips_names_that_cannot_be_read_back() {
        let (dir, store) = open_temp();
        store.write("kept.txt", b"").unwrap();
        fs::write(dir.path().join("back\\slash.txt"), b"").unwrap();

        assert_eq!(store.list().unwrap(), vec!["kept.txt"]);
    }

    #[cfg(unix)]
    #[test]
    fn list_skips_symlinks_escaping_root() {
        let (dir, store) = open_temp();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("s.txt"), b"secret").unwrap();
        std::os::unix::fs::symlink(outside.path().join("s.txt"), dir.path().join("link.txt"))
            .unwrap();
        store.write("real.txt", b"").unwrap();

        let names = store.list().unwrap();
        assert_eq!(names, vec!["real.txt"]);
        for name in &names {
            assert!(store.exists(name));
        }
    }

    #[test]
    fn directories_are_not_documents() {
        let (dir, store) = open_temp();
        fs::create_dir(dir.path().join("folder.md")).unwrap();
        assert!(!store.exists("folder.md"));
        assert!(store.read("folder.md").unwrap_err().is_not_found());
    }

    // -----------------------------------------------------------------------
    // Path containment
    // -----------------------------------------------------------------------

    #[test]
    fn traversal_names_are_rejected() {
        let (dir, store) = open_temp();
        let outside = dir.path().parent().unwrap().join("escaped.txt");

        for name in ["../escaped.txt", "..", "sub/../../escaped.txt", "/tmp/escaped.txt"] {
            assert!(
                matches!(store.write(name, b"x"), Err(StoreError::InvalidName { .. })),
                "{name} should be rejected"
            );
            assert!(!store.exists(name));
            assert!(matches!(
                store.read(name),
                Err(StoreError::InvalidName { .. })
            ));
            assert!(matches!(
                store.delete(name),
                Err(StoreError::InvalidName { .. })
            ));
        }
        assert!(!outside.exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escaping_root_is_rejected() {
        let (dir, store) = open_temp();
        let outside = tempfile::tempdir().unwrap();
        let secret = outside.path().join("secret.txt");
        fs::write(&secret, b"top secret").unwrap();
        std::os::unix::fs::symlink(&secret, dir.path().join("link.txt")).unwrap();

        assert!(matches!(
            store.read("link.txt"),
            Err(StoreError::InvalidName { .. })
        ));
        assert!(matches!(
            store.write("link.txt", b"overwrite"),
            Err(StoreError::InvalidName { .. })
        ));
        assert_eq!(fs::read(&secret).unwrap(), b"top secret");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_root_is_followed() {
        let (dir, store) = open_temp();
        store.write("real.txt", b"inside").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("alias.txt"))
            .unwrap();
        assert_eq!(store.read_bytes("alias.txt").unwrap(), b"inside");
    }

    // -----------------------------------------------------------------------
    // Concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_writers_leave_one_complete_version() {
        let (_dir, store) = open_temp();
        let store = Arc::new(store);
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let body = vec![b'a' + i; 4096];
                    store.write("race.txt", &body).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let content = store.read_bytes("race.txt").unwrap();
        assert_eq!(content.len(), 4096);
        assert!(content.iter().all(|b| *b == content[0]));
        assert_eq!(store.list().unwrap(), vec!["race.txt"]);
    }

    #[test]
    fn open_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("data");
        let store = FsDocumentStore::open(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(store.root(), root.canonicalize().unwrap());
    }

    // -----------------------------------------------------------------------
    // Properties
    // -----------------------------------------------------------------------

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn any_content_round_trips(
            stem in "[a-zA-Z0-9_-]{1,24}",
            markdown in any::<bool>(),
            content in proptest::collection::vec(any::<u8>(), 0..512),
        ) {
            let (_dir, store) = open_temp();
            let (name, kind) = if markdown {
                (format!("{stem}.md"), DocumentKind::Markdown)
            } else {
                (format!("{stem}.txt"), DocumentKind::Text)
            };

            store.write(&name, &content).unwrap();
            let doc = store.read(&name).unwrap();
            prop_assert_eq!(doc.content, content);
            prop_assert_eq!(doc.kind, kind);
            prop_assert_eq!(store.list().unwrap(), vec![name]);
        }

        #[test]
        fn deleted_documents_are_gone(
            stem in "[a-zA-Z0-9_-]{1,24}",
            content in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let (_dir, store) = open_temp();
            let name = format!("{stem}.txt");
            store.write(&name, &content).unwrap();
            store.delete(&name).unwrap();

            prop_assert!(!store.exists(&name));
            prop_assert!(store.read(&name).unwrap_err().is_not_found());
        }
    }
}
