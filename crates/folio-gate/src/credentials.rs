use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use folio_crypto::PasswordHasher;
use serde::Deserialize;
use tracing::info;

use crate::error::{GateError, GateResult};

/// Read-only mapping of username to bcrypt password hash.
///
/// Loaded from a TOML file with a single `[users]` table:
///
/// ```toml
/// [users]
/// admin = "$2b$12$..."
/// ```
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    users: BTreeMap<String, String>,
    /// Hash checked for unknown usernames, built lazily at the cost the
    /// stored hashes use.
    #[serde(skip)]
    dummy_hash: OnceLock<Option<String>>,
}

impl Credentials {
    /// An empty credential set. Nobody can sign in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse credentials from TOML text.
    pub fn from_toml_str(text: &str) -> GateResult<Self> {
        toml::from_str(text).map_err(|e| GateError::CredentialsParse {
            path: "<inline>".into(),
            reason: e.to_string(),
        })
    }

    /// Load credentials from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> GateResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let credentials: Self = toml::from_str(&text).map_err(|e| GateError::CredentialsParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        info!(path = %path.display(), users = credentials.len(), "loaded credentials");
        Ok(credentials)
    }

    /// Add or replace a user. Builder-style, for tests and embedding.
    pub fn with_user(mut self, username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        self.users.insert(username.into(), password_hash.into());
        self.dummy_hash = OnceLock::new();
        self
    }

    /// A throwaway hash whose cost matches the first well-formed stored
    /// hash, or bcrypt's default when there is none.
    pub(crate) fn dummy_hash(&self) -> Option<&str> {
        self.dummy_hash
            .get_or_init(|| {
                let hasher = self
                    .users
                    .values()
                    .find_map(|hash| PasswordHasher::for_hash(hash).ok())
                    .unwrap_or(PasswordHasher::DEFAULT);
                hasher.hash("folio-timing-equalizer").ok()
            })
            .as_deref()
    }

    /// The stored hash for `username`.
    pub fn password_hash(&self, username: &str) -> Option<&str> {
        self.users.get(username).map(String::as_str)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("users", &self.users.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_users_table() {
        let creds = Credentials::from_toml_str(
            r#"
            [users]
            admin = "$2b$04$abc"
            editor = "$2b$04$def"
            "#,
        )
        .unwrap();
        assert_eq!(creds.len(), 2);
        assert_eq!(creds.password_hash("admin"), Some("$2b$04$abc"));
        assert!(creds.password_hash("nobody").is_none());
        assert_eq!(creds.usernames().collect::<Vec<_>>(), vec!["admin", "editor"]);
    }

    #[test]
    fn missing_table_is_empty() {
        let creds = Credentials::from_toml_str("").unwrap();
        assert!(creds.is_empty());
    }

    #[test]
    fn wrong_shape_is_rejected() {
        let err = Credentials::from_toml_str("users = 3").unwrap_err();
        assert!(matches!(err, GateError::CredentialsParse { .. }));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.toml");
        fs::write(&path, "[users]\nadmin = \"hash\"\n").unwrap();

        let creds = Credentials::load(&path).unwrap();
        assert_eq!(creds.password_hash("admin"), Some("hash"));
    }

    #[test]
    fn dummy_hash_matches_stored_cost() {
        let creds = Credentials::new()
            .with_user("admin", "not a bcrypt hash")
            .with_user("editor", PasswordHasher::FAST.hash("pw").unwrap());
        let dummy = creds.dummy_hash().unwrap();
        assert_eq!(PasswordHasher::for_hash(dummy).unwrap().cost(), 4);
        assert_eq!(PasswordHasher::verify("pw", dummy), Ok(false));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Credentials::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, GateError::Io(_)));
    }

    #[test]
    fn debug_hides_hashes() {
        let creds = Credentials::new().with_user("admin", "$2b$04$secrethash");
        let shown = format!("{creds:?}");
        assert!(shown.contains("admin"));
        assert!(!shown.contains("secrethash"));
    }
}
