use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ServerError, ServerResult};

/// Which store root the server runs against.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
}

impl Environment {
    /// Environment variable that selects the environment.
    pub const VAR: &'static str = "FOLIO_ENV";

    /// Read [`Self::VAR`]. Only the exact value `test` selects [`Self::Test`].
    pub fn from_env() -> Self {
        match std::env::var(Self::VAR) {
            Ok(value) => Self::parse(&value),
            Err(_) => Self::Development,
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "test" => Self::Test,
            _ => Self::Development,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Store root for normal operation.
    pub data_root: PathBuf,
    /// Store root when running under [`Environment::Test`].
    pub test_data_root: PathBuf,
    /// TOML file of `username = "bcrypt hash"` entries under `[users]`.
    /// Without one nobody can sign in.
    pub credentials_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 4567)),
            data_root: PathBuf::from("data"),
            test_data_root: PathBuf::from("test/data"),
            credentials_path: None,
        }
    }
}

impl ServerConfig {
    /// Load a TOML config file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ServerError::Config(format!("cannot read {}: {e}", path.display())))?;
        toml::from_str(&text).map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }

    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// The store root for `env`.
    pub fn store_root(&self, env: Environment) -> &Path {
        match env {
            Environment::Development => &self.data_root,
            Environment::Test => &self.test_data_root,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:4567".parse::<SocketAddr>().unwrap());
        assert_eq!(c.data_root, PathBuf::from("data"));
        assert_eq!(c.test_data_root, PathBuf::from("test/data"));
        assert!(c.credentials_path.is_none());
    }

    #[test]
    fn environment_selects_root() {
        let c = ServerConfig::default();
        assert_eq!(c.store_root(Environment::Development), Path::new("data"));
        assert_eq!(c.store_root(Environment::Test), Path::new("test/data"));
    }

    #[test]
    fn environment_parse() {
        assert_eq!(Environment::parse("test"), Environment::Test);
        assert_eq!(Environment::parse("production"), Environment::Development);
        assert_eq!(Environment::parse(""), Environment::Development);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            r#"
            bind_addr = "0.0.0.0:8080"
            credentials_path = "users.toml"
            "#,
        )
        .unwrap();
        assert_eq!(c.bind_addr.port(), 8080);
        assert_eq!(c.credentials_path, Some(PathBuf::from("users.toml")));
        assert_eq!(c.data_root, PathBuf::from("data"));
    }

    #[test]
    fn bad_toml_is_config_error() {
        let err = ServerConfig::from_toml_str("bind_addr = 12").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        fs::write(&path, "data_root = \"/srv/docs\"\n").unwrap();
        let c = ServerConfig::load(&path).unwrap();
        assert_eq!(c.data_root, PathBuf::from("/srv/docs"));

        assert!(ServerConfig::load(dir.path().join("absent.toml")).is_err());
    }
}
