//! Credentials and the local token store.
use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::assets::get_data_dir;

/// Key under which the session token is kept in the token store.
pub const TOKEN_KEY: &str = "jwtToken";

const STORE_FILE: &str = "storage.json";

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Token store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("Environment variable {0} not found")]
    MissingEnv(String),
}

/// Opaque token proving the user's identity to the remote service.
///
/// An absent token is a valid credential; the remote side rejects it.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(Option<String>);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Some(token.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }

    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Resolves a configured credential value.
    ///
    /// Values of the form `env:NAME` are read from the environment.
    pub fn from_config_value(value: &str) -> Result<Self, CredentialError> {
        if let Some(env_key) = value.strip_prefix("env:") {
            let env_key = env_key.trim();
            let token = std::env::var(env_key)
                .map_err(|_| CredentialError::MissingEnv(env_key.to_string()))?;
            Ok(Self::new(token))
        } else {
            Ok(Self::new(value))
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(_) => f.write_str("Credential(***)"),
            None => f.write_str("Credential(None)"),
        }
    }
}

/// Small persistent key/value store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Opens the store in the application data directory.
    pub fn open_default() -> Result<Self, CredentialError> {
        Ok(Self::new(get_data_dir()?.join(STORE_FILE)))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, CredentialError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Only the owner may read the token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            options.mode(0o600);
            if self.path.exists() {
                fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
            }
        }
        let mut file = options.open(&self.path)?;
        file.write_all(serde_json::to_string_pretty(entries)?.as_bytes())?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, CredentialError> {
        Ok(self.read_all()?.remove(key))
    }

    #[instrument(skip(self, value))]
    pub fn set(&self, key: &str, value: &str) -> Result<(), CredentialError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)?;
        debug!(path = ?self.path, "Stored value");
        Ok(())
    }

    /// Removes `key`, returning whether it was present.
    #[instrument(skip(self))]
    pub fn remove(&self, key: &str) -> Result<bool, CredentialError> {
        let mut entries = self.read_all()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.write_all(&entries)?;
        }
        Ok(removed)
    }

    /// Reads the session credential, passing absence through.
    pub fn credential(&self) -> Result<Credential, CredentialError> {
        Ok(Credential(self.get(TOKEN_KEY)?))
    }
}
