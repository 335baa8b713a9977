use std::{
    fs::{self, File},
    io::Write,
    path::PathBuf,
    time::Duration,
};

use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::{
    assets::{expand_path, get_config_dir, get_default_config},
    credential::{Credential, CredentialError, TokenStore},
    session::Identity,
};

pub const DEFAULT_ENDPOINT: &str =
    "https://kontentgpt-production-838d.up.railway.app/submit_with_type";

#[derive(Error, Debug)]
pub enum KontentConfigError {
    #[error("File system error: {0}")]
    IO(#[from] std::io::Error),
    #[error("YAML parsing error: {0}")]
    YAMLError(#[from] serde_yaml::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Remote generation endpoint settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointConfig {
    pub url: Url,
    /// Header carrying the credential token.
    pub token_header: String,
    /// Upper bound for a round trip, `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid url"),
            token_header: default_token_header(),
            timeout: None,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub endpoint: EndpointConfig,
    /// Credential override, takes precedence over the token store.
    pub credential: Option<String>,
    pub user: Identity,
}

impl Config {
    /// Resolves the credential for requests.
    ///
    /// A configured value wins, otherwise the token saved in `store` is used.
    pub fn resolve_credential(&self, store: &TokenStore) -> Result<Credential, CredentialError> {
        match &self.credential {
            Some(value) => Credential::from_config_value(value),
            None => store.credential(),
        }
    }
}

fn default_token_header() -> String {
    "token".to_string()
}

#[derive(Deserialize, Debug)]
struct RawConfig {
    endpoint: Option<RawEndpointConfig>,
    credential: Option<String>,
    user: Option<Identity>,
}

#[derive(Deserialize, Debug)]
struct RawEndpointConfig {
    url: Option<String>,
    #[serde(default = "default_token_header")]
    token_header: String,
    timeout_secs: Option<u64>,
}

impl RawConfig {
    #[instrument]
    fn to_config(&self) -> Result<Config, KontentConfigError> {
        let endpoint = match &self.endpoint {
            Some(raw) => {
                let url = raw.url.as_deref().unwrap_or(DEFAULT_ENDPOINT);
                let url = Url::parse(url).map_err(|e| {
                    KontentConfigError::Config(format!("Invalid endpoint url '{url}': {e}"))
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(KontentConfigError::Config(format!(
                        "Unsupported endpoint scheme '{}'",
                        url.scheme()
                    )));
                }
                if raw.token_header.trim().is_empty() {
                    return Err(KontentConfigError::Config(
                        "Token header must not be empty".to_string(),
                    ));
                }
                EndpointConfig {
                    url,
                    token_header: raw.token_header.clone(),
                    timeout: raw.timeout_secs.map(Duration::from_secs),
                }
            }
            None => EndpointConfig::default(),
        };

        Ok(Config {
            endpoint,
            credential: self.credential.clone(),
            user: self.user.clone().unwrap_or_default(),
        })
    }
}

#[instrument(skip(config_path))]
pub fn create_or_get_config_file(
    config_path: Option<PathBuf>,
) -> Result<(bool, PathBuf), KontentConfigError> {
    let actual_path = config_path.unwrap_or_else(|| get_config_dir().join("kontent.yml"));
    let actual_path = expand_path(&actual_path.to_string_lossy());

    let parent_dir = actual_path.parent().ok_or_else(|| {
        KontentConfigError::IO(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "Config path has no parent directory",
        ))
    })?;

    if !parent_dir.exists() {
        fs::create_dir_all(parent_dir)?;
    }

    if actual_path.exists() {
        Ok((true, actual_path))
    } else {
        File::create(&actual_path)?.write_all(get_default_config().as_bytes())?;
        Ok((false, actual_path))
    }
}

#[instrument(skip(config_path))]
pub fn get_config(config_path: Option<PathBuf>) -> Result<Config, KontentConfigError> {
    let (_, config_file) = create_or_get_config_file(config_path)?;
    let content = fs::read_to_string(&config_file)?;
    parse_config(&content)
}

fn parse_config(content: &str) -> Result<Config, KontentConfigError> {
    // An empty document deserializes to unit, not to an empty mapping.
    if content.trim().is_empty() {
        return RawConfig {
            endpoint: None,
            credential: None,
            user: None,
        }
        .to_config();
    }
    let raw: RawConfig = serde_yaml::from_str(content)?;
    raw.to_config()
}
