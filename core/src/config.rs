//! Suite settings: target URL and the valid/invalid credential pairs.
//!
//! Values come from `PETFRIENDS_*` environment variables, or from a YAML
//! file when `PETFRIENDS_SETTINGS` names one:
//!
//! ```yaml
//! base_url: https://petfriends.skillfactory.ru
//! valid_email: me@example.com
//! valid_password: secret
//! invalid_password: wrong
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::client::DEFAULT_BASE_URL;
use crate::error::ConfigError;
use crate::types::Credentials;

pub const SETTINGS_PATH_VAR: &str = "PETFRIENDS_SETTINGS";
pub const BASE_URL_VAR: &str = "PETFRIENDS_BASE_URL";
pub const VALID_EMAIL_VAR: &str = "PETFRIENDS_VALID_EMAIL";
pub const VALID_PASSWORD_VAR: &str = "PETFRIENDS_VALID_PASSWORD";
pub const INVALID_EMAIL_VAR: &str = "PETFRIENDS_INVALID_EMAIL";
pub const INVALID_PASSWORD_VAR: &str = "PETFRIENDS_INVALID_PASSWORD";

const DEFAULT_INVALID_PASSWORD: &str = "not-the-password";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub base_url: String,
    pub valid: Credentials,
    /// Same account with a wrong password, unless overridden.
    pub invalid: Credentials,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSettings {
    base_url: Option<String>,
    valid_email: String,
    valid_password: String,
    invalid_email: Option<String>,
    invalid_password: Option<String>,
}

impl RawSettings {
    fn resolve(self) -> Settings {
        let invalid_email = self.invalid_email.unwrap_or_else(|| self.valid_email.clone());
        let invalid_password = self
            .invalid_password
            .unwrap_or_else(|| DEFAULT_INVALID_PASSWORD.to_string());
        Settings {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            valid: Credentials::new(self.valid_email, self.valid_password),
            invalid: Credentials::new(invalid_email, invalid_password),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(path) = lookup(SETTINGS_PATH_VAR) {
            return Self::load(path);
        }
        let required = |name: &str| lookup(name).ok_or_else(|| ConfigError::Missing(name.to_string()));
        let raw = RawSettings {
            base_url: lookup(BASE_URL_VAR),
            valid_email: required(VALID_EMAIL_VAR)?,
            valid_password: required(VALID_PASSWORD_VAR)?,
            invalid_email: lookup(INVALID_EMAIL_VAR),
            invalid_password: lookup(INVALID_PASSWORD_VAR),
        };
        Ok(raw.resolve())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let raw: RawSettings = serde_yaml::from_str(yaml)?;
        Ok(raw.resolve())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }
}
