//! Configuration loading and management
//!
//! Handles parsing of `.kb.toml` configuration files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Mail relay configuration
    #[serde(default)]
    pub mail: MailConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

/// Remote key-value store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the key-value endpoint
    #[serde(default = "default_store_url")]
    pub url: String,

    /// Access token sent with every request
    #[serde(default)]
    pub token: String,

    /// Storage key for the users collection
    #[serde(default = "default_users_key")]
    pub users_key: String,

    /// Storage key for the tasks collection
    #[serde(default = "default_tasks_key")]
    pub tasks_key: String,

    /// Storage key for the contacts collection
    #[serde(default = "default_contacts_key")]
    pub contacts_key: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_store_url() -> String {
    "https://remote-storage.developerakademie.org/item".to_string()
}

fn default_users_key() -> String {
    "users".to_string()
}

fn default_tasks_key() -> String {
    "tasks".to_string()
}

fn default_contacts_key() -> String {
    "contacts".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: default_store_url(),
            token: String::new(),
            users_key: default_users_key(),
            tasks_key: default_tasks_key(),
            contacts_key: default_contacts_key(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Mail relay configuration for password-reset notices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// URL of the relay endpoint accepting an `email` form field
    #[serde(default = "default_mail_url")]
    pub relay_url: String,
}

fn default_mail_url() -> String {
    "http://gruppe-671.developerakademie.net/join/send_mail.php".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: default_mail_url(),
        }
    }
}

impl Config {
    /// Load configuration from a `.kb.toml` file
    pub fn load(path: &PathBuf) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory, or return defaults
    pub fn load_from_dir(dir: &PathBuf) -> Self {
        let config_path = dir.join(".kb.toml");
        if config_path.exists() {
            Self::load(&config_path).unwrap_or_default()
        } else {
            Self::default()
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &PathBuf) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.store.validate()?;
        self.mail.validate()?;
        Ok(())
    }
}

impl StoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.url.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "store.url cannot be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "store.timeout_secs must be > 0".to_string(),
            ));
        }

        for (field, key) in [
            ("store.users_key", &self.users_key),
            ("store.tasks_key", &self.tasks_key),
            ("store.contacts_key", &self.contacts_key),
        ] {
            if key.trim().is_empty() {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} cannot be empty"
                )));
            }
        }

        let mut seen = std::collections::HashSet::new();
        for key in [&self.users_key, &self.tasks_key, &self.contacts_key] {
            if !seen.insert(key.trim()) {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "storage keys must be distinct, '{key}' is reused"
                )));
            }
        }

        Ok(())
    }
}

impl MailConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.relay_url.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "mail.relay_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
