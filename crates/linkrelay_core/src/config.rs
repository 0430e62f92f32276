//! Relay configuration (`linkrelay.toml`)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{RelayError, Result};

/// Top-level configuration file layout
#[derive(Debug, Deserialize, Serialize)]
struct ConfigFile {
    relay: RelayConfig,
}

/// Channel and verb names the relay speaks.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct RelayConfig {
    /// Application identifier, used as the channel name prefix
    pub app_id: String,
    /// Channel name suffix appended after the app id
    #[serde(default = "default_channel_suffix")]
    pub channel_suffix: String,
    /// Verb pushed to the runtime when a link arrives
    #[serde(default = "default_push_method")]
    pub push_method: String,
    /// Verb the runtime calls to read and clear the held link
    #[serde(default = "default_pull_method")]
    pub pull_method: String,
}

fn default_channel_suffix() -> String {
    "deeplink".to_string()
}

fn default_push_method() -> String {
    "handleDeepLink".to_string()
}

fn default_pull_method() -> String {
    "getInitialLink".to_string()
}

impl RelayConfig {
    /// Default verbs for an app id
    pub fn new(app_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            channel_suffix: default_channel_suffix(),
            push_method: default_push_method(),
            pull_method: default_pull_method(),
        }
    }

    /// Parse and validate a `linkrelay.toml` document.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(input)?;
        file.relay.validate()?;
        Ok(file.relay)
    }

    /// Load and validate a `linkrelay.toml` file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub fn to_toml(&self) -> Result<String> {
        let file = ConfigFile {
            relay: self.clone(),
        };
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Full channel name, `<app-id>/<suffix>`.
    pub fn channel_name(&self) -> String {
        format!("{}/{}", self.app_id, self.channel_suffix)
    }

    pub fn validate(&self) -> Result<()> {
        let app_id = self.app_id.as_str();
        if app_id.trim().is_empty() {
            return Err(RelayError::InvalidConfig("app_id is empty".to_string()));
        }
        if app_id.contains('/') || app_id.chars().any(char::is_whitespace) {
            return Err(RelayError::InvalidConfig(format!(
                "app_id '{app_id}' must not contain '/' or whitespace"
            )));
        }
        if self.channel_suffix.trim().is_empty() {
            return Err(RelayError::InvalidConfig(
                "channel_suffix is empty".to_string(),
            ));
        }
        if self.push_method.trim().is_empty() || self.pull_method.trim().is_empty() {
            return Err(RelayError::InvalidConfig(
                "push_method and pull_method must be set".to_string(),
            ));
        }
        if self.push_method == self.pull_method {
            return Err(RelayError::InvalidConfig(format!(
                "push_method and pull_method are both '{}'",
                self.push_method
            )));
        }
        Ok(())
    }
}
