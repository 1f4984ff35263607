//! Service configuration.
//!
//! Settings are read from a YAML file:
//!
//! ```yaml
//! server:
//!   host: 127.0.0.1
//!   port: 8080
//!   mount_path: /slugs
//! data:
//!   user_group_mapping: /etc/slugs/user_group_mapping.csv
//!   poll_interval_ms: 1000
//! ```
//!
//! Only `data.user_group_mapping` is required.

use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{Error, Result};

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/slugs/slugs.yaml";

/// Top-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub data: DataSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Path prefix the service is mounted under
    pub mount_path: String,
}

/// Mapping file settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSettings {
    /// File holding one `user,group` pair per line
    pub user_group_mapping: PathBuf,
    /// How often the file's modification time is checked
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            mount_path: "/slugs".to_string(),
        }
    }
}

impl ServerSettings {
    /// Socket address to listen on.
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid listen address: {}", e)))
    }
}

impl DataSettings {
    /// Interval between mapping file checks.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Settings {
    /// Load and validate settings from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate settings from YAML text.
    pub fn parse(content: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        self.server.listen_addr()?;

        if !self.server.mount_path.starts_with('/') {
            return Err(Error::Config(format!(
                "mount_path must start with '/': {}",
                self.server.mount_path
            )));
        }
        if self.data.poll_interval_ms == 0 {
            return Err(Error::Config(
                "poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fail if the configuration file given on the command line does not exist.
pub fn check_config_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(Error::MissingConfigFile(path.to_path_buf()));
    }
    Ok(())
}
