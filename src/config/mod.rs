//! Configuration module for the BSB lookup service

use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};
use std::path::PathBuf;
use std::time::Duration;

use crate::remote::FilePattern;

/// Main application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub ftp: FtpSettings,
    pub sync: SyncSettings,
    pub storage: StorageSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// FTP server holding the published directory files
#[derive(Debug, Clone, Deserialize)]
pub struct FtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub connect_timeout_secs: u64,
}

/// Sync cadence and remote file selection
#[derive(Debug, Clone, Deserialize)]
pub struct SyncSettings {
    pub interval_hours: u64,
    pub file_infix: String,
    pub file_extension: String,
}

/// Local storage for the marker, staged payload and providers file
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub path: PathBuf,
    pub providers_file: Option<PathBuf>,
}

impl Settings {
    /// Load configuration from files and environment variables
    ///
    /// Configuration priority (highest to lowest):
    /// 1. Environment variables (prefixed with BSB_)
    /// 2. config/local.toml (gitignored)
    /// 3. config/default.toml
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let defaults = Settings::default();

        let builder = Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("ftp.host", defaults.ftp.host)?
            .set_default("ftp.port", defaults.ftp.port as i64)?
            .set_default("ftp.user", defaults.ftp.user)?
            .set_default("ftp.password", defaults.ftp.password)?
            .set_default("ftp.connect_timeout_secs", defaults.ftp.connect_timeout_secs as i64)?
            .set_default("sync.interval_hours", defaults.sync.interval_hours as i64)?
            .set_default("sync.file_infix", defaults.sync.file_infix)?
            .set_default("sync.file_extension", defaults.sync.file_extension)?
            .set_default("storage.path", defaults.storage.path.to_string_lossy().to_string())?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            .add_source(File::from(config_dir.join("local.toml")).required(false))
            // BSB_FTP__HOST, BSB_SYNC__INTERVAL_HOURS, etc.
            .add_source(
                Environment::with_prefix("BSB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.interval_hours == 0 {
            return Err(ConfigError::Message(
                "sync.interval_hours must be greater than zero".to_string(),
            ));
        }
        if self.ftp.host.trim().is_empty() {
            return Err(ConfigError::Message("ftp.host must not be empty".to_string()));
        }
        Ok(())
    }

    /// Time between scheduled sync runs
    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync.interval_hours * 60 * 60)
    }

    /// Pattern the latest remote directory file must match
    pub fn file_pattern(&self) -> FilePattern {
        FilePattern::new(&self.sync.file_infix, &self.sync.file_extension)
    }

    /// Location of the institution code to name table
    pub fn providers_path(&self) -> PathBuf {
        self.storage
            .providers_file
            .clone()
            .unwrap_or_else(|| self.storage.path.join("providers.csv"))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 3000,
                workers: None,
            },
            ftp: FtpSettings {
                host: "bsb.hostedftp.com".to_string(),
                port: 21,
                user: "anonymous".to_string(),
                password: "anonymous@".to_string(),
                connect_timeout_secs: 30,
            },
            sync: SyncSettings {
                interval_hours: 6,
                file_infix: "BSBDirectory".to_string(),
                file_extension: ".csv".to_string(),
            },
            storage: StorageSettings {
                path: PathBuf::from("data"),
                providers_file: None,
            },
        }
    }
}
