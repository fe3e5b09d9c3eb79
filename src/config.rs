use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::catalog::client::DEFAULT_COMCAT_URL;
use crate::filter::DEFAULT_ALLOWED_SOURCE;
use crate::geoserve::client::DEFAULT_GEOSERVE_URL;
use crate::queue::client::DEFAULT_QUEUE_PORT;

/// Name of the receiver's log file under `<install>/logs`.
pub const LOG_FILE_NAME: &str = "origins.log";

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy, so a
/// ShakeMap profile can be described there instead of in PDL's config.
///
/// These variables replace the ShakeMap profile lookup: install and data
/// paths come from SHAKEMAP_INSTALL_PATH and SHAKEMAP_DATA_PATH (default
/// `~/shakemap_profiles/default/{install,data}`), and the queue port from
/// SHAKEMAP_QUEUE_PORT rather than `<install>/config/queue.conf`.
pub struct Config {
    /// ShakeMap install directory (config and logs live here)
    pub install_path: PathBuf,
    /// ShakeMap data directory (event directories live here)
    pub data_path: PathBuf,
    /// Port the ShakeMap queue listens on
    pub queue_port: u16,
    /// The only product source acted on
    pub allowed_source: String,
    /// ComCat host for event confirmation
    pub comcat_url: String,
    /// Geoserve base URL for place/region lookups
    pub geoserve_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only a malformed port is an error.
    pub fn load() -> Result<Self> {
        let profile = default_profile_dir();

        let queue_port = match env::var("SHAKEMAP_QUEUE_PORT") {
            Ok(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SHAKEMAP_QUEUE_PORT is not a valid port: {raw}"))?,
            Err(_) => DEFAULT_QUEUE_PORT,
        };

        Ok(Self {
            install_path: env::var("SHAKEMAP_INSTALL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| profile.join("install")),
            data_path: env::var("SHAKEMAP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| profile.join("data")),
            queue_port,
            allowed_source: env::var("QUAKEGATE_SOURCE")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_SOURCE.to_string()),
            comcat_url: env::var("COMCAT_URL").unwrap_or_else(|_| DEFAULT_COMCAT_URL.to_string()),
            geoserve_url: env::var("GEOSERVE_URL")
                .unwrap_or_else(|_| DEFAULT_GEOSERVE_URL.to_string()),
        })
    }

    /// Check that the data directory exists.
    /// Call this before contacting any external service.
    pub fn require_data_dir(&self) -> Result<()> {
        if !self.data_path.is_dir() {
            anyhow::bail!(
                "{} is not a valid directory.\n\
                 Set SHAKEMAP_DATA_PATH to your ShakeMap profile's data directory.",
                self.data_path.display()
            );
        }
        Ok(())
    }

    /// Directory the rolling log file is written to.
    pub fn log_dir(&self) -> PathBuf {
        self.install_path.join("logs")
    }
}

/// `~/shakemap_profiles/default`, or a relative path if there is no home directory.
pub fn default_profile_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| Path::new(".").to_path_buf())
        .join("shakemap_profiles")
        .join("default")
}
