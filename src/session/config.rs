//! Configuration for the session controller

use crate::remote::RemoteConfig;
use crate::{Result, ScribbleError};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a scribble session
#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Remote service connection settings
    pub remote: RemoteConfig,

    /// How long an error banner stays visible before auto-hiding
    pub error_autohide: Duration,

    /// Directory downloaded pages are saved into
    pub download_dir: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            remote: RemoteConfig::default(),
            error_autohide: Duration::from_secs(5),
            download_dir: PathBuf::from("."),
        }
    }
}

impl SessionConfig {
    /// Set the remote service configuration
    pub fn with_remote(mut self, remote: RemoteConfig) -> Self {
        self.remote = remote;
        self
    }

    /// Set the error banner auto-hide delay
    pub fn with_error_autohide(mut self, delay: Duration) -> Self {
        self.error_autohide = delay;
        self
    }

    /// Set the download directory
    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.remote.validate()?;
        if self.error_autohide.is_zero() {
            return Err(ScribbleError::ConfigError(
                "error auto-hide delay must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
