//! Remote collaborators
//!
//! The generation and transcription backends are opaque HTTP services. Each
//! gets an object-safe trait so the session controller can be exercised
//! against scripted implementations.

pub mod download;
pub mod generate;
pub mod transcribe;

pub use generate::{GenerationService, HttpGenerationClient};
pub use transcribe::{HttpTranscriptionClient, TranscriptionService};

use crate::{Result, ScribbleError};
use std::time::Duration;

pub(crate) const GENERATE_PATH: &str = "/api/generate";
pub(crate) const VOICE_TO_TEXT_PATH: &str = "/api/voice-to-text";

/// Connection settings shared by both service clients
#[derive(Clone, Debug)]
pub struct RemoteConfig {
    /// Base URL of the backend, without a trailing slash
    pub base_url: String,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl RemoteConfig {
    /// Set the backend base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ScribbleError::ConfigError("base URL is required".into()));
        }
        if self.base_url.ends_with('/') {
            return Err(ScribbleError::ConfigError(
                "base URL must not end with a slash".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(|e| ScribbleError::ConfigError(format!("failed to build HTTP client: {}", e)))
    }
}
