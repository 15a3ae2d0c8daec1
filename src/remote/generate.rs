//! Generation service client
//!
//! Turns a prompt into an image reference via `POST /api/generate`.

use crate::remote::{RemoteConfig, GENERATE_PATH};
use crate::{Result, ScribbleError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Clone, Debug, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
}

/// Wire response from the generation endpoint.
///
/// The service reports either an image reference or an error message; some
/// deployments return the image inline as a `data:` URL in `image_data`
/// instead of a hosted `image_url`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GenerationResponse {
    pub image_url: Option<String>,
    pub image_data: Option<String>,
    pub error: Option<String>,
}

impl GenerationResponse {
    /// The displayable image reference, preferring a hosted URL
    pub fn image_reference(&self) -> Option<&str> {
        self.image_url.as_deref().or(self.image_data.as_deref())
    }
}

/// Remote collaborator turning a prompt into an image reference
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// HTTP implementation of [`GenerationService`]
pub struct HttpGenerationClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGenerationClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: config.build_client()?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl GenerationService for HttpGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, GENERATE_PATH);
        debug!(url = %url, "requesting coloring page");

        let response = self
            .client
            .post(&url)
            .json(&GenerationRequest {
                prompt: prompt.to_string(),
            })
            .send()
            .await
            .map_err(|e| {
                error!("generation request failed: {}", e);
                ScribbleError::TransportError(e.to_string())
            })?;

        let status = response.status();
        let body: GenerationResponse = response.json().await.map_err(|e| {
            error!("malformed generation response: {}", e);
            ScribbleError::TransportError(e.to_string())
        })?;

        if !status.is_success() {
            return Err(match body.error {
                Some(message) => ScribbleError::ServiceError(message),
                None => ScribbleError::TransportError(format!(
                    "generation failed with status {}",
                    status
                )),
            });
        }

        body.image_reference()
            .map(|reference| reference.to_string())
            .ok_or_else(|| {
                ScribbleError::TransportError("generation response missing image reference".into())
            })
    }
}
