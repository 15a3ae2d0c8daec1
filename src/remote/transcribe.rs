//! Transcription service client
//!
//! Uploads a WAV recording to `POST /api/voice-to-text` as multipart form
//! data and returns the transcribed text.

use crate::remote::{RemoteConfig, VOICE_TO_TEXT_PATH};
use crate::{Result, ScribbleError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, error};

const AUDIO_FIELD: &str = "audio";
const RECORDING_FILE_NAME: &str = "recording.wav";

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TranscriptionResponse {
    pub text: Option<String>,
    pub error: Option<String>,
}

/// Remote collaborator turning recorded audio into text
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    async fn transcribe(&self, audio_wav: Vec<u8>) -> Result<String>;
}

/// HTTP implementation of [`TranscriptionService`]
pub struct HttpTranscriptionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscriptionClient {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            client: config.build_client()?,
            base_url: config.base_url.clone(),
        })
    }
}

#[async_trait]
impl TranscriptionService for HttpTranscriptionClient {
    async fn transcribe(&self, audio_wav: Vec<u8>) -> Result<String> {
        let url = format!("{}{}", self.base_url, VOICE_TO_TEXT_PATH);
        debug!(url = %url, bytes = audio_wav.len(), "uploading recording");

        let part = reqwest::multipart::Part::bytes(audio_wav)
            .file_name(RECORDING_FILE_NAME)
            .mime_str("audio/wav")
            .map_err(|e| ScribbleError::TransportError(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part(AUDIO_FIELD, part);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!("transcription request failed: {}", e);
                ScribbleError::TransportError(e.to_string())
            })?;

        let status = response.status();
        let body: TranscriptionResponse = response.json().await.map_err(|e| {
            error!("malformed transcription response: {}", e);
            ScribbleError::TransportError(e.to_string())
        })?;

        if !status.is_success() {
            return Err(match body.error {
                Some(message) => ScribbleError::ServiceError(message),
                None => ScribbleError::TransportError(format!(
                    "transcription failed with status {}",
                    status
                )),
            });
        }

        body.text.ok_or_else(|| {
            ScribbleError::TransportError("transcription response missing text".into())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let body: TranscriptionResponse =
            serde_json::from_str(r#"{"success":true,"text":"a friendly dragon"}"#).unwrap();
        assert_eq!(body.text.as_deref(), Some("a friendly dragon"));
        assert!(body.error.is_none());
    }

    #[test]
    fn test_error_response() {
        let body: TranscriptionResponse =
            serde_json::from_str(r#"{"error":"Failed to transcribe audio"}"#).unwrap();
        assert!(body.text.is_none());
        assert_eq!(body.error.as_deref(), Some("Failed to transcribe audio"));
    }
}
