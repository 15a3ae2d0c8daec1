//! Image reference fetching
//!
//! A result image arrives either as a hosted URL or as an inline
//! `data:image/png;base64,…` reference; both can be saved to disk.

use crate::{Result, ScribbleError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tracing::info;

/// Resolve an image reference to raw bytes.
pub async fn fetch_image_bytes(client: &reqwest::Client, reference: &str) -> Result<Vec<u8>> {
    if let Some(data_url) = reference.strip_prefix("data:") {
        let (header, payload) = data_url.split_once(',').ok_or_else(|| {
            ScribbleError::TransportError("malformed data URL in image reference".into())
        })?;
        if !header.ends_with(";base64") {
            return Err(ScribbleError::TransportError(
                "unsupported data URL encoding in image reference".into(),
            ));
        }
        return STANDARD
            .decode(payload.trim())
            .map_err(|e| ScribbleError::TransportError(format!("invalid base64 image: {}", e)));
    }

    let response = client
        .get(reference)
        .send()
        .await
        .map_err(|e| ScribbleError::TransportError(e.to_string()))?
        .error_for_status()
        .map_err(|e| ScribbleError::TransportError(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ScribbleError::TransportError(e.to_string()))?;

    Ok(bytes.to_vec())
}

/// Fetch an image reference and write it to `path`.
pub async fn save_image(client: &reqwest::Client, reference: &str, path: &Path) -> Result<()> {
    let bytes = fetch_image_bytes(client, reference).await?;
    tokio::fs::write(path, &bytes).await?;
    info!(path = %path.display(), bytes = bytes.len(), "saved coloring page");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_decodes_data_url() {
        let client = reqwest::Client::new();
        let reference = format!("data:image/png;base64,{}", STANDARD.encode(b"png-bytes"));

        let bytes = fetch_image_bytes(&client, &reference).await.unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_data_url() {
        let client = reqwest::Client::new();
        let result = fetch_image_bytes(&client, "data:image/png;base64").await;
        assert!(matches!(result, Err(ScribbleError::TransportError(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_unencoded_data_url() {
        let client = reqwest::Client::new();
        let result = fetch_image_bytes(&client, "data:text/plain,hello").await;
        assert!(matches!(result, Err(ScribbleError::TransportError(_))));
    }

    #[tokio::test]
    async fn test_save_image_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-coloring-page.png");
        let client = reqwest::Client::new();
        let reference = format!("data:image/png;base64,{}", STANDARD.encode(b"drawing"));

        save_image(&client, &reference, &path).await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"drawing");
    }
}
