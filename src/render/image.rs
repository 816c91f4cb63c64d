//! Logo Image Resolution
//!
//! Resolves an `ImageSource` into raw bytes: local read, remote fetch with a
//! fixed timeout, or inline passthrough. A missing or unreachable image
//! yields "no image" — never a hard failure of the overall render.

use std::time::Duration;
use tracing::warn;

use crate::constants::network::IMAGE_FETCH_TIMEOUT_SECS;
use crate::types::ImageSource;

/// Fetch the bytes behind an image source, if any.
pub async fn fetch_image(source: &ImageSource) -> Option<Vec<u8>> {
    match source {
        ImageSource::None => None,
        ImageSource::InlineBytes(bytes) => Some(bytes.clone()),
        ImageSource::LocalPath(path) => match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Could not read logo file {}: {}", path.display(), e);
                None
            }
        },
        ImageSource::RemoteUrl(url) => fetch_remote(url.as_str()).await,
    }
}

async fn fetch_remote(url: &str) -> Option<Vec<u8>> {
    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(IMAGE_FETCH_TIMEOUT_SECS))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            warn!("Could not build HTTP client for logo fetch: {}", e);
            return None;
        }
    };

    match client.get(url).send().await {
        Ok(response) if response.status().is_success() => match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                warn!("Could not read logo bytes from {}: {}", url, e);
                None
            }
        },
        Ok(response) => {
            warn!("Logo fetch from {} returned {}", url, response.status());
            None
        }
        Err(e) => {
            warn!("Could not download logo from {}: {}", url, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_none_source_yields_no_image() {
        assert!(fetch_image(&ImageSource::None).await.is_none());
    }

    #[tokio::test]
    async fn test_inline_bytes_pass_through() {
        let bytes = fetch_image(&ImageSource::InlineBytes(vec![1, 2, 3]))
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_local_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"png-ish").unwrap();
        let source = ImageSource::LocalPath(file.path().to_path_buf());
        assert_eq!(fetch_image(&source).await.unwrap(), b"png-ish");
    }

    #[tokio::test]
    async fn test_missing_local_path_degrades_to_none() {
        let source = ImageSource::LocalPath("/nonexistent/logo.png".into());
        assert!(fetch_image(&source).await.is_none());
    }
}
