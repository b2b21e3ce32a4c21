//! Issue image storage
//!
//! Images are written below `<root>/issues/` and served back under
//! `/uploads/issues/<file>`.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, FILE_TOO_LARGE, INVALID_FILE};

/// Largest accepted image
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// URL prefix the upload directory is served under
pub const UPLOADS_PREFIX: &str = "/uploads";

const ISSUE_DIR: &str = "issues";

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reject anything that is not an image or is too large
    pub fn check(content_type: Option<&str>, size: usize) -> ApiResult<()> {
        if !content_type.is_some_and(|ct| ct.starts_with("image/")) {
            return Err(ApiError::bad_request(
                INVALID_FILE,
                "Only image files are allowed",
            ));
        }
        if size > MAX_IMAGE_BYTES {
            return Err(ApiError::bad_request(
                FILE_TOO_LARGE,
                "Image must be 5MB or smaller",
            ));
        }
        Ok(())
    }

    /// Store an issue image and return its public URL
    pub async fn save_issue_image(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> ApiResult<String> {
        Self::check(content_type, bytes.len())?;

        let dir = self.root.join(ISSUE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to create upload dir: {}", e)))?;

        let name = format!(
            "issue-{}.{}",
            Uuid::new_v4().simple(),
            extension(file_name, content_type)
        );
        tokio::fs::write(dir.join(&name), bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to write image: {}", e)))?;

        debug!(file = %name, size = bytes.len(), "Stored issue image");
        Ok(format!("{}/{}/{}", UPLOADS_PREFIX, ISSUE_DIR, name))
    }

    /// Remove a stored image by URL; missing files are ignored
    pub async fn discard(&self, url: &str) {
        let Some(relative) = url
            .strip_prefix(UPLOADS_PREFIX)
            .map(|r| r.trim_start_matches('/'))
        else {
            return;
        };
        if relative.contains("..") {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            warn!(url, error = %e, "Failed to discard image");
        }
    }
}

/// File extension from the client file name, falling back to the MIME subtype
fn extension(file_name: Option<&str>, content_type: Option<&str>) -> String {
    let from_name = file_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str());
    let from_type = content_type.and_then(|ct| ct.strip_prefix("image/"));

    from_name
        .into_iter()
        .chain(from_type)
        .map(|e| e.to_ascii_lowercase())
        .find(|e| !e.is_empty() && e.len() <= 5 && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "img".to_string())
}
