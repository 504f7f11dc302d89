// ABOUTME: Media storage seam for progress photo uploads
// ABOUTME: The placeholder backend validates uploads and mints URLs without persisting bytes

use crate::constants::storage::{ALLOWED_PHOTO_CONTENT_TYPES, DEFAULT_PHOTO_BASE_URL};
use crate::errors::{AppError, AppResult};
use crate::models::PhotoType;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;
use uuid::Uuid;

/// An uploaded image waiting to be stored
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    /// Declared MIME type of the upload
    pub content_type: String,
    /// Client-side file name, used only for its extension
    pub file_name: Option<String>,
    /// Raw image bytes
    pub data: Bytes,
}

/// Where a stored photo can be fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPhoto {
    /// Full-size image URL
    pub photo_url: String,
    /// Thumbnail URL, when the backend produces one
    pub thumbnail_url: Option<String>,
}

/// Backend that accepts progress photo uploads
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store an upload for a user and return its URLs
    async fn store(
        &self,
        user_id: Uuid,
        photo_type: PhotoType,
        upload: PhotoUpload,
    ) -> AppResult<StoredPhoto>;
}

/// Reject uploads whose content type is not an accepted image format
///
/// # Errors
///
/// Returns an invalid-input error listing the accepted types
pub fn validate_content_type(content_type: &str) -> AppResult<()> {
    if ALLOWED_PHOTO_CONTENT_TYPES.contains(&content_type) {
        return Ok(());
    }
    Err(AppError::invalid_input(format!(
        "Invalid file type. Allowed: {}",
        ALLOWED_PHOTO_CONTENT_TYPES.join(", ")
    )))
}

/// File extension for an upload, taken from the file name or else the content type
fn extension_for(upload: &PhotoUpload) -> String {
    let from_name = upload
        .file_name
        .as_deref()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    let ext = from_name.unwrap_or_else(|| {
        match upload.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
        .to_owned()
    });
    format!(".{ext}")
}

/// Storage that only mints URLs under a base address
#[derive(Debug, Clone)]
pub struct PlaceholderPhotoStorage {
    base_url: String,
}

impl PlaceholderPhotoStorage {
    /// Create storage rooted at `base_url`
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for PlaceholderPhotoStorage {
    fn default() -> Self {
        Self::new(DEFAULT_PHOTO_BASE_URL)
    }
}

#[async_trait]
impl PhotoStorage for PlaceholderPhotoStorage {
    async fn store(
        &self,
        user_id: Uuid,
        photo_type: PhotoType,
        upload: PhotoUpload,
    ) -> AppResult<StoredPhoto> {
        validate_content_type(&upload.content_type)?;

        let photo_url = format!(
            "{}/{user_id}/{photo_type}/{}{}",
            self.base_url,
            Uuid::new_v4(),
            extension_for(&upload)
        );
        debug!(
            user.id = %user_id,
            bytes = upload.data.len(),
            "Accepted progress photo upload"
        );

        Ok(StoredPhoto {
            photo_url,
            thumbnail_url: None,
        })
    }
}
