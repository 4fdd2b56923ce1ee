//! Attachment storage for uploaded shop images.
//!
//! Uploads are validated (`Upload::validate`) before any controller logic
//! runs; the store only persists and releases bytes.

pub mod disk;

use async_trait::async_trait;
use thiserror::Error;

pub use disk::DiskAttachmentStore;

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Not an image! Please upload an image.")]
    NotAnImage(String),

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { size: usize, limit: usize },

    #[error("Attachment reference escapes the upload directory: {0}")]
    OutsideStore(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Reject anything that is not `image/*` or is over `max_bytes`.
    pub fn validate(&self, max_bytes: usize) -> Result<(), AttachmentError> {
        if !self.content_type.starts_with("image/") {
            return Err(AttachmentError::NotAnImage(self.content_type.clone()));
        }
        if self.bytes.len() > max_bytes {
            return Err(AttachmentError::TooLarge { size: self.bytes.len(), limit: max_bytes });
        }
        Ok(())
    }

    /// Lowercased extension from the client file name, with leading dot.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name.as_deref()?;
        let ext = std::path::Path::new(name).extension()?.to_str()?;
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(format!(".{}", ext.to_ascii_lowercase()))
    }
}

/// Persists uploaded bytes and hands back a public reference to them.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    async fn store(&self, upload: &Upload) -> Result<String, AttachmentError>;

    /// Remove the file behind `reference`. A file that is already gone is not an error.
    async fn delete(&self, reference: &str) -> Result<(), AttachmentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str, size: usize) -> Upload {
        Upload {
            file_name: Some("Photo.JPG".into()),
            content_type: content_type.into(),
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn accepts_images_under_limit() {
        assert!(upload("image/png", 10).validate(1024).is_ok());
        assert!(upload("image/jpeg", 1024).validate(1024).is_ok());
    }

    #[test]
    fn rejects_non_images() {
        let err = upload("application/pdf", 10).validate(1024).unwrap_err();
        assert!(matches!(err, AttachmentError::NotAnImage(_)));
        assert_eq!(err.to_string(), "Not an image! Please upload an image.");
    }

    #[test]
    fn rejects_oversized() {
        let err = upload("image/png", 1025).validate(1024).unwrap_err();
        assert!(matches!(err, AttachmentError::TooLarge { size: 1025, limit: 1024 }));
    }

    #[test]
    fn extension_is_normalized() {
        assert_eq!(upload("image/jpeg", 1).extension().as_deref(), Some(".jpg"));
        let no_name = Upload { file_name: None, content_type: "image/png".into(), bytes: vec![] };
        assert_eq!(no_name.extension(), None);
        let odd = Upload { file_name: Some("x.p/g".into()), content_type: "image/png".into(), bytes: vec![] };
        assert_eq!(odd.extension(), None);
    }
}
