use async_trait::async_trait;
use chrono::Utc;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::{AttachmentError, AttachmentStore, Upload};

/// Stores uploads as files in one directory, served under `public_prefix`.
#[derive(Debug, Clone)]
pub struct DiskAttachmentStore {
    root: PathBuf,
    public_prefix: String,
}

impl DiskAttachmentStore {
    pub fn new(root: impl Into<PathBuf>, public_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a public reference back to a path inside `root`.
    ///
    /// `Ok(None)` means the reference is not ours (e.g. a remote URL).
    pub fn resolve(&self, reference: &str) -> Result<Option<PathBuf>, AttachmentError> {
        let prefix = format!("{}/", self.public_prefix);
        let Some(name) = reference.strip_prefix(&prefix) else {
            return Ok(None);
        };

        let relative = Path::new(name);
        let mut components = relative.components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(Some(self.root.join(relative))),
            _ => Err(AttachmentError::OutsideStore(reference.to_string())),
        }
    }

    fn unique_name(upload: &Upload) -> String {
        format!(
            "{}-{}{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            upload.extension().unwrap_or_default()
        )
    }
}

#[async_trait]
impl AttachmentStore for DiskAttachmentStore {
    async fn store(&self, upload: &Upload) -> Result<String, AttachmentError> {
        fs::create_dir_all(&self.root).await?;

        let name = Self::unique_name(upload);
        fs::write(self.root.join(&name), &upload.bytes).await?;

        debug!(file = %name, bytes = upload.bytes.len(), "Stored attachment");
        Ok(format!("{}/{}", self.public_prefix, name))
    }

    async fn delete(&self, reference: &str) -> Result<(), AttachmentError> {
        let Some(path) = self.resolve(reference)? else {
            debug!(reference, "Skipping delete of external attachment reference");
            return Ok(());
        };

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "Deleted attachment");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
