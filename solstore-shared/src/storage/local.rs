/// Local-filesystem image store
///
/// Stores images under `{root}/{category}/{token}_{filename}` where the
/// token is 8 random bytes, hex-encoded, so two uploads with the same
/// filename never collide. The returned `image_ref` is the path relative
/// to the media root (e.g. `inverters/a1b2c3d4e5f60718_panel.jpg`).

use super::{ImageStore, StorageError};
use async_trait::async_trait;
use rand::RngCore;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Image store backed by a directory on local disk
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    /// Creates a store rooted at `root` (created lazily on first save)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves an image reference to an absolute path, rejecting refs
    /// that would escape the media root
    fn resolve(&self, image_ref: &str) -> Result<PathBuf, StorageError> {
        let rel = Path::new(image_ref);
        let escapes = rel.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if escapes || image_ref.is_empty() {
            return Err(StorageError::InvalidRef(image_ref.to_string()));
        }
        Ok(self.root.join(rel))
    }
}

/// Strips path separators and other hostile characters from an uploaded
/// filename, keeping the extension readable
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(|c| c == '.' || c == '_').is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn save(
        &self,
        category: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError> {
        let mut token = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut token);

        let name = format!("{}_{}", hex::encode(token), sanitize_filename(filename));
        let image_ref = format!("{}/{}", category, name);
        let path = self.resolve(&image_ref)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;

        info!(image_ref = %image_ref, size = bytes.len(), "Stored image");
        Ok(image_ref)
    }

    async fn release(&self, image_ref: &str) -> Result<(), StorageError> {
        let path = self.resolve(image_ref)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(image_ref = %image_ref, "Released image");
                Ok(())
            }
            // Already gone is fine
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(image_ref = %image_ref, "Image already missing on release");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::release_best_effort;

    fn temp_store() -> LocalImageStore {
        let mut token = [0u8; 8];
        rand::thread_rng().fill_bytes(&mut token);
        let root = std::env::temp_dir().join(format!("solstore-media-{}", hex::encode(token)));
        LocalImageStore::new(root)
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("panel.jpg"), "panel.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[tokio::test]
    async fn test_save_and_release() {
        let store = temp_store();

        let image_ref = store
            .save("inverters", "panel.jpg", b"fake image bytes")
            .await
            .unwrap();
        assert!(image_ref.starts_with("inverters/"));
        assert!(image_ref.ends_with("_panel.jpg"));

        let path = store.resolve(&image_ref).unwrap();
        assert!(path.exists());

        store.release(&image_ref).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_missing_is_ok() {
        let store = temp_store();
        store.release("inverters/does_not_exist.jpg").await.unwrap();
    }

    #[tokio::test]
    async fn test_release_rejects_escaping_ref() {
        let store = temp_store();
        let result = store.release("../outside.jpg").await;
        assert!(matches!(result, Err(StorageError::InvalidRef(_))));
    }

    #[tokio::test]
    async fn test_same_filename_gets_distinct_refs() {
        let store = temp_store();
        let a = store.save("slider", "hero.png", b"a").await.unwrap();
        let b = store.save("slider", "hero.png", b"b").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_release_best_effort_swallows_errors() {
        let store = temp_store();
        // Invalid ref fails release but must not panic
        release_best_effort(&store, "../escape.jpg").await;
    }
}
