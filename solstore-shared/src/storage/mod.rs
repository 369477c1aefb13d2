/// Image storage abstraction
///
/// Uploaded product and slider images live outside the database; the rows
/// only carry an opaque `image_ref`. The [`ImageStore`] trait is the seam
/// to the external image store, with a local-filesystem backend for
/// development and tests.
///
/// Releasing an image is a best-effort side effect: record mutations never
/// fail or roll back because a stale file could not be removed. Use
/// [`release_best_effort`] wherever a release accompanies a record change.

pub mod local;

use async_trait::async_trait;

pub use local::LocalImageStore;

/// Error type for image storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Underlying I/O failure
    #[error("Image store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Refused to store or release a reference outside the store
    #[error("Invalid image reference: {0}")]
    InvalidRef(String),
}

/// Stores and releases uploaded images
///
/// Implementations must treat `release` of an already-missing image as
/// success; the caller only cares that the file is gone.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores image bytes under a category (e.g. "inverters", "slider")
    ///
    /// Returns the opaque reference to persist alongside the record.
    async fn save(
        &self,
        category: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<String, StorageError>;

    /// Removes a previously stored image
    ///
    /// Must succeed when the image is already missing.
    async fn release(&self, image_ref: &str) -> Result<(), StorageError>;
}

/// Releases an image, logging failure instead of propagating it
///
/// Record mutations and image cleanup are independent resources, not a
/// transaction; a failed release leaves an orphaned file at worst.
pub async fn release_best_effort(store: &dyn ImageStore, image_ref: &str) {
    if let Err(e) = store.release(image_ref).await {
        tracing::warn!(image_ref = %image_ref, error = %e, "Failed to release stored image");
    }
}
