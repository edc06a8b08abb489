//! Deduplicated blob storage for uploaded images.

use crate::Error;
use crate::images::key::{self, IMAGE_EXT};
use std::path::{Path, PathBuf};

/// Reserved filename of the fallback placeholder; always present in the
/// image directory.
pub const DEFAULT_IMAGE: &str = "default.jpg";

/// 1x1 grayscale JPEG written on startup if the placeholder is missing.
const DEFAULT_IMAGE_BYTES: &[u8] = include_bytes!("../../assets/default.jpg");

/// Content-addressed store for image blobs.
///
/// Blobs live as flat files named `<sha256-hex>.jpg` under the root
/// directory. Identical bytes map to the identical filename, so storing
/// the same image twice never writes twice, and concurrent identical
/// uploads cannot corrupt each other.
#[derive(Clone, Debug)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Create a store rooted at `root`, creating the directory if absent.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Write the default placeholder if it is not already present.
    ///
    /// Deployments usually ship their own `default.jpg`; this only fills
    /// the gap so [`resolve`](Self::resolve) always has a fallback target.
    pub async fn ensure_default(&self) -> Result<(), Error> {
        let path = self.default_path();
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, DEFAULT_IMAGE_BYTES).await?;
            tracing::info!(path = %path.display(), "wrote placeholder default image");
        }
        Ok(())
    }

    /// Store image bytes under their content-addressed key.
    ///
    /// Computes the SHA-256 key, writes the blob only if no file with
    /// that key exists yet, and returns the key. Idempotent: re-uploading
    /// identical bytes is a no-op that returns the same key.
    pub async fn store(&self, bytes: &[u8]) -> Result<String, Error> {
        let key = key::image_key(bytes);
        let path = self.root.join(&key);
        if !tokio::fs::try_exists(&path).await? {
            tokio::fs::write(&path, bytes).await?;
            tracing::debug!(%key, "stored image blob");
        }
        Ok(key)
    }

    /// Resolve a filename to the path of its blob, or to the default
    /// placeholder if no such blob exists. A missing image is a normal
    /// outcome (stale or fabricated filename), never an error.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if `filename` does not end in `.jpg` or is not a
    /// bare filename (path separators or `..` must not escape the root).
    pub async fn resolve(&self, filename: &str) -> Result<PathBuf, Error> {
        if !filename.ends_with(IMAGE_EXT) {
            return Err(Error::InvalidRequest(format!("image filename must end with {IMAGE_EXT}")));
        }
        if filename.contains(['/', '\\']) || filename.contains("..") {
            return Err(Error::InvalidRequest("image filename must not contain path components".into()));
        }

        let path = self.root.join(filename);
        if tokio::fs::try_exists(&path).await? {
            Ok(path)
        } else {
            tracing::debug!(%filename, "image not found, serving default");
            Ok(self.default_path())
        }
    }

    /// Path of the fallback placeholder.
    pub fn default_path(&self) -> PathBuf {
        self.root.join(DEFAULT_IMAGE)
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store() -> (tempfile::TempDir, ImageStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path().join("images")).unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_store_is_idempotent() {
        let (_dir, store) = test_store();

        let k1 = store.store(b"photo bytes").await.unwrap();
        let k2 = store.store(b"photo bytes").await.unwrap();
        assert_eq!(k1, k2);

        let entries = std::fs::read_dir(store.root()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_store_distinct_content_distinct_keys() {
        let (_dir, store) = test_store();

        let k1 = store.store(b"one").await.unwrap();
        let k2 = store.store(b"two").await.unwrap();
        assert_ne!(k1, k2);
    }

    #[tokio::test]
    async fn test_stored_bytes_round_trip() {
        let (_dir, store) = test_store();

        let key = store.store(b"the actual image").await.unwrap();
        let path = store.resolve(&key).await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"the actual image");
    }

    #[tokio::test]
    async fn test_resolve_rejects_wrong_extension() {
        let (_dir, store) = test_store();
        let result = store.resolve("picture.png").await;
        assert!(matches!(result, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_resolve_rejects_path_traversal() {
        let (_dir, store) = test_store();
        assert!(matches!(store.resolve("../secret.jpg").await, Err(Error::InvalidRequest(_))));
        assert!(matches!(store.resolve("a/b.jpg").await, Err(Error::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_resolve_missing_falls_back_to_default() {
        let (_dir, store) = test_store();
        store.ensure_default().await.unwrap();

        let path = store.resolve("0000000000000000000000000000000000000000000000000000000000000000.jpg").await.unwrap();
        assert_eq!(path, store.default_path());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_ensure_default_keeps_existing_file() {
        let (_dir, store) = test_store();
        std::fs::write(store.default_path(), b"deployment-provided").unwrap();

        store.ensure_default().await.unwrap();
        assert_eq!(std::fs::read(store.default_path()).unwrap(), b"deployment-provided");
    }
}
