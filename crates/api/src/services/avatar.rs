//! Avatar file storage.
//!
//! Avatars are written under `<uploads>/users/<user id>/<filename>` and
//! served statically from `/uploads`. Replacing an avatar removes the old
//! file after the new one is written.

use std::path::{Path, PathBuf};

use thiserror::Error;

use campus_market_core::UserId;

/// Errors that can occur storing an avatar.
#[derive(Debug, Error)]
pub enum AvatarError {
    /// The uploaded part is not an image.
    #[error("avatar must be an image")]
    NotAnImage,

    /// The filename is empty or escapes the upload directory.
    #[error("avatar filename is invalid")]
    BadFilename,

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Stores avatar files under a configured root directory.
#[derive(Debug, Clone)]
pub struct AvatarStore {
    root: PathBuf,
}

impl AvatarStore {
    /// Create a store rooted at the given uploads directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The uploads root, for serving the tree statically.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an uploaded avatar and return its web path.
    ///
    /// # Errors
    ///
    /// Returns `AvatarError::NotAnImage` unless the content type is
    /// `image/*`, `AvatarError::BadFilename` for an empty or traversing
    /// filename, and `AvatarError::Io` on filesystem failure.
    pub async fn save(
        &self,
        user_id: UserId,
        filename: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<String, AvatarError> {
        if !content_type.starts_with("image/") {
            return Err(AvatarError::NotAnImage);
        }

        let name = sanitize_filename(filename)?;
        let dir = self.root.join("users").join(user_id.to_string());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&name), bytes).await?;

        Ok(format!(
            "/uploads/users/{user_id}/{}",
            urlencoding::encode(&name)
        ))
    }

    /// Remove a previously stored avatar by its web path.
    ///
    /// A file that is already gone is not an error.
    ///
    /// # Errors
    ///
    /// Returns `AvatarError::BadFilename` for paths outside the uploads
    /// tree and `AvatarError::Io` on other filesystem failures.
    pub async fn remove(&self, web_path: &str) -> Result<(), AvatarError> {
        let rel = web_path
            .strip_prefix("/uploads/")
            .ok_or(AvatarError::BadFilename)?;
        let decoded = urlencoding::decode(rel).map_err(|_| AvatarError::BadFilename)?;
        if decoded.split(['/', '\\']).any(|part| part == "..") {
            return Err(AvatarError::BadFilename);
        }

        match tokio::fs::remove_file(self.root.join(decoded.as_ref())).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduce an uploaded filename to its final component.
fn sanitize_filename(filename: &str) -> Result<String, AvatarError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(AvatarError::BadFilename)?;
    if name.is_empty() || name == ".." {
        return Err(AvatarError::BadFilename);
    }
    Ok(name.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_store(label: &str) -> AvatarStore {
        let root = std::env::temp_dir().join(format!(
            "campus-market-avatars-{label}-{}",
            std::process::id()
        ));
        AvatarStore::new(root)
    }

    #[test]
    fn test_sanitize_plain_filename() {
        assert_eq!(sanitize_filename("photo.png").unwrap(), "photo.png");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").unwrap(),
            "passwd"
        );
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("..").is_err());
    }

    #[tokio::test]
    async fn test_save_rejects_non_image() {
        let store = scratch_store("non-image");
        let result = store
            .save(UserId::new(1), "notes.txt", "text/plain", b"hello")
            .await;
        assert!(matches!(result, Err(AvatarError::NotAnImage)));
    }

    #[tokio::test]
    async fn test_save_then_remove() {
        let store = scratch_store("roundtrip");
        let web_path = store
            .save(UserId::new(1), "my photo.png", "image/png", b"png-bytes")
            .await
            .unwrap();
        assert_eq!(web_path, "/uploads/users/1/my%20photo.png");

        let on_disk = store.root().join("users/1/my photo.png");
        assert!(on_disk.exists());

        store.remove(&web_path).await.unwrap();
        assert!(!on_disk.exists());

        // Removing again is a no-op
        store.remove(&web_path).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_rejects_traversal() {
        let store = scratch_store("traversal");
        assert!(matches!(
            store.remove("/uploads/../outside.png").await,
            Err(AvatarError::BadFilename)
        ));
        assert!(matches!(
            store.remove("/elsewhere/file.png").await,
            Err(AvatarError::BadFilename)
        ));
    }
}
