//! Filesystem media store for uploaded images.
//!
//! Uploads land under `<root>/posts/` with a random name; only the
//! client-supplied extension survives, and only after validation. The
//! returned [`MediaPath`] is relative to the media root so the HTTP layer
//! can serve it from wherever the root is mounted.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::MediaPath;
use crate::domain::ports::{ImageUpload, MediaStore, MediaStoreError};

const MAX_EXTENSION_LEN: usize = 8;

/// Extract and validate the extension of a client-supplied file name.
fn extension(filename: &str) -> Result<String, MediaStoreError> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or_else(|| MediaStoreError::invalid_name("file name has no extension"))?;
    if ext.is_empty() || ext.len() > MAX_EXTENSION_LEN {
        return Err(MediaStoreError::invalid_name("extension length out of range"));
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(MediaStoreError::invalid_name(
            "extension must be ASCII alphanumeric",
        ));
    }
    Ok(ext.to_ascii_lowercase())
}

/// [`MediaStore`] writing uploads beneath a local directory.
#[derive(Debug, Clone)]
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn store(&self, upload: &ImageUpload) -> Result<MediaPath, MediaStoreError> {
        let ext = extension(&upload.filename)?;
        let relative = format!("posts/{}.{ext}", Uuid::new_v4());

        let target = self.root.join(&relative);
        let parent = target
            .parent()
            .ok_or_else(|| MediaStoreError::write("media root has no parent directory"))?;
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|err| MediaStoreError::write(err.to_string()))?;
        tokio::fs::write(&target, &upload.bytes)
            .await
            .map_err(|err| MediaStoreError::write(err.to_string()))?;
        debug!(path = %target.display(), bytes = upload.bytes.len(), "stored upload");

        MediaPath::new(relative).map_err(|err| MediaStoreError::invalid_name(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("photo.PNG", "png")]
    #[case("a.b.jpeg", "jpeg")]
    fn accepts_usable_extensions(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(extension(name).expect("valid"), expected);
    }

    #[rstest]
    #[case("noext")]
    #[case("dotfile.")]
    #[case("weird.p g")]
    #[case("long.extensionnn")]
    fn rejects_unusable_extensions(#[case] name: &str) {
        assert!(extension(name).is_err());
    }

    #[tokio::test]
    async fn stores_bytes_under_posts_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsMediaStore::new(dir.path());
        let upload = ImageUpload {
            filename: "pic.png".into(),
            bytes: vec![137, 80, 78, 71],
        };

        let path = store.store(&upload).await.expect("stored");
        assert!(path.as_str().starts_with("posts/"));
        assert!(path.as_str().ends_with(".png"));
        let written = tokio::fs::read(dir.path().join(path.as_str()))
            .await
            .expect("file exists");
        assert_eq!(written, upload.bytes);
    }
}
