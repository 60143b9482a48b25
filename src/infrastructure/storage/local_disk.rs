// src/infrastructure/storage/local_disk.rs
use crate::application::{
    error::{ApplicationError, ApplicationResult},
    ports::{
        storage::{ImageStore, ImageUpload, StoredImage},
        time::Clock,
    },
};
use crate::infrastructure::util::random_lower_alnum;
use async_trait::async_trait;
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

const MAX_NAME_CHARS: usize = 64;

/// Stores uploaded images under a local directory that the router serves
/// statically below `url_prefix`.
pub struct LocalDiskImageStore {
    root: PathBuf,
    url_prefix: String,
    clock: Arc<dyn Clock>,
}

impl LocalDiskImageStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>, clock: Arc<dyn Clock>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
            clock,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn file_name_for(&self, upload: &ImageUpload) -> String {
        let original = upload.file_name.as_deref().unwrap_or("image");
        format!(
            "post-{}-{}-{}",
            self.clock.now().timestamp_millis(),
            random_lower_alnum(4),
            sanitize_file_name(original)
        )
    }
}

/// Keep `[A-Za-z0-9._-]`, map everything else to `_`, and never allow a
/// leading dot.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_NAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

fn is_valid_public_id(public_id: &str) -> bool {
    !public_id.is_empty()
        && !public_id.starts_with('.')
        && public_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}

#[async_trait]
impl ImageStore for LocalDiskImageStore {
    async fn store(&self, upload: ImageUpload) -> ApplicationResult<StoredImage> {
        if let Some(content_type) = upload.content_type.as_deref() {
            if !content_type.starts_with("image/") {
                return Err(ApplicationError::validation("Only image uploads are allowed"));
            }
        }
        if upload.data.is_empty() {
            return Err(ApplicationError::validation("Uploaded image is empty"));
        }

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|err| ApplicationError::storage(err.to_string()))?;

        let file_name = self.file_name_for(&upload);
        let path = self.root.join(&file_name);
        tokio::fs::write(&path, &upload.data)
            .await
            .map_err(|err| ApplicationError::storage(err.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = upload.data.len(), "stored image");

        Ok(StoredImage {
            url: format!("{}/{}", self.url_prefix, file_name),
            public_id: Some(file_name),
        })
    }

    async fn remove(&self, public_id: &str) -> ApplicationResult<()> {
        if !is_valid_public_id(public_id) {
            return Err(ApplicationError::storage(format!(
                "refusing to remove '{public_id}'"
            )));
        }
        match tokio::fs::remove_file(self.root.join(public_id)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ApplicationError::storage(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
        }
    }

    fn temp_root(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "blog-core-{tag}-{}",
            random_lower_alnum(8)
        ))
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("my photo.png"), "my_photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(".hidden"), "hidden");
        assert_eq!(sanitize_file_name(""), "image");
    }

    #[test]
    fn traversal_ids_are_rejected() {
        assert!(is_valid_public_id("post-1-abcd-a.png"));
        assert!(!is_valid_public_id("../secret"));
        assert!(!is_valid_public_id(""));
    }

    #[tokio::test]
    async fn store_then_remove() {
        let root = temp_root("store");
        let store = LocalDiskImageStore::new(&root, "/uploads/", Arc::new(FixedClock));

        let stored = store
            .store(ImageUpload {
                file_name: Some("cat.png".into()),
                content_type: Some("image/png".into()),
                data: Bytes::from_static(b"\x89PNG"),
            })
            .await
            .unwrap();

        let public_id = stored.public_id.clone().unwrap();
        assert!(public_id.starts_with("post-1700000000000-"));
        assert!(public_id.ends_with("-cat.png"));
        assert_eq!(stored.url, format!("/uploads/{public_id}"));
        assert!(store.root().join(&public_id).exists());

        store.remove(&public_id).await.unwrap();
        assert!(!store.root().join(&public_id).exists());
        // removing twice is not an error
        store.remove(&public_id).await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }

    #[tokio::test]
    async fn non_images_are_rejected() {
        let store = LocalDiskImageStore::new(temp_root("reject"), "/uploads", Arc::new(FixedClock));
        let result = store
            .store(ImageUpload {
                file_name: Some("notes.txt".into()),
                content_type: Some("text/plain".into()),
                data: Bytes::from_static(b"hello"),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }
}
