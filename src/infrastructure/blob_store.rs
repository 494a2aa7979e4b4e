use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::BlobStore;

/// Writes uploads into a directory served under a public base URL. The
/// returned URL string is the only thing the rest of the system ever sees.
pub struct DiskBlobStore {
    dir: PathBuf,
    base_url: String,
}

impl DiskBlobStore {
    pub fn new(dir: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self, DomainError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| DomainError::Storage(format!("create {}: {}", dir.display(), e)))?;
        Ok(Self {
            dir,
            base_url: base_url.into(),
        })
    }
}

impl BlobStore for DiskBlobStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String, DomainError> {
        // Only the final path component; uploads must not escape the media dir.
        let name = Path::new(filename)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload");
        let stored = format!("{}-{}", Uuid::new_v4(), name);

        let path = self.dir.join(&stored);
        fs::write(&path, bytes)
            .map_err(|e| DomainError::Storage(format!("write {}: {}", path.display(), e)))?;

        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_writes_the_bytes_and_returns_a_public_url() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DiskBlobStore::new(dir.path(), "/media/").expect("store");

        let url = store.store("photo.jpg", b"jpeg bytes").expect("store");

        assert!(url.starts_with("/media/"));
        assert!(url.ends_with("-photo.jpg"));
        let stored = url.trim_start_matches("/media/");
        let on_disk = fs::read(dir.path().join(stored)).expect("read back");
        assert_eq!(on_disk, b"jpeg bytes");
    }

    #[test]
    fn directory_components_are_stripped_from_filenames() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DiskBlobStore::new(dir.path(), "/media").expect("store");

        let url = store.store("../../evil.png", b"x").expect("store");

        assert!(url.ends_with("-evil.png"));
        assert!(!url.contains(".."));
    }

    #[test]
    fn repeated_uploads_of_the_same_name_do_not_collide() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DiskBlobStore::new(dir.path(), "/media").expect("store");

        let first = store.store("photo.jpg", b"a").expect("first");
        let second = store.store("photo.jpg", b"b").expect("second");

        assert_ne!(first, second);
    }
}
