//! Attachment storage behind a trait so the provider can be swapped out.

use std::{
    fs,
    path::PathBuf,
};

use crate::Error;

/// Writes attachment bytes somewhere and hands back a public URL.
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key` and return the URL clients can fetch it from.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String, Error>;
}

/// An [ObjectStore] backed by a directory on local disk, served read-only by
/// the router under a public base path.
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: String,
}

impl LocalObjectStore {
    /// Create a store rooted at `root` whose files are reachable under
    /// `public_base`, e.g. "/uploads".
    pub fn new(root: impl Into<PathBuf>, public_base: &str) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.trim_end_matches('/').to_owned(),
        }
    }
}

impl ObjectStore for LocalObjectStore {
    fn put(&self, key: &str, bytes: &[u8]) -> Result<String, Error> {
        let path = self.root.join(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|error| Error::UploadFailed(error.to_string()))?;
        }
        fs::write(&path, bytes).map_err(|error| Error::UploadFailed(error.to_string()))?;

        Ok(format!("{}/{}", self.public_base, key))
    }
}

#[cfg(test)]
mod local_object_store_tests {
    use super::{LocalObjectStore, ObjectStore};

    #[test]
    fn put_writes_file_and_returns_public_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalObjectStore::new(dir.path(), "/uploads/");

        let url = store.put("7/cafebabe.png", b"not really a png").unwrap();

        assert_eq!(url, "/uploads/7/cafebabe.png");
        let stored = std::fs::read(dir.path().join("7/cafebabe.png")).unwrap();
        assert_eq!(stored, b"not really a png");
    }
}
