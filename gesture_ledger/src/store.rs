//! Content-addressed off-chain storage.
//!
//! Content ids are `sha256-<hex digest>` of the stored bytes, so storing the
//! same document twice yields the same id.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentId(String);

impl ContentId {
    pub fn for_bytes(bytes: &[u8]) -> Self {
        ContentId(format!("sha256-{}", hex::encode(Sha256::digest(bytes))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait ContentStore: Send {
    fn put(&mut self, bytes: &[u8]) -> Result<ContentId>;
    fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>>;
}

// ── in-memory ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryContentStore {
    blobs: HashMap<ContentId, Vec<u8>>,
}

impl MemoryContentStore {
    pub fn len(&self) -> usize     { self.blobs.len() }
    pub fn is_empty(&self) -> bool { self.blobs.is_empty() }
}

impl ContentStore for MemoryContentStore {
    fn put(&mut self, bytes: &[u8]) -> Result<ContentId> {
        let id = ContentId::for_bytes(bytes);
        self.blobs.entry(id.clone()).or_insert_with(|| bytes.to_vec());
        Ok(id)
    }

    fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.get(id).cloned())
    }
}

// ── directory-backed ──────────────────────────────────────────────────────

/// One `<content id>.json` file per document under `root`.
#[derive(Debug, Clone)]
pub struct DirContentStore {
    root: PathBuf,
}

impl DirContentStore {
    /// Open (creating if needed) a store rooted at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(DirContentStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ContentId) -> PathBuf {
        self.root.join(format!("{}.json", id))
    }
}

impl ContentStore for DirContentStore {
    fn put(&mut self, bytes: &[u8]) -> Result<ContentId> {
        let id = ContentId::for_bytes(bytes);
        let path = self.path_for(&id);
        if !path.exists() {
            fs::write(&path, bytes)?;
            debug!(path = %path.display(), "stored metadata");
        }
        Ok(id)
    }

    fn get(&self, id: &ContentId) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(id)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_id_is_sha256_hex() {
        let id = ContentId::for_bytes(b"abc");
        assert_eq!(
            id.as_str(),
            "sha256-ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn memory_store_dedups() {
        let mut s = MemoryContentStore::default();
        let a = s.put(b"{}").unwrap();
        let b = s.put(b"{}").unwrap();
        assert_eq!(a, b);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(&a).unwrap().as_deref(), Some(&b"{}"[..]));
    }

    #[test]
    fn dir_store_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = DirContentStore::open(dir.path().join("meta")).unwrap();
        let id = s.put(br#"{"gesture":"squat"}"#).unwrap();
        assert!(s.root().join(format!("{}.json", id)).exists());
        assert_eq!(s.get(&id).unwrap().unwrap(), br#"{"gesture":"squat"}"#.to_vec());

        let missing = ContentId::for_bytes(b"nope");
        assert!(s.get(&missing).unwrap().is_none());
    }
}
