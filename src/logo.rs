//! Company logo uploads.

use crate::error::{Error, Result};
use log::debug;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Largest accepted logo upload, in bytes.
pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// Writes uploaded logos into a directory under unique names.
#[derive(Debug, Clone)]
pub struct LogoStore {
    dir: PathBuf,
}

impl LogoStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory the logos are stored in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Validate and persist an uploaded logo, returning its path.
    ///
    /// Only JPEG and PNG data is accepted, identified by magic bytes rather
    /// than a client-supplied name. Files are named `logo_{uuid}.{ext}` so
    /// concurrent uploads never collide.
    pub fn store(&self, data: &[u8]) -> Result<PathBuf> {
        if data.len() > MAX_LOGO_BYTES {
            return Err(Error::LogoTooLarge {
                size: data.len(),
                max: MAX_LOGO_BYTES,
            });
        }

        let extension = if data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8 {
            "jpg"
        } else if data.len() >= 8 && &data[0..8] == b"\x89PNG\r\n\x1a\n" {
            "png"
        } else {
            return Err(Error::Image("le logo doit être au format JPEG ou PNG".to_string()));
        };

        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("logo_{}.{}", Uuid::new_v4(), extension));
        std::fs::write(&path, data)?;
        debug!("stored logo at {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\npayload";

    #[test]
    fn test_store_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogoStore::new(dir.path());
        let path = store.store(PNG_MAGIC).unwrap();
        assert_eq!(path.extension().unwrap(), "png");
        assert_eq!(std::fs::read(&path).unwrap(), PNG_MAGIC);
    }

    #[test]
    fn test_store_jpeg_by_magic() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogoStore::new(dir.path());
        let path = store.store(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap();
        assert_eq!(path.extension().unwrap(), "jpg");
    }

    #[test]
    fn test_rejects_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogoStore::new(dir.path());
        assert!(matches!(store.store(b"GIF89a...."), Err(Error::Image(_))));
    }

    #[test]
    fn test_rejects_oversized_upload() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogoStore::new(dir.path());
        let mut big = vec![0xFF, 0xD8];
        big.resize(MAX_LOGO_BYTES + 1, 0);
        let err = store.store(&big).unwrap_err();
        assert!(matches!(err, Error::LogoTooLarge { .. }));
    }

    #[test]
    fn test_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = LogoStore::new(dir.path());
        let first = store.store(PNG_MAGIC).unwrap();
        let second = store.store(PNG_MAGIC).unwrap();
        assert_ne!(first, second);
    }
}
