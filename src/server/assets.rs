//! Haar cascade files for the in-browser face and eye detector.
//!
//! The files are read from disk on every request and served verbatim.

use std::path::PathBuf;

use hyper::body::Bytes;
use tracing::debug;

use crate::error::ApiError;

/// A cascade file the live-tracking page loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeAsset {
    FrontalFace,
    Eye,
}

impl CascadeAsset {
    pub const ALL: [CascadeAsset; 2] = [CascadeAsset::FrontalFace, CascadeAsset::Eye];

    /// File name on disk and in the URL.
    pub fn file_name(&self) -> &'static str {
        match self {
            CascadeAsset::FrontalFace => "haarcascade_frontalface_alt2.xml",
            CascadeAsset::Eye => "haarcascade_eye.xml",
        }
    }

    /// Match a request path, with or without the `/models` prefix.
    pub fn from_path(path: &str) -> Option<Self> {
        let path = path.strip_prefix("/models").unwrap_or(path);
        let name = path.strip_prefix('/')?;
        Self::ALL.into_iter().find(|asset| asset.file_name() == name)
    }
}

/// Reads cascade files from a directory.
#[derive(Debug, Clone)]
pub struct AssetStore {
    dir: PathBuf,
}

impl AssetStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read an asset's bytes.
    pub async fn load(&self, asset: CascadeAsset) -> Result<Bytes, ApiError> {
        let path = self.dir.join(asset.file_name());
        debug!(path = %path.display(), "Serving cascade file");

        tokio::fs::read(&path)
            .await
            .map(Bytes::from)
            .map_err(|source| ApiError::Asset {
                name: asset.file_name().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn paths_match_with_and_without_models_prefix() {
        assert_eq!(
            CascadeAsset::from_path("/haarcascade_eye.xml"),
            Some(CascadeAsset::Eye)
        );
        assert_eq!(
            CascadeAsset::from_path("/models/haarcascade_frontalface_alt2.xml"),
            Some(CascadeAsset::FrontalFace)
        );
        assert_eq!(CascadeAsset::from_path("/models/other.xml"), None);
        assert_eq!(CascadeAsset::from_path("haarcascade_eye.xml"), None);
        assert_eq!(CascadeAsset::from_path("/modelshaarcascade_eye.xml"), None);
    }

    #[tokio::test]
    async fn load_reads_file_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let xml = "<?xml version=\"1.0\"?>\n<opencv_storage/>\n";
        std::fs::write(dir.path().join("haarcascade_eye.xml"), xml).unwrap();

        let store = AssetStore::new(dir.path());
        let bytes = store.load(CascadeAsset::Eye).await.unwrap();
        assert_eq!(bytes, Bytes::from(xml));
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path());

        let err = store.load(CascadeAsset::FrontalFace).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(err.to_string().contains("haarcascade_frontalface_alt2.xml"));
    }
}
