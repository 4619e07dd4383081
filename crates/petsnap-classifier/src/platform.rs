//! Image size providers

use crate::preprocess::{ErrorCallback, ImageSizeProvider, SizeCallback};
use image::ImageReader;
use petsnap_core::BoxError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Reads image headers from the local filesystem.
///
/// Accepts plain paths and `file://` URIs. The format is sniffed from the
/// file contents, not the extension. Probing runs on tokio's blocking pool
/// when called inside a runtime, inline otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileImageSizeProvider;

impl FileImageSizeProvider {
    pub fn new() -> Self {
        Self
    }

    fn local_path(uri: &str) -> Option<PathBuf> {
        if !uri.contains("://") {
            return Some(PathBuf::from(uri));
        }

        let url = Url::parse(uri).ok()?;
        if url.scheme() != "file" {
            return None;
        }
        url.to_file_path().ok()
    }

    fn read_dimensions(path: &Path) -> Result<(u32, u32), BoxError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        Ok(reader.into_dimensions()?)
    }
}

impl ImageSizeProvider for FileImageSizeProvider {
    fn get_size(&self, uri: &str, on_success: SizeCallback, on_error: ErrorCallback) {
        let Some(path) = Self::local_path(uri) else {
            on_error(format!("unsupported image location '{}'", uri).into());
            return;
        };

        let probe = move || match Self::read_dimensions(&path) {
            Ok((width, height)) => on_success(width, height),
            Err(e) => on_error(e),
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(probe);
            }
            Err(_) => probe(),
        }
    }
}

/// Answers size queries from an in-memory table
#[derive(Debug, Clone, Default)]
pub struct StaticImageSizeProvider {
    sizes: HashMap<String, (u32, u32)>,
}

impl StaticImageSizeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the dimensions reported for `uri`
    pub fn with_image(mut self, uri: impl Into<String>, width: u32, height: u32) -> Self {
        self.sizes.insert(uri.into(), (width, height));
        self
    }
}

impl ImageSizeProvider for StaticImageSizeProvider {
    fn get_size(&self, uri: &str, on_success: SizeCallback, on_error: ErrorCallback) {
        match self.sizes.get(uri) {
            Some(&(width, height)) => on_success(width, height),
            None => on_error(Box::new(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no image registered at '{}'", uri),
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::query_size;

    #[tokio::test]
    async fn test_file_provider_reads_png_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("whiskers.png");
        image::RgbImage::new(12, 7).save(&path).unwrap();

        let provider = FileImageSizeProvider::new();
        let size = query_size(&provider, path.to_str().unwrap()).await.unwrap();
        assert_eq!(size, (12, 7));

        let uri = format!("file://{}", path.display());
        assert_eq!(query_size(&provider, &uri).await.unwrap(), (12, 7));
    }

    #[tokio::test]
    async fn test_file_provider_decodes_percent_encoded_uri() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my cat.png");
        image::RgbImage::new(4, 2).save(&path).unwrap();

        let uri = Url::from_file_path(&path).unwrap().to_string();
        assert!(uri.contains("my%20cat.png"));

        let provider = FileImageSizeProvider::new();
        assert_eq!(query_size(&provider, &uri).await.unwrap(), (4, 2));

        let with_host = uri.replacen("file://", "file://localhost", 1);
        assert_eq!(query_size(&provider, &with_host).await.unwrap(), (4, 2));
    }

    #[tokio::test]
    async fn test_file_provider_sniffs_format_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let named = dir.path().join("photo.png");
        image::RgbImage::new(9, 6).save(&named).unwrap();
        let bare = dir.path().join("photo");
        std::fs::rename(&named, &bare).unwrap();

        let size = query_size(&FileImageSizeProvider::new(), bare.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(size, (9, 6));
    }

    #[tokio::test]
    async fn test_file_provider_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.jpg");

        let result = query_size(&FileImageSizeProvider::new(), path.to_str().unwrap()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_file_provider_rejects_remote_uri() {
        let err = query_size(&FileImageSizeProvider::new(), "https://example.com/dog.jpg")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unsupported image location"));
    }

    #[test]
    fn test_file_provider_without_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inline.png");
        image::RgbImage::new(3, 5).save(&path).unwrap();

        let (tx, rx) = std::sync::mpsc::channel();
        let err_tx = tx.clone();
        FileImageSizeProvider::new().get_size(
            path.to_str().unwrap(),
            Box::new(move |w: u32, h: u32| tx.send(Some((w, h))).unwrap()),
            Box::new(move |_: petsnap_core::BoxError| err_tx.send(None).unwrap()),
        );

        assert_eq!(rx.recv().unwrap(), Some((3, 5)));
    }
}
