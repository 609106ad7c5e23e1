//! Letterhead logo loading.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Why the logo was left out of the letterhead.
#[derive(Debug, Error)]
pub enum AssetLoadError {
    #[error("failed to read logo {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("logo {path} is not a PNG, JPEG or GIF image")]
    UnrecognizedImage { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
}

impl ImageFormat {
    /// Detect the image format from magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else {
            None
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }
}

/// Logo bytes read into memory; the file handle is closed once loaded.
#[derive(Debug, Clone)]
pub struct LogoAsset {
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
}

impl LogoAsset {
    pub fn from_bytes(bytes: Vec<u8>) -> Option<Self> {
        ImageFormat::detect(&bytes).map(|format| Self { bytes, format })
    }

    /// File name the image takes inside the compilation directory.
    pub fn file_name(&self) -> String {
        format!("logo.{}", self.format.extension())
    }
}

pub fn load_logo(path: &Path) -> Result<LogoAsset, AssetLoadError> {
    let bytes = fs::read(path).map_err(|source| AssetLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    LogoAsset::from_bytes(bytes).ok_or_else(|| AssetLoadError::UnrecognizedImage {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_detect_formats() {
        assert_eq!(
            ImageFormat::detect(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect(b"GIF89a..."), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::detect(b"%PDF-1.7"), None);
        assert_eq!(ImageFormat::detect(b""), None);
    }

    #[test]
    fn test_missing_logo() {
        let err = load_logo(Path::new("/nonexistent/logo.jpeg")).unwrap_err();
        assert!(matches!(err, AssetLoadError::Io { .. }));
    }

    #[test]
    fn test_corrupt_logo() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not an image").unwrap();
        let err = load_logo(file.path()).unwrap_err();
        assert!(matches!(err, AssetLoadError::UnrecognizedImage { .. }));
    }

    #[test]
    fn test_jpeg_logo() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]).unwrap();
        let logo = load_logo(file.path()).unwrap();
        assert_eq!(logo.format, ImageFormat::Jpeg);
        assert_eq!(logo.file_name(), "logo.jpeg");
    }
}
