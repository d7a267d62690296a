//! Input resolution: validate the user-supplied PDF path.
//!
//! pdfium reports a missing file, a permissions problem and a non-PDF file
//! all as the same opaque load error. Checking the path and the `%PDF` magic
//! bytes up front gives callers an actionable error instead.

use crate::error::Pdf2PptxError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_input(input: impl AsRef<Path>) -> Result<PathBuf, Pdf2PptxError> {
    let path = input.as_ref().to_path_buf();

    if !path.is_file() {
        return Err(Pdf2PptxError::FileNotFound { path });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Pdf2PptxError::PermissionDenied { path });
        }
        Err(_) => return Err(Pdf2PptxError::FileNotFound { path }),
    };

    // Short files are padded with zeros and rejected below.
    let mut magic = [0u8; 4];
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                return Err(Pdf2PptxError::PermissionDenied { path });
            }
            Err(e) => {
                return Err(Pdf2PptxError::CorruptPdf {
                    path,
                    detail: e.to_string(),
                })
            }
        }
    }

    if &magic != b"%PDF" {
        return Err(Pdf2PptxError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_input(dir.path().join("slides.pdf")).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::FileNotFound { .. }));
    }

    #[test]
    fn directory_is_not_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_input(dir.path()).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pdf");
        std::fs::write(&path, b"PK\x03\x04 not a pdf").unwrap();

        match resolve_input(&path).unwrap_err() {
            Pdf2PptxError::NotAPdf { magic, .. } => assert_eq!(&magic, b"PK\x03\x04"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncated_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pdf");
        std::fs::write(&path, b"%P").unwrap();

        let err = resolve_input(&path).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::NotAPdf { .. }));
    }

    #[test]
    fn pdf_header_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slides.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%%EOF\n").unwrap();

        assert_eq!(resolve_input(&path).unwrap(), path);
    }
}
