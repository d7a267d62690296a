//! PDFium binding: locate and load the native rendering library.
//!
//! Search order:
//!
//! 1. `PDFIUM_LIB_PATH`, either the library file itself or a directory
//!    containing the platform library (`libpdfium.so`, `libpdfium.dylib`,
//!    `pdfium.dll`).
//! 2. The platform library in the current working directory.
//! 3. The system library search path.
//!
//! A missing library is fatal; there is no fallback renderer.

use crate::error::Pdf2PptxError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming an explicit pdfium library (file or directory).
pub const PDFIUM_LIB_PATH_ENV: &str = "PDFIUM_LIB_PATH";

/// Bind to the first pdfium library found, in search order.
pub fn bind_engine() -> Result<Pdfium, Pdf2PptxError> {
    let env_value = std::env::var_os(PDFIUM_LIB_PATH_ENV).map(PathBuf::from);
    let mut attempts = Vec::new();

    for candidate in candidate_paths(env_value.as_deref()) {
        debug!("Trying pdfium library at {}", candidate.display());
        match Pdfium::bind_to_library(&candidate) {
            Ok(bindings) => {
                info!("Bound pdfium from {}", candidate.display());
                return Ok(Pdfium::new(bindings));
            }
            Err(e) => attempts.push(format!("{}: {e}", candidate.display())),
        }
    }

    debug!("Trying system pdfium library");
    Pdfium::bind_to_system_library()
        .map(|bindings| {
            info!("Bound system pdfium library");
            Pdfium::new(bindings)
        })
        .map_err(|e| {
            attempts.push(format!("system library: {e}"));
            Pdf2PptxError::PdfiumBindingFailed(attempts.join("; "))
        })
}

/// Explicit library paths to try before the system library.
fn candidate_paths(env_value: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(2);

    if let Some(p) = env_value.filter(|p| !p.as_os_str().is_empty()) {
        if p.is_dir() {
            paths.push(Pdfium::pdfium_platform_library_name_at_path(p));
        } else {
            paths.push(p.to_path_buf());
        }
    }

    paths.push(Pdfium::pdfium_platform_library_name_at_path("./"));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn working_directory_is_always_searched() {
        let paths = candidate_paths(None);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].to_string_lossy().contains("pdfium"));
    }

    #[test]
    fn env_file_is_tried_first() {
        let paths = candidate_paths(Some(Path::new("/opt/pdfium/lib/libpdfium.so")));
        assert_eq!(paths[0], PathBuf::from("/opt/pdfium/lib/libpdfium.so"));
        assert_eq!(paths.len(), 2);
    }

    #[test]
    fn env_directory_gets_platform_name() {
        let dir = tempfile::tempdir().unwrap();
        let paths = candidate_paths(Some(dir.path()));
        assert!(paths[0].starts_with(dir.path()));
        assert_ne!(paths[0], dir.path());
    }

    #[test]
    fn empty_env_value_is_ignored() {
        assert_eq!(candidate_paths(Some(Path::new(""))).len(), 1);
    }
}
