//! Intermediate page images on disk.
//!
//! The slide builder embeds pictures from file paths, so every rendered page
//! is first written to `<dir>/<prefix><index>.png`. The index is the page's
//! position in the converted sequence: two pages with identical pixels still
//! get two files.
//!
//! [`TempImageSet`] owns those files. A path is registered *before* its write
//! is attempted, so a half-written file is still removed. Cleanup runs on
//! [`TempImageSet::cleanup`] and again on drop; both are best-effort and never
//! fail.

use crate::error::Pdf2PptxError;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scoped owner of the per-page PNG files of one conversion.
#[derive(Debug)]
pub struct TempImageSet {
    dir: PathBuf,
    prefix: String,
    paths: Vec<PathBuf>,
}

impl TempImageSet {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            paths: Vec::new(),
        }
    }

    /// File name for the page at `index` in the converted sequence.
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}{}.png", self.prefix, index))
    }

    /// Write `image` as PNG to the file for `index` and return its path.
    pub fn write(&mut self, index: usize, image: &DynamicImage) -> Result<PathBuf, Pdf2PptxError> {
        let path = self.path_for(index);
        if !self.paths.contains(&path) {
            self.paths.push(path.clone());
        }

        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| Pdf2PptxError::TempImageWriteFailed {
                path: path.clone(),
                source: e,
            })?;

        debug!("Wrote page image {}", path.display());
        Ok(path)
    }

    /// Paths registered so far, in write order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete every registered file. Returns how many were actually removed.
    ///
    /// Missing files and permission errors are logged and skipped. The set is
    /// empty afterwards, so a second call (or the drop) is a no-op.
    pub fn cleanup(&mut self) -> usize {
        let mut removed = 0;
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => debug!("Could not remove {}: {}", path.display(), e),
            }
        }
        removed
    }
}

impl Drop for TempImageSet {
    fn drop(&mut self) {
        let removed = self.cleanup();
        if removed > 0 {
            debug!("Removed {} leftover page image(s) on drop", removed);
        }
    }
}
