//! Error types for the edgequake-pdf2pptx library.
//!
//! Every failure that stops a conversion is a [`Pdf2PptxError`]. There is no
//! page-level error type: a deck with a missing slide is worse than no deck,
//! so the first failing page aborts the run and nothing is written to the
//! output path.
//!
//! The one class of failure that is *not* represented here is temp-file
//! cleanup. Deleting intermediate PNGs is best-effort and never surfaces as
//! an error (see [`crate::pipeline::tempfiles`]).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-pdf2pptx library.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Temp image errors ─────────────────────────────────────────────────
    /// A rendered page could not be written to its intermediate PNG.
    #[error("Failed to write page image '{path}': {source}")]
    TempImageWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    // ── Slide errors ──────────────────────────────────────────────────────
    /// The image file backing a slide could not be read.
    #[error("Failed to read slide image '{path}': {source}")]
    ImageReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The image bytes are neither PNG nor JPEG.
    #[error("Unsupported image format in '{path}' (expected PNG or JPEG)")]
    UnsupportedImage { path: PathBuf },

    // ── Package errors ────────────────────────────────────────────────────
    /// The zip container could not be assembled.
    #[error("Failed to assemble PPTX package: {0}")]
    Package(#[from] zip::result::ZipError),

    /// Formatting an XML part failed.
    #[error("Failed to generate PPTX XML: {0}")]
    Xml(#[from] std::fmt::Error),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output presentation file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF rendering needs the PDFium shared library. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium (or its directory).\n\
  • Place libpdfium next to the working directory.\n\
  • Install it system-wide from https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_out_of_range_display() {
        let e = Pdf2PptxError::PageOutOfRange { page: 12, total: 3 };
        let msg = e.to_string();
        assert!(msg.contains("Page 12"), "got: {msg}");
        assert!(msg.contains("3 pages"), "got: {msg}");
    }

    #[test]
    fn image_read_failed_keeps_source() {
        use std::error::Error as _;

        let e = Pdf2PptxError::ImageReadFailed {
            path: PathBuf::from("temp_slide_4.png"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert!(e.to_string().contains("temp_slide_4.png"));
        assert!(e.source().is_some());
    }

    #[test]
    fn binding_failure_mentions_env_override() {
        let e = Pdf2PptxError::PdfiumBindingFailed("no library".into());
        let msg = e.to_string();
        assert!(msg.contains("no library"));
        assert!(msg.contains("PDFIUM_LIB_PATH"));
    }

    #[test]
    fn not_a_pdf_shows_magic() {
        let e = Pdf2PptxError::NotAPdf {
            path: PathBuf::from("deck.pdf"),
            magic: *b"PK\x03\x04",
        };
        assert!(e.to_string().contains("deck.pdf"));
    }
}
