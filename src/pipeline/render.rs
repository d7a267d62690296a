//! PDF rasterisation: render selected pages to `DynamicImage` via pdfium.
//!
//! PDF user space is 72 points per inch, so a page rendered at `dpi` comes out
//! at `points × dpi / 72` pixels on each axis. Every selected page is rendered
//! before any slide is built; the caller receives the whole ordered sequence.
//!
//! The document is opened once per conversion with [`open_document`] and
//! shared by [`extract_metadata`] and [`render_pages`].

use crate::error::Pdf2PptxError;
use crate::output::DocumentMetadata;
use crate::progress::ProgressCallback;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Open `pdf_path`, mapping pdfium's load errors onto password and corruption
/// errors.
pub fn open_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, Pdf2PptxError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                Pdf2PptxError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                Pdf2PptxError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            Pdf2PptxError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Pixel length of a `points`-long page edge at `dpi`. Never less than 1.
pub(crate) fn target_pixels(points: f32, dpi: u32) -> i32 {
    let scale = dpi as f32 / 72.0;
    ((points * scale).round() as i32).max(1)
}

/// Rasterise selected pages of a PDF into images.
///
/// # Returns
/// A vector of `(page_index_0based, DynamicImage)` tuples in document order.
///
/// # Errors
/// An index at or beyond the page count is a [`Pdf2PptxError::PageOutOfRange`];
/// nothing is rendered in that case.
pub fn render_pages(
    document: &PdfDocument<'_>,
    dpi: u32,
    page_indices: &[usize],
    progress: Option<&ProgressCallback>,
) -> Result<Vec<(usize, DynamicImage)>, Pdf2PptxError> {
    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!(
        "PDF loaded: {} pages, rendering {} at {} DPI",
        total_pages,
        page_indices.len(),
        dpi
    );

    if let Some(&idx) = page_indices.iter().find(|&&i| i >= total_pages) {
        return Err(Pdf2PptxError::PageOutOfRange {
            page: idx + 1,
            total: total_pages,
        });
    }

    let mut results = Vec::with_capacity(page_indices.len());

    for &idx in page_indices {
        let page = pages
            .get(idx as u16)
            .map_err(|e| Pdf2PptxError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let width_px = target_pixels(page.width().value, dpi);
        let height_px = target_pixels(page.height().value, dpi);

        let render_config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            Pdf2PptxError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push((idx, image));

        if let Some(cb) = progress {
            cb.on_page_rendered(idx + 1, page_indices.len());
        }
    }

    Ok(results)
}

/// Read document metadata without rendering pages.
pub fn extract_metadata(document: &PdfDocument<'_>) -> Result<DocumentMetadata, Pdf2PptxError> {
    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().trim().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a4_at_300_dpi() {
        // A4 is 595.28 × 841.89 pt.
        assert_eq!(target_pixels(595.28, 300), 2480);
        assert_eq!(target_pixels(841.89, 300), 3508);
    }

    #[test]
    fn letter_at_72_dpi_is_one_to_one() {
        assert_eq!(target_pixels(612.0, 72), 612);
        assert_eq!(target_pixels(792.0, 72), 792);
    }

    #[test]
    fn degenerate_page_still_gets_a_pixel() {
        assert_eq!(target_pixels(0.0, 300), 1);
    }
}
