//! Conversion entry points.
//!
//! [`convert`] runs the whole pipeline on a PDF path. [`convert_images`] starts
//! after rasterisation, for callers that already hold page images (and for
//! tests that run without pdfium). Both save the deck exactly once, and only
//! then delete the intermediate page files.

use crate::config::ConversionConfig;
use crate::error::Pdf2PptxError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::tempfiles::TempImageSet;
use crate::pipeline::{build, engine, input, render};
use image::DynamicImage;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Convert a PDF file to a PowerPoint presentation.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — Path to the source PDF
/// * `output` — Path of the `.pptx` to write; an existing file is replaced
/// * `config` — Conversion configuration
///
/// # Errors
/// Every error is fatal and nothing is written to `output`:
/// - File not found / permission denied / not a PDF
/// - pdfium library unavailable
/// - Password missing or wrong
/// - A page failed to render, or its image could not be written or embedded
/// - The package could not be written
///
/// A zero-page PDF is not an error; it produces a deck with no slides.
pub fn convert(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let total_start = Instant::now();
    info!("Starting conversion: {}", input.as_ref().display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_input(input)?;

    // ── Step 2: Bind pdfium ──────────────────────────────────────────────
    let pdfium = engine::bind_engine()?;

    // ── Step 3: Open the document and extract metadata ───────────────────
    let document = render::open_document(&pdfium, &pdf_path, config.password.as_deref())?;
    let metadata = render::extract_metadata(&document)?;
    let total_pages = metadata.page_count;
    info!("PDF has {} pages", total_pages);

    // ── Step 4: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() && total_pages > 0 {
        return Err(Pdf2PptxError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!("Selected {} pages for conversion", page_indices.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(page_indices.len());
    }

    // ── Step 5: Rasterise every page before building any slide ───────────
    let render_start = Instant::now();
    let rendered = render::render_pages(
        &document,
        config.dpi,
        &page_indices,
        config.progress_callback.as_ref(),
    )?;
    drop(document);
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} pages in {}ms",
        rendered.len(),
        render_duration_ms
    );

    // ── Steps 6–8: Temp files, slides, save, cleanup ─────────────────────
    assemble(
        rendered,
        output.as_ref(),
        config,
        metadata,
        render_duration_ms,
        total_start,
    )
}

/// Build and save a presentation from page images that are already in memory.
///
/// Each image becomes one slide, in iteration order. The temp files are
/// written to `config.temp_dir` exactly as [`convert`] would write them.
/// `config.dpi`, `config.pages` and `config.password` are not used.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2pptx::{convert_images, ConversionConfig};
/// use image::{DynamicImage, RgbImage};
///
/// let pages = vec![DynamicImage::ImageRgb8(RgbImage::new(1000, 750)); 3];
/// let out = convert_images(pages, "deck.pptx", &ConversionConfig::default())?;
/// assert_eq!(out.stats.slide_count, 3);
/// # Ok::<(), edgequake_pdf2pptx::Pdf2PptxError>(())
/// ```
pub fn convert_images(
    pages: impl IntoIterator<Item = DynamicImage>,
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let total_start = Instant::now();
    let rendered: Vec<(usize, DynamicImage)> = pages.into_iter().enumerate().collect();
    info!("Building presentation from {} page images", rendered.len());

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(rendered.len());
        for (idx, _) in &rendered {
            cb.on_page_rendered(idx + 1, rendered.len());
        }
    }

    let metadata = DocumentMetadata {
        page_count: rendered.len(),
        ..Default::default()
    };

    assemble(rendered, output.as_ref(), config, metadata, 0, total_start)
}

/// Convert PDF bytes in memory to a presentation.
///
/// Internally the library writes `bytes` to a managed [`tempfile`] that is
/// removed on return.
///
/// # Example
/// ```rust,no_run
/// use edgequake_pdf2pptx::{convert_from_bytes, ConversionConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes: Vec<u8> = std::fs::read("slides.pdf")?;
/// let output = convert_from_bytes(&bytes, "slides.pptx", &ConversionConfig::default())?;
/// println!("{} slides", output.stats.slide_count);
/// # Ok(())
/// # }
/// ```
pub fn convert_from_bytes(
    bytes: &[u8],
    output: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| Pdf2PptxError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .and_then(|()| tmp.flush())
        .map_err(|e| Pdf2PptxError::Internal(format!("tempfile write: {e}")))?;
    // `tmp` is dropped (and the file deleted) when `convert` returns
    convert(tmp.path(), output, config)
}

/// Extract PDF metadata without converting anything.
pub fn inspect(input: impl AsRef<Path>) -> Result<DocumentMetadata, Pdf2PptxError> {
    let pdf_path = input::resolve_input(input)?;
    let pdfium = engine::bind_engine()?;
    let document = render::open_document(&pdfium, &pdf_path, None)?;
    render::extract_metadata(&document)
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Temp files → slides → save → cleanup.
///
/// The temp set is dropped on every early return, so the page images are
/// removed even when building or saving fails. On success the explicit
/// `cleanup` runs strictly after the save.
fn assemble(
    rendered: Vec<(usize, DynamicImage)>,
    output: &Path,
    config: &ConversionConfig,
    metadata: DocumentMetadata,
    render_duration_ms: u64,
    total_start: Instant,
) -> Result<ConversionOutput, Pdf2PptxError> {
    let build_start = Instant::now();
    let mut temp = TempImageSet::new(&config.temp_dir, config.temp_prefix.as_str());

    let mut pres = build::build_presentation(
        &rendered,
        config.slide_size,
        &mut temp,
        config.progress_callback.as_ref(),
    )?;
    drop(rendered);

    if let Some(ref title) = metadata.title {
        pres.set_title(title.as_str());
    }

    pres.save(output)?;
    info!(
        "Saved {} slides to {}",
        pres.slide_count(),
        output.display()
    );

    let temp_files_removed = temp.cleanup();
    debug!(
        "Removed {} temp page images from {}",
        temp_files_removed,
        temp.dir().display()
    );

    let stats = ConversionStats {
        total_pages: metadata.page_count,
        slide_count: pres.slide_count(),
        temp_files_removed,
        render_duration_ms,
        build_duration_ms: build_start.elapsed().as_millis() as u64,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} slides, {}ms total",
        stats.slide_count, stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(stats.slide_count);
    }

    Ok(ConversionOutput {
        output_path: output.to_path_buf(),
        metadata,
        stats,
    })
}
