//! # edgequake-pdf2pptx
//!
//! Turn a PDF deck into a PowerPoint presentation, one picture per slide.
//!
//! Every page is rasterised with pdfium and placed full-bleed on a blank
//! slide. Text is not extracted and nothing is re-flowed: the output looks
//! exactly like the PDF, and is exactly as editable as a stack of images.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate the path and %PDF header
//!  ├─ 2. Engine    bind libpdfium (PDFIUM_LIB_PATH, ./, system)
//!  ├─ 3. Render    rasterise every selected page at `dpi`
//!  ├─ 4. Temp      write temp_slide_<n>.png per page
//!  ├─ 5. Build     blank slide + picture at (0,0) sized to the slide
//!  ├─ 6. Save      zip the OOXML package, atomic rename into place
//!  └─ 7. Cleanup   delete the temp PNGs (also on failure)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdf2pptx::{convert, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("slides.pdf", "slides.pptx", &config)?;
//!     eprintln!("{} slides in {}ms",
//!         output.stats.slide_count,
//!         output.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## Runtime requirement
//!
//! pdfium is loaded dynamically. Point `PDFIUM_LIB_PATH` at the library (or
//! its directory), drop it in the working directory, or install it system
//! wide. [`convert_images`] and [`Presentation`] work without it.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod pptx;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PageSelection, SlideSize};
pub use convert::{convert, convert_from_bytes, convert_images, inspect};
pub use error::Pdf2PptxError;
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata};
pub use pptx::Presentation;
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
