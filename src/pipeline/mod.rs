//! Pipeline stages for PDF-to-PPTX conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ engine ──▶ render ──▶ tempfiles ⇄ build ──▶ pptx save ──▶ cleanup
//! (path)    (pdfium)   (pixels)   (PNG on disk)  (slides)  (zip)       (Drop)
//! ```
//!
//! 1. [`input`]  — validate the PDF path and its `%PDF` header
//! 2. [`engine`] — bind the native pdfium library
//! 3. [`render`] — rasterise every selected page before any slide is built
//! 4. [`tempfiles`] — write each page to `<prefix><n>.png`; owns deletion
//! 5. [`build`]  — one blank slide per page, picture stretched to the slide

pub mod build;
pub mod engine;
pub mod input;
pub mod render;
pub mod tempfiles;
