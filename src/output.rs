//! Result types returned by the conversion entry points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Metadata read from the source PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Timing and counts for one conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the source PDF.
    pub total_pages: usize,
    /// Slides written to the output deck (one per converted page).
    pub slide_count: usize,
    /// Intermediate page images deleted after the save.
    pub temp_files_removed: usize,
    pub render_duration_ms: u64,
    /// Temp-image writing, slide building and package save.
    pub build_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything a caller needs to report on a finished conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Where the presentation was written.
    pub output_path: PathBuf,
    pub metadata: DocumentMetadata,
    pub stats: ConversionStats,
}
