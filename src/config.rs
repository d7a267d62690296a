//! Configuration types for PDF-to-PPTX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The defaults reproduce the classic
//! one-shot behaviour: 300 DPI, a 10" × 7.5" deck, every page, and
//! `temp_slide_<n>.png` intermediates in the working directory.

use crate::error::Pdf2PptxError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// English Metric Units per inch (OOXML length unit).
pub const EMU_PER_INCH: i64 = 914_400;

/// Smallest slide edge PowerPoint accepts (1 inch).
pub const MIN_SLIDE_EMU: i64 = 914_400;

/// Largest slide edge PowerPoint accepts (56 inches).
pub const MAX_SLIDE_EMU: i64 = 51_206_400;

/// Default input file name.
pub const DEFAULT_INPUT: &str = "slides.pdf";

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "slides.pptx";

/// Default prefix for intermediate page images.
pub const DEFAULT_TEMP_PREFIX: &str = "temp_slide_";

/// Configuration for a PDF-to-PPTX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use edgequake_pdf2pptx::{ConversionConfig, SlideSize};
///
/// let config = ConversionConfig::builder()
///     .dpi(200)
///     .slide_size(SlideSize::Widescreen)
///     .build()
///     .unwrap();
/// assert_eq!(config.slide_size.dimensions(), (12_192_000, 6_858_000));
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 300.
    ///
    /// Page pixel size is `points × dpi / 72` on each axis, so an A4 page at
    /// 300 DPI comes out at 2480 × 3508 px.
    pub dpi: u32,

    /// Size of every slide in the output deck. Default: [`SlideSize::Standard`].
    pub slide_size: SlideSize,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Directory receiving the intermediate page PNGs. Default: `.`.
    pub temp_dir: PathBuf,

    /// File-name prefix of the intermediate page PNGs. Default: `temp_slide_`.
    ///
    /// The page's position in the converted sequence is appended, followed by
    /// `.png`.
    pub temp_prefix: String,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            slide_size: SlideSize::default(),
            pages: PageSelection::default(),
            password: None,
            temp_dir: PathBuf::from("."),
            temp_prefix: DEFAULT_TEMP_PREFIX.to_string(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("slide_size", &self.slide_size)
            .field("pages", &self.pages)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("temp_dir", &self.temp_dir)
            .field("temp_prefix", &self.temp_prefix)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn slide_size(mut self, size: SlideSize) -> Self {
        self.config.slide_size = size;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = dir.into();
        self
    }

    pub fn temp_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.temp_prefix = prefix.into();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PptxError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        c.slide_size.validate()?;
        if c.temp_prefix.is_empty() {
            return Err(Pdf2PptxError::InvalidConfig(
                "Temp file prefix must not be empty".into(),
            ));
        }
        if c.temp_prefix.contains(['/', '\\']) {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "Temp file prefix must be a bare file name, got '{}'",
                c.temp_prefix
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Slide dimensions of the output deck.
///
/// Every page image is stretched to exactly these dimensions, whatever the
/// aspect ratio of the source page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SlideSize {
    /// 10" × 7.5" (4:3). (default)
    #[default]
    Standard,
    /// 13.333" × 7.5" (16:9).
    Widescreen,
    /// Explicit size in EMU.
    Custom { width: i64, height: i64 },
}

impl SlideSize {
    /// Build a custom size from inches.
    pub fn from_inches(width: f64, height: f64) -> Self {
        SlideSize::Custom {
            width: (width * EMU_PER_INCH as f64).round() as i64,
            height: (height * EMU_PER_INCH as f64).round() as i64,
        }
    }

    /// `(width, height)` in EMU.
    pub fn dimensions(&self) -> (i64, i64) {
        match self {
            SlideSize::Standard => (9_144_000, 6_858_000),
            SlideSize::Widescreen => (12_192_000, 6_858_000),
            SlideSize::Custom { width, height } => (*width, *height),
        }
    }

    fn validate(&self) -> Result<(), Pdf2PptxError> {
        let (w, h) = self.dimensions();
        for (axis, v) in [("width", w), ("height", h)] {
            if !(MIN_SLIDE_EMU..=MAX_SLIDE_EMU).contains(&v) {
                return Err(Pdf2PptxError::InvalidConfig(format!(
                    "Slide {axis} must be 1–56 inches ({MIN_SLIDE_EMU}–{MAX_SLIDE_EMU} EMU), got {v} EMU"
                )));
            }
        }
        Ok(())
    }
}

/// Specifies which pages of the PDF to convert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Convert all pages (default).
    #[default]
    All,
    /// Convert a single page (1-indexed).
    Single(usize),
    /// Convert a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Convert specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// First requested page number, used when reporting an empty selection.
    pub(crate) fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 0,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_one_shot_behaviour() {
        let c = ConversionConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.slide_size.dimensions(), (9_144_000, 6_858_000));
        assert_eq!(c.temp_dir, PathBuf::from("."));
        assert_eq!(c.temp_prefix, "temp_slide_");
        assert!(matches!(c.pages, PageSelection::All));
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = ConversionConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.dpi, 72);
        let c = ConversionConfig::builder().dpi(5000).build().unwrap();
        assert_eq!(c.dpi, 600);
    }

    #[test]
    fn slide_size_from_inches() {
        assert_eq!(
            SlideSize::from_inches(10.0, 7.5).dimensions(),
            SlideSize::Standard.dimensions()
        );
    }

    #[test]
    fn tiny_custom_slide_is_rejected() {
        let err = ConversionConfig::builder()
            .slide_size(SlideSize::Custom {
                width: 100,
                height: 6_858_000,
            })
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("width"), "got: {err}");
    }

    #[test]
    fn prefix_with_separator_is_rejected() {
        assert!(ConversionConfig::builder()
            .temp_prefix("../escape_")
            .build()
            .is_err());
        assert!(ConversionConfig::builder().temp_prefix("").build().is_err());
    }

    #[test]
    fn debug_redacts_password() {
        let c = ConversionConfig::builder().password("hunter2").build().unwrap();
        let dbg = format!("{c:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::All.to_indices(0), Vec::<usize>::new());
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }

    #[test]
    fn first_requested_page() {
        assert_eq!(PageSelection::Set(vec![9, 4, 7]).first_requested(), 4);
        assert_eq!(PageSelection::Range(3, 8).first_requested(), 3);
    }
}
