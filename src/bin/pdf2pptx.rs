//! CLI binary for edgequake-pdf2pptx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_pdf2pptx::config::{DEFAULT_INPUT, DEFAULT_OUTPUT, DEFAULT_TEMP_PREFIX};
use edgequake_pdf2pptx::{
    convert, inspect, ConversionConfig, ConversionProgressCallback, PageSelection,
    ProgressCallback, SlideSize,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar that runs twice, once while pages are
/// rasterised and once while slides are built.
struct CliProgressCallback {
    bar: ProgressBar,
    slides: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_conversion_start`.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            slides: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize, prefix: &'static str) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_position(0);
        self.bar.set_style(progress_style);
        self.bar.set_prefix(prefix);
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar(total_pages, "Rendering");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Converting {total_pages} pages…"))
        ));
    }

    fn on_page_rendered(&self, page_num: usize, _total_pages: usize) {
        self.bar.set_message(format!("page {page_num}"));
        self.bar.inc(1);
    }

    fn on_slide_added(&self, page_num: usize, total_pages: usize) {
        if self.slides.fetch_add(1, Ordering::SeqCst) == 0 {
            self.activate_bar(total_pages, "Building");
        }
        self.bar.set_message(format!("page {page_num}"));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, slide_count: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} slides written",
            green("✔"),
            bold(&slide_count.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Classic one-shot: ./slides.pdf → ./slides.pptx
  pdf2pptx

  # Explicit input and output
  pdf2pptx deck.pdf -o deck.pptx

  # Widescreen slides, lower resolution
  pdf2pptx --slide-size 16:9 --dpi 150 deck.pdf -o deck.pptx

  # Only some pages
  pdf2pptx --pages 3-15 deck.pdf -o excerpt.pptx

  # Keep intermediate images out of the working directory
  pdf2pptx --temp-dir /tmp/pages deck.pdf

  # Inspect PDF metadata
  pdf2pptx --inspect-only deck.pdf

  # JSON summary for scripts
  pdf2pptx --json deck.pdf > result.json

SLIDE SIZES:
  4:3     10in × 7.5in      (default)
  16:9    13.333in × 7.5in
  WxH     custom, in inches (e.g. 11x8.5), 1–56in per side

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to libpdfium (file or directory)
  RUST_LOG                Override log filter (e.g. edgequake_pdf2pptx=debug)

SETUP:
  PDF rendering needs the PDFium shared library. Download a build from
  https://github.com/bblanchon/pdfium-binaries/releases and either place it in
  the working directory or point PDFIUM_LIB_PATH at it.
"#;

/// Convert a PDF deck to a PowerPoint presentation, one page image per slide.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert a PDF deck to a PowerPoint presentation, one page image per slide",
    long_about = "Rasterise every page of a PDF and place each image full-bleed on a blank \
slide of a new .pptx. Run with no arguments to convert ./slides.pdf into ./slides.pptx.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source PDF file.
    #[arg(env = "PDF2PPTX_INPUT", default_value = DEFAULT_INPUT)]
    input: PathBuf,

    /// Presentation to write. An existing file is replaced.
    #[arg(short, long, env = "PDF2PPTX_OUTPUT", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2PPTX_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Slide size: 4:3, 16:9, or <W>x<H> in inches.
    #[arg(long, env = "PDF2PPTX_SLIDE_SIZE", default_value = "4:3")]
    slide_size: String,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2PPTX_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PPTX_PASSWORD")]
    password: Option<String>,

    /// Directory for the intermediate page images.
    #[arg(long, env = "PDF2PPTX_TEMP_DIR", default_value = ".")]
    temp_dir: PathBuf,

    /// File-name prefix of the intermediate page images.
    #[arg(long, env = "PDF2PPTX_TEMP_PREFIX", default_value = DEFAULT_TEMP_PREFIX)]
    temp_prefix: String,

    /// Print the conversion summary (ConversionOutput) as JSON.
    #[arg(long, env = "PDF2PPTX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PPTX_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PPTX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PPTX_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level library logs.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert(&cli.input, &cli.output, &config).context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{}  {} slides  {}ms  →  {}",
            green("✔"),
            output.stats.slide_count,
            output.stats.total_duration_ms,
            bold(&output.output_path.display().to_string()),
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "render {}ms  /  build {}ms  /  {} temp images removed",
                output.stats.render_duration_ms,
                output.stats.build_duration_ms,
                output.stats.temp_files_removed
            )),
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;
    let slide_size = parse_slide_size(&cli.slide_size)?;

    let mut builder = ConversionConfig::builder()
        .dpi(cli.dpi)
        .slide_size(slide_size)
        .pages(pages)
        .temp_dir(cli.temp_dir.clone())
        .temp_prefix(cli.temp_prefix.clone());

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--slide-size` into a `SlideSize`.
fn parse_slide_size(s: &str) -> Result<SlideSize> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "4:3" | "standard" => return Ok(SlideSize::Standard),
        "16:9" | "widescreen" => return Ok(SlideSize::Widescreen),
        _ => {}
    }

    let (w, h) = s
        .split_once('x')
        .with_context(|| format!("Invalid slide size '{s}': expected 4:3, 16:9 or <W>x<H>"))?;
    let width: f64 = w.trim().parse().context("Invalid slide width")?;
    let height: f64 = h.trim().parse().context("Invalid slide height")?;

    if !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0 {
        anyhow::bail!("Slide dimensions must be positive inches (got {width}x{height})");
    }

    Ok(SlideSize::from_inches(width, height))
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(&p) = pages.iter().find(|&&p| p < 1) {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_slide_sizes() {
        assert_eq!(parse_slide_size("4:3").unwrap(), SlideSize::Standard);
        assert_eq!(parse_slide_size(" 16:9 ").unwrap(), SlideSize::Widescreen);
        assert_eq!(parse_slide_size("Widescreen").unwrap(), SlideSize::Widescreen);
    }

    #[test]
    fn custom_slide_size_in_inches() {
        assert_eq!(
            parse_slide_size("11x8.5").unwrap(),
            SlideSize::Custom {
                width: 10_058_400,
                height: 7_772_400
            }
        );
        assert!(parse_slide_size("11by8").is_err());
        assert!(parse_slide_size("-3x4").is_err());
    }

    #[test]
    fn page_specs() {
        assert!(matches!(parse_pages("all").unwrap(), PageSelection::All));
        assert!(matches!(parse_pages("5").unwrap(), PageSelection::Single(5)));
        assert!(matches!(parse_pages("3-15").unwrap(), PageSelection::Range(3, 15)));
        match parse_pages("1, 3,5").unwrap() {
            PageSelection::Set(v) => assert_eq!(v, vec![1, 3, 5]),
            other => panic!("unexpected {other:?}"),
        }
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("9-2").is_err());
    }

    #[test]
    fn no_arguments_means_classic_defaults() {
        let cli = Cli::try_parse_from(["pdf2pptx"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("slides.pdf"));
        assert_eq!(cli.output, PathBuf::from("slides.pptx"));
        assert_eq!(cli.dpi, 300);
        assert_eq!(cli.temp_prefix, "temp_slide_");
    }

    #[test]
    fn dpi_out_of_range_is_rejected() {
        assert!(Cli::try_parse_from(["pdf2pptx", "--dpi", "1200"]).is_err());
    }
}
