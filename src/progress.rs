//! Progress-callback trait for per-page conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as the pipeline renders pages and builds slides.
//!
//! Events arrive in pipeline order: one `on_conversion_start`, one
//! `on_page_rendered` per page (all of them, since rasterisation finishes
//! before slide building starts), one `on_slide_added` per page, and finally
//! `on_conversion_complete` once the deck has been saved.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdf2pptx::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     slides: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_slide_added(&self, page_num: usize, total_pages: usize) {
//!         let done = self.slides.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("slide {done}: page {page_num}/{total_pages}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { slides: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the conversion pipeline as it processes each page.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The pipeline itself is sequential; `Send + Sync` is
/// required so a callback can be shared with other threads (a UI, a channel
/// forwarder) by the host application.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any page is rendered.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be converted
    fn on_conversion_start(&self, total_pages: usize) {
        let _ = total_pages;
    }

    /// Called after a page has been rasterised.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number in the source PDF
    /// * `total_pages` — number of pages being converted
    fn on_page_rendered(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called after a page image has been placed on its slide.
    fn on_slide_added(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once after the presentation has been saved.
    ///
    /// # Arguments
    /// * `slide_count` — slides written to the output deck
    fn on_conversion_complete(&self, slide_count: usize) {
        let _ = slide_count;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        rendered: AtomicUsize,
        added: AtomicUsize,
        completed: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total_pages: usize) {
            self.started_total.store(total_pages, Ordering::SeqCst);
        }

        fn on_page_rendered(&self, _page_num: usize, _total_pages: usize) {
            self.rendered.fetch_add(1, Ordering::SeqCst);
        }

        fn on_slide_added(&self, _page_num: usize, _total_pages: usize) {
            self.added.fetch_add(1, Ordering::SeqCst);
        }

        fn on_conversion_complete(&self, slide_count: usize) {
            self.completed.store(slide_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(5);
        cb.on_page_rendered(1, 5);
        cb.on_slide_added(1, 5);
        cb.on_conversion_complete(5);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(2);
        tracker.on_page_rendered(1, 2);
        tracker.on_page_rendered(2, 2);
        tracker.on_slide_added(1, 2);
        tracker.on_slide_added(2, 2);
        tracker.on_conversion_complete(2);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.rendered.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.added.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completed.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn ConversionProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(10);
        cb.on_slide_added(1, 10);
    }
}
