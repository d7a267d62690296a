//! Slide assembly: one blank slide per page image, picture stretched to fill.
//!
//! Pages are processed in sequence order. For each one the image is written
//! to its temp file, a slide is appended and the file is embedded at (0, 0)
//! with the slide's full width and height. Source pages whose aspect ratio
//! differs from the slide are distorted, not letterboxed.

use super::tempfiles::TempImageSet;
use crate::config::SlideSize;
use crate::error::Pdf2PptxError;
use crate::pptx::Presentation;
use crate::progress::ProgressCallback;
use image::DynamicImage;
use tracing::debug;

/// Build a presentation from `(page_index_0based, image)` pairs.
///
/// Temp file names come from each pair's position in `pages`, not from the
/// page index or the pixels, so the mapping stays one-to-one whatever the
/// selection looks like.
pub fn build_presentation(
    pages: &[(usize, DynamicImage)],
    slide_size: SlideSize,
    temp: &mut TempImageSet,
    progress: Option<&ProgressCallback>,
) -> Result<Presentation, Pdf2PptxError> {
    let mut pres = Presentation::new(slide_size);
    let (width, height) = (pres.slide_width(), pres.slide_height());
    let total = pages.len();

    for (position, (page_idx, image)) in pages.iter().enumerate() {
        let image_path = temp.write(position, image)?;

        pres.add_slide()
            .add_picture(&image_path, 0, 0, width, height)?;

        debug!(
            "Slide {} ← page {} ({})",
            position + 1,
            page_idx + 1,
            image_path.display()
        );

        if let Some(cb) = progress {
            cb.on_slide_added(page_idx + 1, total);
        }
    }

    Ok(pres)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn page(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([200, 200, 200])))
    }

    #[derive(Default)]
    struct SlideCounter(AtomicUsize);

    impl crate::progress::ConversionProgressCallback for SlideCounter {
        fn on_slide_added(&self, _page_num: usize, _total_pages: usize) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn one_full_bleed_slide_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let mut temp = TempImageSet::new(dir.path(), "temp_slide_");
        let pages = vec![(0, page(8, 11)), (1, page(8, 11)), (2, page(11, 8))];

        let pres = build_presentation(&pages, SlideSize::Standard, &mut temp, None).unwrap();

        assert_eq!(pres.slide_count(), 3);
        assert_eq!(pres.slide_size(), SlideSize::Standard);
        for slide in pres.slides() {
            assert_eq!(slide.pictures().len(), 1);
            let pic = &slide.pictures()[0];
            assert_eq!(pic.offset(), (0, 0));
            assert_eq!(pic.extent(), (9_144_000, 6_858_000));
        }
    }

    #[test]
    fn temp_names_follow_position_not_page_number() {
        let dir = tempfile::tempdir().unwrap();
        let mut temp = TempImageSet::new(dir.path(), "temp_slide_");
        let pages = vec![(4, page(2, 2)), (9, page(2, 2))];

        build_presentation(&pages, SlideSize::Standard, &mut temp, None).unwrap();

        assert_eq!(
            temp.paths(),
            &[
                dir.path().join("temp_slide_0.png"),
                dir.path().join("temp_slide_1.png")
            ]
        );
    }

    #[test]
    fn empty_input_builds_empty_deck() {
        let dir = tempfile::tempdir().unwrap();
        let mut temp = TempImageSet::new(dir.path(), "temp_slide_");

        let pres = build_presentation(&[], SlideSize::Widescreen, &mut temp, None).unwrap();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_size(), SlideSize::Widescreen);
        assert!(temp.paths().is_empty());
    }

    #[test]
    fn reports_each_slide() {
        let dir = tempfile::tempdir().unwrap();
        let mut temp = TempImageSet::new(dir.path(), "temp_slide_");
        let counter = Arc::new(SlideCounter::default());
        let cb: ProgressCallback = counter.clone();

        build_presentation(
            &[(0, page(2, 2)), (1, page(2, 2))],
            SlideSize::Standard,
            &mut temp,
            Some(&cb),
        )
        .unwrap();

        assert_eq!(counter.0.load(Ordering::SeqCst), 2);
    }
}
