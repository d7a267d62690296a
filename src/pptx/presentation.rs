//! In-memory presentation model: slides holding full-slide pictures.
//!
//! A [`Presentation`] is built up slide by slide and serialised exactly once
//! by [`Presentation::save`]. Nothing touches the output path until every
//! slide has been constructed, so a failure part-way through never leaves a
//! truncated `.pptx` behind.

use super::package;
use crate::config::SlideSize;
use crate::error::Pdf2PptxError;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// First slide id PowerPoint assigns (ids below 256 are reserved).
const FIRST_SLIDE_ID: u32 = 256;

/// Raster formats a picture may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Sniff the format from the leading bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        match image::guess_format(data).ok()? {
            image::ImageFormat::Png => Some(ImageFormat::Png),
            image::ImageFormat::Jpeg => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }

    /// Extension used for the media part name.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpeg",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }
}

/// A picture shape placed on a slide.
#[derive(Debug, Clone)]
pub struct Picture {
    pub(crate) data: Vec<u8>,
    pub(crate) format: ImageFormat,
    pub(crate) x: i64,
    pub(crate) y: i64,
    pub(crate) width: i64,
    pub(crate) height: i64,
    pub(crate) description: String,
}

impl Picture {
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// `(x, y)` offset in EMU.
    pub fn offset(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// `(width, height)` in EMU.
    pub fn extent(&self) -> (i64, i64) {
        (self.width, self.height)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A slide based on the blank layout.
#[derive(Debug, Clone)]
pub struct Slide {
    slide_id: u32,
    pictures: Vec<Picture>,
}

impl Slide {
    fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            pictures: Vec::new(),
        }
    }

    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    pub fn pictures(&self) -> &[Picture] {
        &self.pictures
    }

    /// Add a picture read from `image_path`, placed at `(x, y)` and sized to
    /// `width × height` EMU.
    ///
    /// The bytes are read immediately, so the file must exist now; it may be
    /// deleted once the presentation has been saved.
    pub fn add_picture(
        &mut self,
        image_path: &Path,
        x: i64,
        y: i64,
        width: i64,
        height: i64,
    ) -> Result<&Picture, Pdf2PptxError> {
        let data = std::fs::read(image_path).map_err(|e| Pdf2PptxError::ImageReadFailed {
            path: image_path.to_path_buf(),
            source: e,
        })?;
        let format = ImageFormat::detect(&data).ok_or_else(|| Pdf2PptxError::UnsupportedImage {
            path: image_path.to_path_buf(),
        })?;

        let description = image_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(
            "Slide {}: picture {} ({} bytes) at ({x}, {y}) {width}x{height} EMU",
            self.slide_id,
            image_path.display(),
            data.len()
        );

        self.pictures.push(Picture {
            data,
            format,
            x,
            y,
            width,
            height,
            description,
        });
        Ok(&self.pictures[self.pictures.len() - 1])
    }

    /// Generate the slide part XML.
    ///
    /// `image_rel_ids[i]` is the relationship id of the i-th picture's media
    /// part in this slide's `.rels`.
    pub(crate) fn to_xml(&self, image_rel_ids: &[String]) -> Result<String, Pdf2PptxError> {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);
        xml.push_str("<p:cSld><p:spTree>");

        // Group shape properties of the tree itself (required)
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(concat!(
            "<p:grpSpPr><a:xfrm>",
            r#"<a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
            r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/>"#,
            "</a:xfrm></p:grpSpPr>"
        ));

        for (i, pic) in self.pictures.iter().enumerate() {
            let rid = image_rel_ids.get(i).ok_or_else(|| {
                Pdf2PptxError::Internal(format!(
                    "no relationship id for picture {} on slide {}",
                    i, self.slide_id
                ))
            })?;
            // Shape id 1 is the tree; pictures follow.
            let shape_id = i + 2;

            xml.push_str("<p:pic><p:nvPicPr>");
            write!(
                xml,
                r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                shape_id,
                i + 1,
                escape_xml(&pic.description)
            )?;
            xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/>"#);
            xml.push_str("</p:nvPicPr>");

            xml.push_str("<p:blipFill>");
            write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
            xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
            xml.push_str("</p:blipFill>");

            xml.push_str("<p:spPr><a:xfrm>");
            write!(xml, r#"<a:off x="{}" y="{}"/>"#, pic.x, pic.y)?;
            write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, pic.width, pic.height)?;
            xml.push_str("</a:xfrm>");
            xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
            xml.push_str("</p:spPr></p:pic>");
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

/// A PowerPoint presentation under construction.
#[derive(Debug, Clone)]
pub struct Presentation {
    slides: Vec<Slide>,
    slide_size: SlideSize,
    title: Option<String>,
}

impl Presentation {
    /// Create an empty presentation with the given slide size.
    pub fn new(slide_size: SlideSize) -> Self {
        Self {
            slides: Vec::new(),
            slide_size,
            title: None,
        }
    }

    /// Append a new slide using the blank layout.
    pub fn add_slide(&mut self) -> &mut Slide {
        let slide_id = FIRST_SLIDE_ID + self.slides.len() as u32;
        self.slides.push(Slide::new(slide_id));
        let last = self.slides.len() - 1;
        &mut self.slides[last]
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slide_size(&self) -> SlideSize {
        self.slide_size
    }

    /// Slide width in EMU.
    pub fn slide_width(&self) -> i64 {
        self.slide_size.dimensions().0
    }

    /// Slide height in EMU.
    pub fn slide_height(&self) -> i64 {
        self.slide_size.dimensions().1
    }

    /// Title written to the package core properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Serialise the whole package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Pdf2PptxError> {
        package::write_package(self)
    }

    /// Serialise and write the package to `path`, replacing any existing file.
    ///
    /// The bytes are written to a temporary file in the destination
    /// directory and then renamed over `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Pdf2PptxError> {
        let bytes = self.to_bytes()?;
        package::persist_atomically(path.as_ref(), &bytes)
    }

    /// Generate `ppt/presentation.xml`.
    ///
    /// `slide_rel_ids[i]` is the relationship id of slide `i` in
    /// `ppt/_rels/presentation.xml.rels`; the master is always `rId1`.
    pub(crate) fn to_xml(&self, slide_rel_ids: &[String]) -> Result<String, Pdf2PptxError> {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">"#);

        xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rid) in self.slides.iter().zip(slide_rel_ids) {
                write!(xml, r#"<p:sldId id="{}" r:id="{}"/>"#, slide.slide_id(), rid)?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        let (cx, cy) = self.slide_size.dimensions();
        match self.slide_size {
            SlideSize::Standard => write!(xml, r#"<p:sldSz cx="{cx}" cy="{cy}" type="screen4x3"/>"#)?,
            _ => write!(xml, r#"<p:sldSz cx="{cx}" cy="{cy}"/>"#)?,
        }
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }
}

/// Escape XML special characters.
pub(crate) fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};

    fn write_png(dir: &Path, name: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 3, Rgb([255, 255, 255])))
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();
        path
    }

    #[test]
    fn slide_ids_start_at_256() {
        let mut pres = Presentation::new(SlideSize::Standard);
        assert_eq!(pres.add_slide().slide_id(), 256);
        assert_eq!(pres.add_slide().slide_id(), 257);
        assert_eq!(pres.slide_count(), 2);
    }

    #[test]
    fn picture_keeps_requested_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "p.png");

        let mut pres = Presentation::new(SlideSize::Widescreen);
        let (w, h) = (pres.slide_width(), pres.slide_height());
        let pic = pres.add_slide().add_picture(&png, 0, 0, w, h).unwrap();

        assert_eq!(pic.offset(), (0, 0));
        assert_eq!(pic.extent(), (12_192_000, 6_858_000));
        assert_eq!(pic.format(), ImageFormat::Png);
    }

    #[test]
    fn missing_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut pres = Presentation::new(SlideSize::Standard);
        let err = pres
            .add_slide()
            .add_picture(&dir.path().join("gone.png"), 0, 0, 1, 1)
            .unwrap_err();
        assert!(matches!(err, Pdf2PptxError::ImageReadFailed { .. }));
    }

    #[test]
    fn non_image_bytes_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let mut pres = Presentation::new(SlideSize::Standard);
        let err = pres.add_slide().add_picture(&path, 0, 0, 1, 1).unwrap_err();
        assert!(matches!(err, Pdf2PptxError::UnsupportedImage { .. }));
    }

    #[test]
    fn slide_xml_places_picture_full_bleed() {
        let dir = tempfile::tempdir().unwrap();
        let png = write_png(dir.path(), "temp_slide_0.png");

        let mut pres = Presentation::new(SlideSize::Standard);
        pres.add_slide()
            .add_picture(&png, 0, 0, 9_144_000, 6_858_000)
            .unwrap();

        let xml = pres.slides()[0].to_xml(&["rId2".to_string()]).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId2"/>"#));
        assert!(xml.contains(r#"<a:off x="0" y="0"/><a:ext cx="9144000" cy="6858000"/>"#));
        assert!(xml.contains(r#"descr="temp_slide_0.png""#));
        assert!(xml.contains("<a:stretch><a:fillRect/></a:stretch>"));
    }

    #[test]
    fn presentation_xml_lists_slides_and_size() {
        let mut pres = Presentation::new(SlideSize::Standard);
        pres.add_slide();
        pres.add_slide();

        let xml = pres
            .to_xml(&["rId6".to_string(), "rId7".to_string()])
            .unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId6"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId7"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/>"#));
    }

    #[test]
    fn empty_presentation_has_no_slide_list() {
        let pres = Presentation::new(SlideSize::Standard);
        let xml = pres.to_xml(&[]).unwrap();
        assert!(!xml.contains("sldIdLst"));
    }

    #[test]
    fn escape_handles_markup() {
        assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&apos;");
    }
}
