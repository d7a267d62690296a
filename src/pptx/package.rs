//! OPC package writer: turns a [`Presentation`] into `.pptx` bytes.
//!
//! ## Package layout
//!
//! ```text
//! [Content_Types].xml
//! _rels/.rels
//! docProps/core.xml, docProps/app.xml
//! ppt/presentation.xml            ─ rels: master, theme, props, slides
//! ppt/slideMasters/slideMaster1.xml ─ rels: layout, theme
//! ppt/slideLayouts/slideLayout1.xml ─ rels: master
//! ppt/theme/theme1.xml
//! ppt/presProps.xml, ppt/viewProps.xml, ppt/tableStyles.xml
//! ppt/slides/slideN.xml           ─ rels: layout, media
//! ppt/media/imageN.{png,jpeg}
//! ```
//!
//! Every picture gets its own media part, numbered in slide order, even if
//! two pictures happen to carry identical bytes.

use super::presentation::{ImageFormat, Presentation};
use super::templates;
use crate::error::Pdf2PptxError;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

// ── Content types ────────────────────────────────────────────────────────

mod ct {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const PRESENTATION: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
    pub const SLIDE_MASTER: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml";
    pub const SLIDE_LAYOUT: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml";
    pub const SLIDE: &str = "application/vnd.openxmlformats-officedocument.presentationml.slide+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const PRES_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.presProps+xml";
    pub const VIEW_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml";
    pub const TABLE_STYLES: &str =
        "application/vnd.openxmlformats-officedocument.presentationml.tableStyles+xml";
    pub const CORE_PROPS: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const APP_PROPS: &str =
        "application/vnd.openxmlformats-officedocument.extended-properties+xml";
}

// ── Relationship types ───────────────────────────────────────────────────

mod rt {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPS: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const APP_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
    pub const SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
    pub const SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
    pub const SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
    pub const THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const PRES_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps";
    pub const VIEW_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/viewProps";
    pub const TABLE_STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/tableStyles";
    pub const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

/// One `.rels` part under construction. Ids are handed out as `rId1`, `rId2`, …
#[derive(Debug, Default)]
struct Relationships {
    entries: Vec<(String, &'static str, String)>,
}

impl Relationships {
    /// Add a relationship and return its id.
    fn add(&mut self, rel_type: &'static str, target: impl Into<String>) -> String {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push((id.clone(), rel_type, target.into()));
        id
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.entries.len() * 160);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );
        for (id, rel_type, target) in &self.entries {
            xml.push_str(&format!(
                r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#
            ));
        }
        xml.push_str("</Relationships>");
        xml
    }
}

/// `[Content_Types].xml` under construction.
///
/// Media and `.rels` parts are covered by extension defaults; every XML part
/// gets an override. Sorted maps keep the output stable between runs.
#[derive(Debug)]
struct ContentTypes {
    defaults: BTreeMap<&'static str, &'static str>,
    overrides: BTreeMap<String, &'static str>,
}

impl ContentTypes {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels", ct::RELATIONSHIPS);
        defaults.insert("xml", ct::XML);
        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn add_override(&mut self, part_name: &str, content_type: &'static str) {
        self.overrides
            .insert(format!("/{part_name}"), content_type);
    }

    fn add_media(&mut self, format: ImageFormat) {
        self.defaults
            .insert(format.extension(), format.content_type());
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );
        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{ext}" ContentType="{content_type}"/>"#
            ));
        }
        for (part_name, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{part_name}" ContentType="{content_type}"/>"#
            ));
        }
        xml.push_str("</Types>");
        xml
    }
}

/// A part waiting to be written to the zip.
struct Part {
    name: String,
    data: Vec<u8>,
    /// Media is already compressed; store it as-is.
    stored: bool,
}

impl Part {
    fn xml(name: impl Into<String>, xml: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: xml.into().into_bytes(),
            stored: false,
        }
    }
}

/// Serialise `pres` into a complete `.pptx` package.
pub(crate) fn write_package(pres: &Presentation) -> Result<Vec<u8>, Pdf2PptxError> {
    let mut types = ContentTypes::new();
    let mut parts: Vec<Part> = Vec::new();

    // ── Package relationships ────────────────────────────────────────────
    let mut pkg_rels = Relationships::default();
    pkg_rels.add(rt::OFFICE_DOCUMENT, "ppt/presentation.xml");
    pkg_rels.add(rt::CORE_PROPS, "docProps/core.xml");
    pkg_rels.add(rt::APP_PROPS, "docProps/app.xml");
    parts.push(Part::xml("_rels/.rels", pkg_rels.to_xml()));

    types.add_override("docProps/core.xml", ct::CORE_PROPS);
    parts.push(Part::xml(
        "docProps/core.xml",
        templates::core_props_xml(pres.title()),
    ));
    types.add_override("docProps/app.xml", ct::APP_PROPS);
    parts.push(Part::xml(
        "docProps/app.xml",
        templates::app_props_xml(pres.slide_count()),
    ));

    // ── Presentation relationships (master must be rId1) ─────────────────
    let mut pres_rels = Relationships::default();
    pres_rels.add(rt::SLIDE_MASTER, "slideMasters/slideMaster1.xml");
    pres_rels.add(rt::THEME, "theme/theme1.xml");
    pres_rels.add(rt::PRES_PROPS, "presProps.xml");
    pres_rels.add(rt::VIEW_PROPS, "viewProps.xml");
    pres_rels.add(rt::TABLE_STYLES, "tableStyles.xml");

    // ── Master, layout, theme, props ─────────────────────────────────────
    let mut master_rels = Relationships::default();
    master_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");
    master_rels.add(rt::THEME, "../theme/theme1.xml");
    types.add_override("ppt/slideMasters/slideMaster1.xml", ct::SLIDE_MASTER);
    parts.push(Part::xml(
        "ppt/slideMasters/slideMaster1.xml",
        templates::SLIDE_MASTER_XML,
    ));
    parts.push(Part::xml(
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        master_rels.to_xml(),
    ));

    let mut layout_rels = Relationships::default();
    layout_rels.add(rt::SLIDE_MASTER, "../slideMasters/slideMaster1.xml");
    types.add_override("ppt/slideLayouts/slideLayout1.xml", ct::SLIDE_LAYOUT);
    parts.push(Part::xml(
        "ppt/slideLayouts/slideLayout1.xml",
        templates::BLANK_LAYOUT_XML,
    ));
    parts.push(Part::xml(
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        layout_rels.to_xml(),
    ));

    types.add_override("ppt/theme/theme1.xml", ct::THEME);
    parts.push(Part::xml("ppt/theme/theme1.xml", templates::THEME_XML));
    types.add_override("ppt/presProps.xml", ct::PRES_PROPS);
    parts.push(Part::xml("ppt/presProps.xml", templates::PRES_PROPS_XML));
    types.add_override("ppt/viewProps.xml", ct::VIEW_PROPS);
    parts.push(Part::xml("ppt/viewProps.xml", templates::VIEW_PROPS_XML));
    types.add_override("ppt/tableStyles.xml", ct::TABLE_STYLES);
    parts.push(Part::xml("ppt/tableStyles.xml", templates::TABLE_STYLES_XML));

    // ── Slides and media ─────────────────────────────────────────────────
    let mut slide_rel_ids = Vec::with_capacity(pres.slide_count());
    let mut media_counter = 0usize;

    for (index, slide) in pres.slides().iter().enumerate() {
        let slide_num = index + 1;
        let slide_name = format!("ppt/slides/slide{slide_num}.xml");

        let mut slide_rels = Relationships::default();
        slide_rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml");

        let mut image_rel_ids = Vec::with_capacity(slide.pictures().len());
        for pic in slide.pictures() {
            media_counter += 1;
            let ext = pic.format().extension();
            let media_name = format!("image{media_counter}.{ext}");

            image_rel_ids.push(slide_rels.add(rt::IMAGE, format!("../media/{media_name}")));
            types.add_media(pic.format());
            parts.push(Part {
                name: format!("ppt/media/{media_name}"),
                data: pic.data().to_vec(),
                stored: true,
            });
        }

        types.add_override(&slide_name, ct::SLIDE);
        parts.push(Part::xml(slide_name, slide.to_xml(&image_rel_ids)?));
        parts.push(Part::xml(
            format!("ppt/slides/_rels/slide{slide_num}.xml.rels"),
            slide_rels.to_xml(),
        ));

        slide_rel_ids.push(pres_rels.add(rt::SLIDE, format!("slides/slide{slide_num}.xml")));
    }

    types.add_override("ppt/presentation.xml", ct::PRESENTATION);
    parts.push(Part::xml("ppt/presentation.xml", pres.to_xml(&slide_rel_ids)?));
    parts.push(Part::xml(
        "ppt/_rels/presentation.xml.rels",
        pres_rels.to_xml(),
    ));

    // ── Zip it ───────────────────────────────────────────────────────────
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    zip.start_file("[Content_Types].xml", deflated)?;
    zip.write_all(types.to_xml().as_bytes())
        .map_err(zip::result::ZipError::Io)?;

    for part in &parts {
        zip.start_file(part.name.as_str(), if part.stored { stored } else { deflated })?;
        zip.write_all(&part.data)
            .map_err(zip::result::ZipError::Io)?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(
        "Assembled PPTX package: {} slides, {} media parts, {} bytes",
        pres.slide_count(),
        media_counter,
        bytes.len()
    );
    Ok(bytes)
}

/// Write `bytes` to `path` via a sibling temp file and a rename, so readers
/// never observe a half-written presentation.
pub(crate) fn persist_atomically(path: &Path, bytes: &[u8]) -> Result<(), Pdf2PptxError> {
    let write_err = |source: std::io::Error| Pdf2PptxError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = path.with_extension("pptx.tmp");
    if let Err(e) = std::fs::write(&tmp_path, bytes) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    Ok(())
}
