//! # Document Reconstruction Service
//!
//! Rebuilds the printable application (form section plus terms section) from
//! a record, a signature and an optional membership number, and serializes
//! it to a paginated A4 PDF.
//!
//! ## Pipeline
//!
//! 1. `view` turns the request into two lists of printable blocks.
//! 2. A `raster::Rasterizer` renders both sections at `CSS_WIDTH` pixels times
//!    `SCALE`. The two sections are rendered in parallel with `rayon::join`.
//! 3. Each bitmap is flattened over white into RGB.
//! 4. `paginate` tiles every section over as many pages as it needs.
//! 5. `pdf` writes the placements into one document.
//!
//! Any failure aborts the whole reconstruction.
//!
//! ## Routes
//! - `POST /api/documents/render`: `DocumentRequest` JSON in, `application/pdf` out.

pub mod error;
pub mod paginate;
pub mod pdf;
pub mod raster;
pub mod render;
pub mod view;

use actix_web::web::{post, scope};
use actix_web::Scope;
use chrono::NaiveDate;
use common::requests::DocumentRequest;
use image::{DynamicImage, RgbImage, RgbaImage};
use log::info;
use std::path::Path;
use std::sync::Arc;

use self::error::DocumentError;
use self::raster::{FontRasterizer, Rasterizer, SCALE};
use self::view::PrintableView;

const API_PATH: &str = "/api/documents";

pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/render", post().to(render::process))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Shared reconstruction entry point, registered as application data.
#[derive(Clone)]
pub struct DocumentEngine {
    rasterizer: Option<Arc<dyn Rasterizer>>,
}

impl DocumentEngine {
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self {
            rasterizer: Some(rasterizer),
        }
    }

    /// Engine backed by the fonts in `fonts_dir`. Without usable fonts the
    /// server still starts; every reconstruction then fails.
    pub fn from_fonts_dir(fonts_dir: &Path) -> Self {
        match FontRasterizer::load(fonts_dir) {
            Ok(rasterizer) => Self::new(Arc::new(rasterizer)),
            Err(e) => {
                log::warn!("PDF reconstruction disabled: {}", e);
                Self { rasterizer: None }
            }
        }
    }

    pub fn reconstruct(&self, request: &DocumentRequest, today: NaiveDate) -> Result<RenderedDocument, DocumentError> {
        let rasterizer = self.rasterizer.as_deref().ok_or(DocumentError::RasterizerUnavailable)?;
        let view = PrintableView::build(request, today);

        let (form, terms) = rayon::join(
            || rasterizer.rasterize(&view.form, SCALE),
            || rasterizer.rasterize(&view.terms, SCALE),
        );
        let form = flatten(form?, "form")?;
        let terms = flatten(terms?, "terms")?;

        let sections = [form, terms];
        let sizes: Vec<(u32, u32)> = sections.iter().map(RgbImage::dimensions).collect();
        let placements = paginate::paginate(&sizes);
        let page_count = paginate::page_count(&placements);

        let bytes = pdf::serialize(&document_title(request), &sections, &placements)?;
        info!(
            "Reconstructed document {} ({} pages, {} bytes)",
            request.hkf_id.as_deref().unwrap_or("without membership number"),
            page_count,
            bytes.len()
        );
        Ok(RenderedDocument { bytes, page_count })
    }
}

pub fn document_title(request: &DocumentRequest) -> String {
    match request.hkf_id.as_deref() {
        Some(id) if !id.is_empty() => format!("HKF Membership Application {}", id),
        _ => "HKF Membership Application".to_string(),
    }
}

/// Composites the RGBA section over a white page and drops the alpha channel.
fn flatten(section: RgbaImage, name: &'static str) -> Result<RgbImage, DocumentError> {
    let (w, h) = section.dimensions();
    if w == 0 || h == 0 {
        return Err(DocumentError::EmptySection(name));
    }
    let mut background = RgbaImage::from_pixel(w, h, image::Rgba([255, 255, 255, 255]));
    image::imageops::overlay(&mut background, &section, 0, 0);
    Ok(DynamicImage::ImageRgba8(background).to_rgb8())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::raster::{Rasterizer, CSS_WIDTH};
    use super::view::Block;
    use super::*;
    use std::sync::Mutex;

    /// Rasterizer producing plain images of a fixed height per section and
    /// remembering what it was asked to draw.
    pub struct StubRasterizer {
        pub form_height: u32,
        pub terms_height: u32,
        pub fail: bool,
        pub seen: Mutex<Vec<Vec<Block>>>,
    }

    impl StubRasterizer {
        pub fn new(form_height: u32, terms_height: u32) -> Self {
            Self {
                form_height,
                terms_height,
                fail: false,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Rasterizer for StubRasterizer {
        fn rasterize(&self, blocks: &[Block], scale: u32) -> Result<RgbaImage, DocumentError> {
            if self.fail {
                return Err(DocumentError::Raster("stub failure".into()));
            }
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(blocks.to_vec());
            }
            let is_form = matches!(blocks.first(), Some(Block::Header { .. }));
            let height = if is_form { self.form_height } else { self.terms_height };
            Ok(RgbaImage::from_pixel(
                CSS_WIDTH * scale,
                height,
                image::Rgba([0, 0, 0, 0]),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubRasterizer;
    use super::view::Block;
    use super::*;
    use common::model::membership::MembershipForm;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).unwrap()
    }

    fn request(hkf_id: Option<&str>) -> DocumentRequest {
        DocumentRequest {
            form: MembershipForm {
                first_name: "Asha".into(),
                last_name: "Rao".into(),
                ..Default::default()
            },
            signature_data_url: None,
            hkf_id: hkf_id.map(str::to_string),
        }
    }

    #[test]
    fn pages_follow_section_heights() {
        // 1792 px wide: 2.5 pages is 1792 * 297 / 210 * 2.5 = 6336 px.
        let stub = Arc::new(StubRasterizer::new(6336, 1000));
        let engine = DocumentEngine::new(stub.clone());
        let rendered = engine.reconstruct(&request(None), today()).unwrap();
        assert_eq!(rendered.page_count, 4);
        assert!(rendered.bytes.starts_with(b"%PDF"));
        assert_eq!(stub.seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn identifier_reaches_the_printed_view() {
        let stub = Arc::new(StubRasterizer::new(500, 500));
        let engine = DocumentEngine::new(stub.clone());
        engine.reconstruct(&request(Some("HKF-0007")), today()).unwrap();

        let seen = stub.seen.lock().unwrap();
        let banner = seen.iter().flatten().find_map(|b| match b {
            Block::Banner { value, .. } => Some(value.clone()),
            _ => None,
        });
        assert_eq!(banner.as_deref(), Some("HKF-0007"));
        assert_eq!(document_title(&request(Some("HKF-0007"))), "HKF Membership Application HKF-0007");
    }

    #[test]
    fn rasterizer_failure_yields_nothing() {
        let mut stub = StubRasterizer::new(500, 500);
        stub.fail = true;
        let engine = DocumentEngine::new(Arc::new(stub));
        assert!(matches!(
            engine.reconstruct(&request(None), today()),
            Err(DocumentError::Raster(_))
        ));
    }

    #[test]
    fn missing_rasterizer_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let engine = DocumentEngine::from_fonts_dir(dir.path());
        assert!(matches!(
            engine.reconstruct(&request(None), today()),
            Err(DocumentError::RasterizerUnavailable)
        ));
    }

    #[test]
    fn empty_section_is_rejected() {
        let engine = DocumentEngine::new(Arc::new(StubRasterizer::new(0, 10)));
        assert!(matches!(
            engine.reconstruct(&request(None), today()),
            Err(DocumentError::EmptySection("form"))
        ));
    }

    #[test]
    fn transparent_pixels_flatten_to_white() {
        let section = RgbaImage::from_pixel(2, 2, image::Rgba([0, 0, 0, 0]));
        let flat = flatten(section, "form").unwrap();
        assert_eq!(flat.get_pixel(0, 0), &image::Rgb([255, 255, 255]));
    }
}
