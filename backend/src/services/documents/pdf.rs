//! Serializes paginated section images into a PDF with `printpdf`.

use image::{imageops, RgbImage};
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, PdfLayerReference, Px,
};

use super::error::DocumentError;
use super::paginate::{page_count, scaled_height, Placement, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};

/// Builds the PDF. `placements` refer to `sections` by index and must be
/// ordered by page.
pub fn serialize(title: &str, sections: &[RgbImage], placements: &[Placement]) -> Result<Vec<u8>, DocumentError> {
    let pages = page_count(placements);
    if pages == 0 {
        return Err(DocumentError::Pdf("nothing to place".to_string()));
    }

    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "Layer 1",
    );
    let mut layers: Vec<PdfLayerReference> = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..pages {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "Layer 1");
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for placement in placements {
        let section = sections
            .get(placement.section)
            .ok_or_else(|| DocumentError::Pdf(format!("missing section {}", placement.section)))?;
        let layer = layers
            .get(placement.page)
            .ok_or_else(|| DocumentError::Pdf(format!("missing page {}", placement.page)))?;
        place(layer, section, placement);
    }

    doc.save_to_bytes().map_err(|e| DocumentError::Pdf(e.to_string()))
}

/// Rows `start..end` of a section that fall on the page of `placement`.
/// Consecutive placements of one section give adjacent, non-overlapping
/// ranges that together cover the whole image.
pub fn page_slice(width_px: u32, height_px: u32, placement: &Placement) -> (u32, u32) {
    let px_per_mm = f64::from(width_px) / PAGE_WIDTH_MM;
    let to_row = |mm: f64| ((mm * px_per_mm).round().max(0.0) as u32).min(height_px);
    let start = to_row(-placement.top_mm);
    let end = to_row(PAGE_HEIGHT_MM - placement.top_mm);
    (start, end)
}

/// Places the slice of `section` that belongs on this page, top aligned and
/// at full page width. Each page embeds only its own rows. PDF coordinates
/// start at the bottom-left corner.
fn place(layer: &PdfLayerReference, section: &RgbImage, placement: &Placement) {
    let (width, height) = section.dimensions();
    let (start, end) = page_slice(width, height, placement);
    if end <= start {
        return;
    }
    let rows = end - start;
    let slice = imageops::crop_imm(section, 0, start, width, rows).to_image();

    let image = Image::from(ImageXObject {
        width: Px(width as usize),
        height: Px(rows as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: slice.into_raw(),
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    });

    let dpi = width as f32 * 25.4 / PAGE_WIDTH_MM as f32;
    let bottom = PAGE_HEIGHT_MM - scaled_height(width, rows);
    image.add_to_layer(
        layer.clone(),
        ImageTransform {
            translate_x: Some(Mm(0.0)),
            translate_y: Some(Mm(bottom as f32)),
            dpi: Some(dpi),
            ..Default::default()
        },
    );
}

#[cfg(test)]
mod tests {
    use super::super::paginate::paginate;
    use super::*;

    #[test]
    fn tall_section_and_short_section() {
        let tall = RgbImage::from_pixel(42, 149, image::Rgb([255, 255, 255]));
        let short = RgbImage::from_pixel(42, 20, image::Rgb([0, 0, 0]));
        let placements = paginate(&[(42, 149), (42, 20)]);
        assert_eq!(page_count(&placements), 4);

        let bytes = serialize("HKF Membership Application", &[tall, short], &placements).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn each_page_carries_only_its_own_rows() {
        // 42 px wide: one page is 59.4 px, so 149 px need three pages.
        let placements = paginate(&[(42, 149)]);
        let slices: Vec<(u32, u32)> = placements.iter().map(|p| page_slice(42, 149, p)).collect();
        assert_eq!(slices, vec![(0, 59), (59, 119), (119, 149)]);

        let embedded: u32 = slices.iter().map(|(start, end)| end - start).sum();
        assert_eq!(embedded, 149);
    }

    #[test]
    fn short_section_is_embedded_whole() {
        let placements = paginate(&[(42, 20)]);
        assert_eq!(page_slice(42, 20, &placements[0]), (0, 20));
    }

    #[test]
    fn placement_for_unknown_section_fails() {
        let placements = paginate(&[(42, 20)]);
        let err = serialize("x", &[], &placements).unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }

    #[test]
    fn empty_placement_list_is_rejected() {
        let err = serialize("x", &[], &[]).unwrap_err();
        assert!(matches!(err, DocumentError::Pdf(_)));
    }
}
