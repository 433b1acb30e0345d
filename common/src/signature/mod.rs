//! Signature Capture.
//!
//! Two acquisition modes share one pad: a freehand [`DrawingSurface`] and an
//! uploaded image. Both keep their data while the other mode is active; only
//! the active mode's output counts as the current signature.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use png::{BitDepth as PngBitDepth, ColorType as PngColorType, Encoder as PngEncoder};

use crate::error::SessionError;

pub const SURFACE_WIDTH: u32 = 400;
pub const SURFACE_HEIGHT: u32 = 80;
pub const LINE_WIDTH: f32 = 2.0;

const INK: [u8; 4] = [0, 0, 0, 255];

/// Position on the drawing surface, in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Fixed-size RGBA raster that records pen strokes.
///
/// A stroke starts on [`press`](Self::press) without inking anything, every
/// [`drag`](Self::drag) while pressed inks a round-capped segment from the
/// previous point, and [`release`](Self::release) ends it.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingSurface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    pen: Option<Point>,
}

impl Default for DrawingSurface {
    fn default() -> Self {
        Self::new(SURFACE_WIDTH, SURFACE_HEIGHT)
    }
}

impl DrawingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            pen: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn is_drawing(&self) -> bool {
        self.pen.is_some()
    }

    pub fn press(&mut self, at: Point) {
        self.pen = Some(at);
    }

    /// Extends the current stroke to `to`. Returns `false` when no stroke is
    /// in progress.
    pub fn drag(&mut self, to: Point) -> bool {
        let Some(from) = self.pen else {
            return false;
        };
        self.ink_segment(from, to);
        self.pen = Some(to);
        true
    }

    /// Ends the current stroke. Returns whether a stroke was in progress.
    pub fn release(&mut self) -> bool {
        self.pen.take().is_some()
    }

    pub fn clear(&mut self) {
        self.pixels.fill(0);
        self.pen = None;
    }

    /// Blank iff every channel of every pixel is zero.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|&byte| byte == 0)
    }

    pub fn to_png(&self) -> Result<Vec<u8>, SessionError> {
        let mut out = Vec::new();
        {
            let mut encoder = PngEncoder::new(&mut out, self.width, self.height);
            encoder.set_color(PngColorType::Rgba);
            encoder.set_depth(PngBitDepth::Eight);
            let mut writer = encoder
                .write_header()
                .map_err(|e| SessionError::Encoding(e.to_string()))?;
            writer
                .write_image_data(&self.pixels)
                .map_err(|e| SessionError::Encoding(e.to_string()))?;
        }
        Ok(out)
    }

    pub fn to_data_url(&self) -> Result<String, SessionError> {
        Ok(data_url("image/png", &self.to_png()?))
    }

    /// Inks every pixel whose center lies within half the line width of the
    /// segment, which gives round caps and joins.
    fn ink_segment(&mut self, from: Point, to: Point) {
        let radius = LINE_WIDTH / 2.0;
        let min_x = (from.x.min(to.x) - radius).floor().max(0.0) as u32;
        let min_y = (from.y.min(to.y) - radius).floor().max(0.0) as u32;
        let max_x = ((from.x.max(to.x) + radius).ceil().max(0.0) as u32).min(self.width);
        let max_y = ((from.y.max(to.y) + radius).ceil().max(0.0) as u32).min(self.height);

        for py in min_y..max_y {
            for px in min_x..max_x {
                let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
                if distance_to_segment(center, from, to) <= radius {
                    let offset = ((py * self.width + px) * 4) as usize;
                    self.pixels[offset..offset + 4].copy_from_slice(&INK);
                }
            }
        }
    }
}

fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0)
    };
    let (cx, cy) = (a.x + t * dx, a.y + t * dy);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

pub fn data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(bytes))
}

/// Image chosen through the file picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SignatureImage {
    pub fn data_url(&self) -> String {
        data_url(&self.content_type, &self.bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureMode {
    #[default]
    Draw,
    Upload,
}

/// Both acquisition modes plus the selector between them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignaturePad {
    mode: SignatureMode,
    surface: DrawingSurface,
    uploaded: Option<SignatureImage>,
}

impl SignaturePad {
    pub fn mode(&self) -> SignatureMode {
        self.mode
    }

    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    pub fn uploaded(&self) -> Option<&SignatureImage> {
        self.uploaded.as_ref()
    }

    /// Switches mode, keeping the other mode's data. Returns whether the mode
    /// actually changed.
    pub fn set_mode(&mut self, mode: SignatureMode) -> bool {
        if self.mode == mode {
            return false;
        }
        self.surface.release();
        self.mode = mode;
        true
    }

    pub fn is_signed(&self) -> bool {
        match self.mode {
            SignatureMode::Draw => !self.surface.is_blank(),
            SignatureMode::Upload => self.uploaded.is_some(),
        }
    }

    /// Pointer input is only accepted in draw mode.
    pub fn press(&mut self, at: Point) -> bool {
        if self.mode != SignatureMode::Draw {
            return false;
        }
        self.surface.press(at);
        true
    }

    pub fn drag(&mut self, to: Point) -> bool {
        self.mode == SignatureMode::Draw && self.surface.drag(to)
    }

    pub fn release(&mut self) -> bool {
        self.mode == SignatureMode::Draw && self.surface.release()
    }

    /// Stores an uploaded file. Anything that is not an image is rejected and
    /// the previous upload is kept.
    pub fn upload(&mut self, content_type: &str, bytes: Vec<u8>) -> Result<(), SessionError> {
        if !content_type.starts_with("image/") {
            log::debug!("rejected signature upload of type '{}'", content_type);
            return Err(SessionError::UploadRejected);
        }
        self.uploaded = Some(SignatureImage {
            content_type: content_type.to_string(),
            bytes,
        });
        Ok(())
    }

    /// Clears the active mode only.
    pub fn clear(&mut self) {
        match self.mode {
            SignatureMode::Draw => self.surface.clear(),
            SignatureMode::Upload => self.uploaded = None,
        }
    }

    /// The active mode's signature as a data URL, `None` when unsigned.
    pub fn current(&self) -> Result<Option<String>, SessionError> {
        if !self.is_signed() {
            return Ok(None);
        }
        match self.mode {
            SignatureMode::Draw => self.surface.to_data_url().map(Some),
            SignatureMode::Upload => Ok(self.uploaded.as_ref().map(SignatureImage::data_url)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(pad: &mut SignaturePad) {
        pad.press(Point::new(10.0, 10.0));
        pad.drag(Point::new(60.0, 40.0));
        pad.drag(Point::new(120.0, 20.0));
        pad.release();
    }

    #[test]
    fn fresh_surface_is_blank() {
        let surface = DrawingSurface::default();
        assert!(surface.is_blank());
        assert_eq!(surface.pixels().len(), 400 * 80 * 4);
    }

    #[test]
    fn press_alone_does_not_ink() {
        let mut surface = DrawingSurface::default();
        surface.press(Point::new(5.0, 5.0));
        assert!(surface.is_blank());
        assert!(surface.release());
        assert!(!surface.release());
    }

    #[test]
    fn drag_without_press_is_ignored() {
        let mut surface = DrawingSurface::default();
        assert!(!surface.drag(Point::new(50.0, 50.0)));
        assert!(surface.is_blank());
    }

    #[test]
    fn clear_draw_clear_cycle() {
        let mut pad = SignaturePad::default();
        pad.clear();
        assert!(!pad.is_signed());

        stroke(&mut pad);
        assert!(pad.is_signed());

        pad.clear();
        assert!(!pad.is_signed());
        assert!(pad.surface().is_blank());
    }

    #[test]
    fn segment_inks_pixels_along_the_line() {
        let mut surface = DrawingSurface::default();
        surface.press(Point::new(0.0, 40.0));
        surface.drag(Point::new(399.0, 40.0));
        let at = |x: u32, y: u32| {
            let o = ((y * 400 + x) * 4) as usize;
            surface.pixels()[o + 3]
        };
        assert_eq!(at(200, 39), 255);
        assert_eq!(at(200, 40), 255);
        assert_eq!(at(200, 45), 0);
    }

    #[test]
    fn strokes_off_the_edge_are_clipped() {
        let mut surface = DrawingSurface::default();
        surface.press(Point::new(-30.0, -30.0));
        surface.drag(Point::new(500.0, 200.0));
        assert!(!surface.is_blank());
    }

    #[test]
    fn upload_rejects_non_images_and_keeps_previous() {
        let mut pad = SignaturePad::default();
        pad.set_mode(SignatureMode::Upload);
        pad.upload("image/png", vec![1, 2, 3]).unwrap();

        let err = pad.upload("application/pdf", vec![9]).unwrap_err();
        assert_eq!(err, SessionError::UploadRejected);
        assert_eq!(pad.uploaded().map(|i| i.bytes.clone()), Some(vec![1, 2, 3]));
        assert!(pad.is_signed());
    }

    #[test]
    fn modes_keep_their_own_data() {
        let mut pad = SignaturePad::default();
        stroke(&mut pad);

        assert!(pad.set_mode(SignatureMode::Upload));
        assert!(!pad.is_signed());
        assert!(!pad.press(Point::new(1.0, 1.0)));

        pad.upload("image/jpeg", vec![0xff, 0xd8]).unwrap();
        pad.clear();
        assert!(pad.uploaded().is_none());

        assert!(pad.set_mode(SignatureMode::Draw));
        assert!(pad.is_signed());
        assert!(!pad.set_mode(SignatureMode::Draw));
    }

    #[test]
    fn current_signature_is_a_data_url_of_the_active_mode() {
        let mut pad = SignaturePad::default();
        assert_eq!(pad.current().unwrap(), None);

        stroke(&mut pad);
        let drawn = pad.current().unwrap().unwrap();
        assert!(drawn.starts_with("data:image/png;base64,"));
        let png = BASE64
            .decode(drawn.trim_start_matches("data:image/png;base64,"))
            .unwrap();
        assert_eq!(&png[1..4], b"PNG");

        pad.set_mode(SignatureMode::Upload);
        pad.upload("image/gif", b"GIF89a".to_vec()).unwrap();
        assert_eq!(
            pad.current().unwrap().as_deref(),
            Some("data:image/gif;base64,R0lGODlh")
        );
    }
}
