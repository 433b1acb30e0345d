//! Rasterization of printable blocks.
//!
//! Layout runs in CSS pixels against a [`TextMetrics`] implementation and
//! produces a list of [`DrawOp`]s; painting multiplies everything by the
//! device scale factor. The font-backed [`FontRasterizer`] does both with
//! `rusttype` glyphs drawn into an `image` buffer.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use log::warn;
use rusttype::{point, Font, Scale};
use std::path::Path;

use super::error::DocumentError;
use super::view::Block;

/// Width of the printable container in CSS pixels.
pub const CSS_WIDTH: u32 = 896;
/// Device scale factor used for print quality.
pub const SCALE: u32 = 2;
/// Tallest section the rasterizer will allocate, in CSS pixels (about
/// twelve A4 pages at `CSS_WIDTH`).
pub const MAX_SECTION_HEIGHT: f32 = 15_000.0;

const PADDING: f32 = 20.0;
const LABEL_WIDTH: f32 = 144.0;
const BODY_SIZE: f32 = 14.0;
const LINE_HEIGHT: f32 = 1.45;
const FIELD_MIN_HEIGHT: f32 = 30.0;
const SIGNATURE_BOX_HEIGHT: f32 = 80.0;
const LOGO_SIZE: f32 = 100.0;

const WHITE: [u8; 3] = [255, 255, 255];
const TEXT: [u8; 3] = [17, 24, 39];
const LABEL: [u8; 3] = [55, 65, 81];
const ACCENT: [u8; 3] = [37, 99, 235];
const RULE: [u8; 3] = [229, 231, 235];
const BORDER: [u8; 3] = [209, 213, 219];
const BANNER_FILL: [u8; 3] = [254, 242, 242];
const BANNER_TEXT: [u8; 3] = [153, 27, 27];
const BANNER_VALUE: [u8; 3] = [220, 38, 38];

/// Turns a section of blocks into one bitmap `CSS_WIDTH * scale` pixels wide.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, blocks: &[Block], scale: u32) -> Result<RgbaImage, DocumentError>;
}

/// Horizontal advance of a run of text, in CSS pixels.
pub trait TextMetrics {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// `y` is the top of the line box.
    Text {
        x: f32,
        y: f32,
        size: f32,
        bold: bool,
        color: [u8; 3],
        text: String,
    },
    Fill {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: [u8; 3],
    },
    /// One pixel outline.
    Frame {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: [u8; 3],
    },
    /// Image scaled to fit inside the box, centered.
    Image {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        data_url: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

/// Word with its weight, the unit of line wrapping.
type Word = (String, bool);

struct LayoutBuilder<'a> {
    metrics: &'a dyn TextMetrics,
    y: f32,
    ops: Vec<DrawOp>,
}

impl<'a> LayoutBuilder<'a> {
    fn content_width(&self) -> f32 {
        CSS_WIDTH as f32 - 2.0 * PADDING
    }

    fn text(&mut self, x: f32, y: f32, size: f32, bold: bool, color: [u8; 3], text: &str) {
        if text.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            bold,
            color,
            text: text.to_string(),
        });
    }

    fn fill(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]) {
        self.ops.push(DrawOp::Fill { x, y, w, h, color });
    }

    fn frame(&mut self, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]) {
        self.ops.push(DrawOp::Frame { x, y, w, h, color });
    }

    fn wrap(&self, words: &[Word], max_width: f32, size: f32) -> Vec<Vec<Word>> {
        let space = self.metrics.text_width(" ", size, false);
        let mut lines: Vec<Vec<Word>> = Vec::new();
        let mut line: Vec<Word> = Vec::new();
        let mut width = 0.0;
        for (word, bold) in words {
            let w = self.metrics.text_width(word, size, *bold);
            let needed = if line.is_empty() { w } else { width + space + w };
            if needed > max_width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = w;
            } else {
                width = needed;
            }
            line.push((word.clone(), *bold));
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    /// Lays out wrapped text starting at `x`; returns the height used.
    fn flow(&mut self, words: &[Word], x: f32, y: f32, max_width: f32, size: f32, color: [u8; 3]) -> f32 {
        let line_height = size * LINE_HEIGHT;
        let space = self.metrics.text_width(" ", size, false);
        let lines = self.wrap(words, max_width, size);
        for (i, line) in lines.iter().enumerate() {
            let mut cursor = x;
            let top = y + i as f32 * line_height;
            for (word, bold) in line {
                self.text(cursor, top, size, *bold, color, word);
                cursor += self.metrics.text_width(word, size, *bold) + space;
            }
        }
        lines.len() as f32 * line_height
    }

    fn block(&mut self, block: &Block) {
        let left = PADDING;
        let width = self.content_width();
        match block {
            Block::Header { title, subtitle } => {
                let logo_x = left + width - LOGO_SIZE;
                self.fill(logo_x, self.y, LOGO_SIZE, LOGO_SIZE, ACCENT);
                let logo_text = 40.0;
                let logo_w = self.metrics.text_width("HKF", logo_text, true);
                self.text(
                    logo_x + (LOGO_SIZE - logo_w) / 2.0,
                    self.y + (LOGO_SIZE - logo_text * LINE_HEIGHT) / 2.0,
                    logo_text,
                    true,
                    WHITE,
                    "HKF",
                );
                self.text(left, self.y + 24.0, 24.0, true, TEXT, title);
                self.text(left, self.y + 24.0 + 24.0 * LINE_HEIGHT, 16.0, true, ACCENT, subtitle);
                self.y += LOGO_SIZE + 8.0;
                self.fill(left, self.y, width, 2.0, RULE);
                self.y += 14.0;
            }
            Block::Banner { label, value } => {
                let height = 44.0;
                self.fill(left, self.y, width, height, BANNER_FILL);
                self.frame(left, self.y, width, height, [254, 202, 202]);
                let label_w = self.metrics.text_width(label, BODY_SIZE, true);
                let value_w = self.metrics.text_width(value, 18.0, true);
                let start = left + (width - label_w - 12.0 - value_w) / 2.0;
                self.text(start, self.y + 12.0, BODY_SIZE, true, BANNER_TEXT, label);
                self.text(start + label_w + 12.0, self.y + 9.0, 18.0, true, BANNER_VALUE, value);
                self.y += height + 20.0;
            }
            Block::Heading(text) => {
                self.y += 6.0;
                self.text(left, self.y, 18.0, true, LABEL, text);
                self.y += 18.0 * LINE_HEIGHT + 2.0;
                self.fill(left, self.y, width, 1.0, RULE);
                self.y += 8.0;
            }
            Block::Field { label, value } => {
                self.text(left, self.y + 6.0, BODY_SIZE, true, LABEL, &format!("{}:", label));
                let box_x = left + LABEL_WIDTH + 4.0;
                let box_w = width - LABEL_WIDTH - 4.0;
                let words = split_words(value, false);
                let text_h = self.flow(&words, box_x + 6.0, self.y + 6.0, box_w - 12.0, BODY_SIZE, TEXT);
                let height = (text_h + 12.0).max(FIELD_MIN_HEIGHT);
                self.frame(box_x, self.y, box_w, height, BORDER);
                self.y += height + 4.0;
            }
            Block::Paragraph { lead, text } => {
                let mut words = lead.as_deref().map(|l| split_words(l, true)).unwrap_or_default();
                words.extend(split_words(text, false));
                let used = self.flow(&words, left, self.y, width, BODY_SIZE, LABEL);
                self.y += used + 8.0;
            }
            Block::Bullet(text) => {
                let indent = 16.0;
                self.text(left + indent, self.y, BODY_SIZE, false, LABEL, "•");
                let words = split_words(text, false);
                let used = self.flow(&words, left + indent + 14.0, self.y, width - indent - 14.0, BODY_SIZE, LABEL);
                self.y += used + 2.0;
            }
            Block::Signature { entry_date, data_url } => {
                let half = width / 2.0;
                self.text(left, self.y, 12.0, true, LABEL, "Entry Date:");
                let date_y = self.y + 12.0 * LINE_HEIGHT + 2.0;
                self.frame(left, date_y, half - 8.0, 34.0, BORDER);
                self.text(left + 8.0, date_y + 8.0, BODY_SIZE, false, TEXT, entry_date);

                let sig_x = left + half;
                self.frame(sig_x, self.y, half, SIGNATURE_BOX_HEIGHT, BORDER);
                if let Some(url) = data_url {
                    self.ops.push(DrawOp::Image {
                        x: sig_x + 1.0,
                        y: self.y + 1.0,
                        w: half - 2.0,
                        h: SIGNATURE_BOX_HEIGHT - 2.0,
                        data_url: url.clone(),
                    });
                }
                self.y += SIGNATURE_BOX_HEIGHT + 12.0;
            }
        }
    }
}

fn split_words(text: &str, bold: bool) -> Vec<Word> {
    text.split_whitespace().map(|w| (w.to_string(), bold)).collect()
}

/// Positions every block of a section.
pub fn layout(blocks: &[Block], metrics: &dyn TextMetrics) -> Layout {
    let mut builder = LayoutBuilder {
        metrics,
        y: PADDING,
        ops: Vec::new(),
    };
    for block in blocks {
        builder.block(block);
    }
    Layout {
        height: builder.y + PADDING,
        ops: builder.ops,
    }
}

/// Refuses layouts whose canvas would exceed [`MAX_SECTION_HEIGHT`].
pub fn check_height(layout: &Layout) -> Result<(), DocumentError> {
    if layout.height > MAX_SECTION_HEIGHT {
        return Err(DocumentError::SectionTooTall(layout.height.ceil() as u32));
    }
    Ok(())
}

/// Rasterizer drawing text with TrueType fonts from a directory.
pub struct FontRasterizer {
    regular: Font<'static>,
    bold: Font<'static>,
}

impl FontRasterizer {
    /// Looks for `Arial-{Regular,Bold}.ttf`, then `LiberationSans-*`.
    pub fn load(dir: &Path) -> Result<Self, DocumentError> {
        for family in ["Arial", "LiberationSans"] {
            let regular = load_font(&dir.join(format!("{}-Regular.ttf", family)));
            let bold = load_font(&dir.join(format!("{}-Bold.ttf", family)));
            if let (Some(regular), Some(bold)) = (regular, bold) {
                log::info!("Using font family {} from {}", family, dir.display());
                return Ok(Self { regular, bold });
            }
        }
        Err(DocumentError::FontsUnavailable(dir.display().to_string()))
    }

    fn font(&self, bold: bool) -> &Font<'static> {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    fn draw_text(&self, canvas: &mut RgbaImage, x: f32, y: f32, size: f32, bold: bool, color: [u8; 3], text: &str) {
        let font = self.font(bold);
        let scale = Scale::uniform(size);
        let v_metrics = font.v_metrics(scale);
        let line_gap = size * LINE_HEIGHT - (v_metrics.ascent - v_metrics.descent);
        let baseline = y + line_gap / 2.0 + v_metrics.ascent;
        let (width, height) = canvas.dimensions();

        for glyph in font.layout(text, scale, point(x, baseline)) {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, coverage| {
                let px = bb.min.x + gx as i32;
                let py = bb.min.y + gy as i32;
                if px < 0 || py < 0 || px >= width as i32 || py >= height as i32 {
                    return;
                }
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                for i in 0..3 {
                    pixel[i] = (color[i] as f32 * coverage + pixel[i] as f32 * (1.0 - coverage)).round() as u8;
                }
                pixel[3] = 255;
            });
        }
    }

    fn paint(&self, layout: &Layout, scale: u32) -> RgbaImage {
        let s = scale as f32;
        let width = CSS_WIDTH * scale;
        let height = (layout.height * s).ceil().max(1.0) as u32;
        let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));

        for op in &layout.ops {
            match op {
                DrawOp::Text { x, y, size, bold, color, text } => {
                    self.draw_text(&mut canvas, x * s, y * s, size * s, *bold, *color, text)
                }
                DrawOp::Fill { x, y, w, h, color } => fill_rect(&mut canvas, x * s, y * s, w * s, h * s, *color),
                DrawOp::Frame { x, y, w, h, color } => {
                    let (x, y, w, h) = (x * s, y * s, w * s, h * s);
                    fill_rect(&mut canvas, x, y, w, s, *color);
                    fill_rect(&mut canvas, x, y + h - s, w, s, *color);
                    fill_rect(&mut canvas, x, y, s, h, *color);
                    fill_rect(&mut canvas, x + w - s, y, s, h, *color);
                }
                DrawOp::Image { x, y, w, h, data_url } => {
                    draw_image(&mut canvas, x * s, y * s, w * s, h * s, data_url)
                }
            }
        }
        canvas
    }
}

impl TextMetrics for FontRasterizer {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let font = self.font(bold);
        font.layout(text, Scale::uniform(size), point(0.0, 0.0))
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0)
    }
}

impl Rasterizer for FontRasterizer {
    fn rasterize(&self, blocks: &[Block], scale: u32) -> Result<RgbaImage, DocumentError> {
        let layout = layout(blocks, self);
        check_height(&layout)?;
        Ok(self.paint(&layout, scale))
    }
}

fn load_font(path: &Path) -> Option<Font<'static>> {
    let bytes = std::fs::read(path).ok()?;
    Font::try_from_vec(bytes)
}

fn fill_rect(canvas: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, color: [u8; 3]) {
    let (width, height) = canvas.dimensions();
    let x0 = x.round().max(0.0) as u32;
    let y0 = y.round().max(0.0) as u32;
    let x1 = ((x + w).round().max(0.0) as u32).min(width);
    let y1 = ((y + h).round().max(0.0) as u32).min(height);
    for py in y0..y1 {
        for px in x0..x1 {
            canvas.put_pixel(px, py, Rgba([color[0], color[1], color[2], 255]));
        }
    }
}

/// Decodes a `data:` URL into raw image bytes.
pub fn decode_data_url(data_url: &str) -> Option<Vec<u8>> {
    let (meta, payload) = data_url.strip_prefix("data:")?.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    BASE64.decode(payload.trim()).ok()
}

/// Draws the image scaled to fit the box. An undecodable image leaves the
/// box empty.
fn draw_image(canvas: &mut RgbaImage, x: f32, y: f32, w: f32, h: f32, data_url: &str) {
    let decoded = decode_data_url(data_url).and_then(|bytes| image::load_from_memory(&bytes).ok());
    let Some(img) = decoded else {
        warn!("Signature image could not be decoded; leaving the box empty");
        return;
    };
    let rgba = img.to_rgba8();
    let (iw, ih) = rgba.dimensions();
    if iw == 0 || ih == 0 {
        return;
    }
    let fit = (w / iw as f32).min(h / ih as f32);
    let tw = ((iw as f32 * fit).round() as u32).max(1);
    let th = ((ih as f32 * fit).round() as u32).max(1);
    let resized = image::imageops::resize(&rgba, tw, th, FilterType::Triangle);
    let ox = x + (w - tw as f32) / 2.0;
    let oy = y + (h - th as f32) / 2.0;
    image::imageops::overlay(canvas, &resized, ox.round() as i64, oy.round() as i64);
}
