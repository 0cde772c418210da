//! Font rasterization backend.
//!
//! The atlas pipeline only talks to [`GlyphRasterizer`]. [`FontdueRasterizer`] is the
//! TTF/OTF implementation, tests use synthetic ones.

use std::path::Path;

use image::GrayImage;

use crate::{AtlasError, Result};

/// Glyph bounding box in pixels, relative to the text anchor at the left edge
/// of the glyph's advance and the top of the line (ascender).
///
/// `x1`/`y1` are exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphBBox {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl GlyphBBox {
    /// Box of an ink-less glyph like the space.
    pub const EMPTY: Self = Self { x0: 0, y0: 0, x1: 0, y1: 0 };

    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }
}

/// Renders single characters at a pixel size.
pub trait GlyphRasterizer {
    /// Bounding box of `ch` at `pixel_height`, anchored left/top.
    fn measure(&self, ch: char, pixel_height: u32) -> Result<GlyphBBox>;

    /// Draws the coverage of `ch` with its text anchor at `origin`.
    ///
    /// Samples outside `target` are clipped. Where coverage already exists the
    /// larger value wins, which matches drawing an opaque color over a
    /// background.
    fn render(&self, ch: char, pixel_height: u32, target: &mut GrayImage, origin: (i32, i32)) -> Result<()>;
}

/// Blits a coverage bitmap of `width` columns into `target` at `(x, y)`.
pub fn blit_coverage(target: &mut GrayImage, coverage: &[u8], width: usize, x: i32, y: i32) {
    if width == 0 {
        return;
    }
    let (target_width, target_height) = (target.width() as i64, target.height() as i64);
    for (gy, row) in coverage.chunks_exact(width).enumerate() {
        let dst_y = y as i64 + gy as i64;
        if dst_y < 0 || dst_y >= target_height {
            continue;
        }
        for (gx, &sample) in row.iter().enumerate() {
            let dst_x = x as i64 + gx as i64;
            if dst_x < 0 || dst_x >= target_width {
                continue;
            }
            let pixel = target.get_pixel_mut(dst_x as u32, dst_y as u32);
            pixel.0[0] = pixel.0[0].max(sample);
        }
    }
}

/// TrueType/OpenType rasterizer backed by fontdue.
pub struct FontdueRasterizer {
    font: fontdue::Font,
}

impl std::fmt::Debug for FontdueRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontdueRasterizer").field("glyphs", &self.font.glyph_count()).finish()
    }
}

impl FontdueRasterizer {
    /// Loads a TTF/OTF file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| AtlasError::resource_load(path, e))?;
        Self::from_bytes(data, path)
    }

    /// Parses font data, `origin` is only used for error reporting.
    pub fn from_bytes(data: Vec<u8>, origin: &Path) -> Result<Self> {
        let font = fontdue::Font::from_bytes(data, fontdue::FontSettings::default()).map_err(|e| AtlasError::resource_load(origin, e))?;
        if font.horizontal_line_metrics(1.0).is_none() {
            return Err(AtlasError::resource_load(origin, "font has no horizontal line metrics"));
        }
        log::debug!("loaded font {} with {} glyphs", origin.display(), font.glyph_count());
        Ok(Self { font })
    }

    fn ascent(&self, pixel_height: u32) -> i32 {
        self.font
            .horizontal_line_metrics(pixel_height as f32)
            .map_or(pixel_height as i32, |m| m.ascent.round() as i32)
    }

    fn check_glyph(&self, ch: char) -> Result<()> {
        if self.font.lookup_glyph_index(ch) == 0 {
            return Err(AtlasError::glyph(ch, "font has no glyph for this character"));
        }
        Ok(())
    }
}

/// Converts fontdue metrics to a box anchored at the left/top of the line.
///
/// fontdue reports `ymin` as the offset of the bitmap's bottom edge from the
/// baseline, positive upwards. `ascent` is the baseline's distance from the top.
pub fn bbox_from_metrics(metrics: &fontdue::Metrics, ascent: i32) -> GlyphBBox {
    if metrics.width == 0 || metrics.height == 0 {
        return GlyphBBox::EMPTY;
    }
    let x0 = metrics.xmin;
    let y0 = ascent - (metrics.ymin + metrics.height as i32);
    GlyphBBox::new(x0, y0, x0 + metrics.width as i32, y0 + metrics.height as i32)
}

/// Draws a rasterized fontdue bitmap with its text anchor at `origin`.
pub fn place_glyph(target: &mut GrayImage, metrics: &fontdue::Metrics, bitmap: &[u8], ascent: i32, origin: (i32, i32)) {
    let bbox = bbox_from_metrics(metrics, ascent);
    if bbox.is_empty() {
        return;
    }
    blit_coverage(target, bitmap, metrics.width, origin.0 + bbox.x0, origin.1 + bbox.y0);
}

impl GlyphRasterizer for FontdueRasterizer {
    fn measure(&self, ch: char, pixel_height: u32) -> Result<GlyphBBox> {
        if pixel_height == 0 {
            return Err(AtlasError::InvalidPixelHeight(pixel_height));
        }
        self.check_glyph(ch)?;
        let metrics = self.font.metrics(ch, pixel_height as f32);
        Ok(bbox_from_metrics(&metrics, self.ascent(pixel_height)))
    }

    fn render(&self, ch: char, pixel_height: u32, target: &mut GrayImage, origin: (i32, i32)) -> Result<()> {
        if pixel_height == 0 {
            return Err(AtlasError::InvalidPixelHeight(pixel_height));
        }
        self.check_glyph(ch)?;
        let (metrics, bitmap) = self.font.rasterize(ch, pixel_height as f32);
        if bitmap.len() != metrics.width * metrics.height {
            return Err(AtlasError::glyph(ch, "rasterizer returned a truncated bitmap"));
        }
        place_glyph(target, &metrics, &bitmap, self.ascent(pixel_height), origin);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use image::GrayImage;

    use super::{bbox_from_metrics, blit_coverage, place_glyph, FontdueRasterizer, GlyphBBox};
    use crate::AtlasError;

    fn glyph_metrics(xmin: i32, ymin: i32, width: usize, height: usize) -> fontdue::Metrics {
        fontdue::Metrics {
            xmin,
            ymin,
            width,
            height,
            advance_width: width as f32,
            advance_height: 0.0,
            bounds: fontdue::OutlineBounds {
                xmin: xmin as f32,
                ymin: ymin as f32,
                width: width as f32,
                height: height as f32,
            },
        }
    }

    #[test]
    fn test_descender_box() {
        // 'g' like glyph: 3 px below the baseline, baseline 8 px from the top
        let bbox = bbox_from_metrics(&glyph_metrics(1, -3, 5, 10), 8);
        assert_eq!(GlyphBBox::new(1, 1, 6, 11), bbox);
    }

    #[test]
    fn test_raised_box() {
        // apostrophe like glyph sitting 4 px above the baseline
        let bbox = bbox_from_metrics(&glyph_metrics(-1, 4, 2, 3), 8);
        assert_eq!(GlyphBBox::new(-1, 1, 1, 4), bbox);
    }

    #[test]
    fn test_empty_bitmap_box() {
        assert_eq!(GlyphBBox::EMPTY, bbox_from_metrics(&glyph_metrics(3, -2, 0, 0), 8));
        assert_eq!(GlyphBBox::EMPTY, bbox_from_metrics(&glyph_metrics(3, -2, 4, 0), 8));
    }

    #[test]
    fn test_place_glyph_offsets_by_box() {
        let mut target = GrayImage::new(4, 4);
        // 2x2 bitmap, bottom edge 1 px above the baseline, baseline 4 px down
        let metrics = glyph_metrics(1, 1, 2, 2);
        place_glyph(&mut target, &metrics, &[10, 20, 30, 40], 4, (1, 0));
        #[rustfmt::skip]
        let expected = [
            0, 0,  0,  0,
            0, 0, 10, 20,
            0, 0, 30, 40,
            0, 0,  0,  0,
        ];
        assert_eq!(&expected, target.as_raw().as_slice());
    }

    #[test]
    fn test_place_empty_glyph_draws_nothing() {
        let mut target = GrayImage::new(2, 2);
        place_glyph(&mut target, &glyph_metrics(0, 0, 0, 0), &[], 2, (0, 0));
        assert!(target.as_raw().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_bbox_dimensions() {
        let bbox = GlyphBBox::new(-1, 3, 6, 12);
        assert_eq!(7, bbox.width());
        assert_eq!(9, bbox.height());
        assert!(!bbox.is_empty());
        assert!(GlyphBBox::EMPTY.is_empty());
    }

    #[test]
    fn test_blit_clips_at_edges() {
        let mut target = GrayImage::new(3, 2);
        let coverage = [10, 20, 30, 40];
        blit_coverage(&mut target, &coverage, 2, -1, 1);
        assert_eq!(&[0, 0, 0, 20, 0, 0], target.as_raw().as_slice());

        let mut target = GrayImage::new(3, 2);
        blit_coverage(&mut target, &coverage, 2, 2, -1);
        assert_eq!(&[0, 0, 30, 0, 0, 0], target.as_raw().as_slice());
    }

    #[test]
    fn test_blit_keeps_stronger_coverage() {
        let mut target = GrayImage::from_raw(2, 1, vec![200, 5]).unwrap();
        blit_coverage(&mut target, &[100, 100], 2, 0, 0);
        assert_eq!(&[200, 100], target.as_raw().as_slice());
    }

    #[test]
    fn test_missing_font_file() {
        let err = FontdueRasterizer::from_path(Path::new("this/font/does/not/exist.ttf")).unwrap_err();
        assert!(matches!(err, AtlasError::ResourceLoad { .. }));
    }

    #[test]
    fn test_garbage_font_data() {
        let err = FontdueRasterizer::from_bytes(b"definitely not a font".to_vec(), Path::new("garbage.ttf")).unwrap_err();
        assert!(matches!(err, AtlasError::ResourceLoad { .. }));
    }
}
