//! Reduces per-glyph bounding boxes to one uniform atlas cell.

use crate::{AtlasError, CharacterSet, GlyphBBox, GlyphRasterizer, Result};

/// Size of one atlas cell, large enough for every glyph of the set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for CellSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Shift applied to every glyph origin so no glyph starts at a negative coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OffsetVector {
    pub dx: i32,
    pub dy: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub cell: CellSize,
    pub offset: OffsetVector,
}

impl GlyphMetrics {
    /// Folds bounding boxes into cell size and offset.
    ///
    /// The minima start at 0 instead of at the first box, so fonts whose glyphs
    /// all start right of / below the anchor keep a zero offset. Existing
    /// consumers depend on that placement. Ink-less boxes are folded in as well,
    /// a zero-width box still raises the cell height and can move the offset.
    pub fn from_bboxes(bboxes: impl IntoIterator<Item = GlyphBBox>) -> Self {
        let mut max_width = 0;
        let mut max_height = 0;
        let mut min_x = 0;
        let mut min_y = 0;

        for bbox in bboxes {
            max_width = max_width.max(bbox.width());
            max_height = max_height.max(bbox.height());
            min_x = min_x.min(bbox.x0);
            min_y = min_y.min(bbox.y0);
        }

        Self {
            cell: CellSize {
                width: max_width as u32,
                height: max_height as u32,
            },
            offset: OffsetVector { dx: -min_x, dy: -min_y },
        }
    }
}

/// Measures every character of `charset` and returns the uniform cell metrics.
///
/// Any character the rasterizer can't measure aborts the scan, a skipped glyph
/// would shift all following columns.
pub fn scan_metrics(charset: &CharacterSet, pixel_height: u32, rasterizer: &dyn GlyphRasterizer) -> Result<GlyphMetrics> {
    if pixel_height == 0 {
        return Err(AtlasError::InvalidPixelHeight(pixel_height));
    }
    let mut bboxes = Vec::with_capacity(charset.len());
    for ch in charset.iter() {
        let bbox = rasterizer.measure(ch, pixel_height)?;
        log::debug!("glyph {ch:?}: {bbox:?}");
        bboxes.push(bbox);
    }
    let metrics = GlyphMetrics::from_bboxes(bboxes);
    log::info!(
        "measured {} glyphs at {}px: cell {}, offset ({}, {})",
        charset.len(),
        pixel_height,
        metrics.cell,
        metrics.offset.dx,
        metrics.offset.dy
    );
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::{CellSize, GlyphMetrics, OffsetVector};
    use crate::GlyphBBox;

    #[test]
    fn test_cell_is_max_of_boxes() {
        let metrics = GlyphMetrics::from_bboxes([GlyphBBox::new(0, 2, 5, 10), GlyphBBox::new(1, 0, 4, 12), GlyphBBox::new(0, 6, 7, 8)]);
        assert_eq!(CellSize { width: 7, height: 12 }, metrics.cell);
        assert_eq!(OffsetVector::default(), metrics.offset);
    }

    #[test]
    fn test_negative_origins_become_offset() {
        let metrics = GlyphMetrics::from_bboxes([GlyphBBox::new(-2, 1, 3, 9), GlyphBBox::new(0, -3, 4, 5)]);
        assert_eq!(OffsetVector { dx: 2, dy: 3 }, metrics.offset);
        assert_eq!(CellSize { width: 5, height: 8 }, metrics.cell);
    }

    #[test]
    fn test_positive_origins_keep_zero_offset() {
        let metrics = GlyphMetrics::from_bboxes([GlyphBBox::new(3, 4, 8, 10), GlyphBBox::new(2, 5, 6, 9)]);
        assert_eq!(OffsetVector { dx: 0, dy: 0 }, metrics.offset);
    }

    #[test]
    fn test_empty_box_contributes_nothing() {
        let metrics = GlyphMetrics::from_bboxes([GlyphBBox::EMPTY, GlyphBBox::new(1, 1, 3, 4)]);
        assert_eq!(CellSize { width: 2, height: 3 }, metrics.cell);
        assert_eq!(OffsetVector::default(), metrics.offset);
    }

    #[test]
    fn test_zero_width_box_still_counts() {
        let metrics = GlyphMetrics::from_bboxes([GlyphBBox::EMPTY, GlyphBBox::new(-5, -5, -5, 2)]);
        assert_eq!(CellSize { width: 0, height: 7 }, metrics.cell);
        assert_eq!(OffsetVector { dx: 5, dy: 5 }, metrics.offset);

        let metrics = GlyphMetrics::from_bboxes([GlyphBBox::new(0, 0, 4, 4), GlyphBBox::new(-2, -3, -2, 5)]);
        assert_eq!(CellSize { width: 4, height: 8 }, metrics.cell);
        assert_eq!(OffsetVector { dx: 2, dy: 3 }, metrics.offset);
    }

    #[test]
    fn test_inverted_box_does_not_shrink_cell() {
        let metrics = GlyphMetrics::from_bboxes([GlyphBBox::new(0, 0, 3, 3), GlyphBBox::new(2, 2, 0, 0)]);
        assert_eq!(CellSize { width: 3, height: 3 }, metrics.cell);
    }
}
