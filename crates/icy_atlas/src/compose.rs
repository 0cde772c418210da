use image::GrayImage;

use crate::{AtlasError, CharacterSet, GlyphMetrics, GlyphRasterizer, Result};

/// Pixel size of the single-row atlas for `glyph_count` cells.
pub fn atlas_dimensions(metrics: &GlyphMetrics, glyph_count: usize) -> (u32, u32) {
    (metrics.cell.width * glyph_count as u32, metrics.cell.height)
}

/// Renders all glyphs side by side into one coverage image.
///
/// Glyph `i` is drawn with its text anchor at `(i * cell.width + dx, dy)`.
pub fn compose_atlas(charset: &CharacterSet, metrics: &GlyphMetrics, pixel_height: u32, rasterizer: &dyn GlyphRasterizer) -> Result<GrayImage> {
    let (width, height) = atlas_dimensions(metrics, charset.len());
    if width == 0 || height == 0 {
        return Err(AtlasError::EmptyAtlas);
    }

    let mut atlas = GrayImage::new(width, height);
    for (i, ch) in charset.iter().enumerate() {
        let cell_x = (i as u32 * metrics.cell.width) as i32;
        let origin = (cell_x + metrics.offset.dx, metrics.offset.dy);

        let bbox = rasterizer.measure(ch, pixel_height)?;
        if !bbox.is_empty() && (bbox.x1 + metrics.offset.dx > metrics.cell.width as i32 || bbox.y1 + metrics.offset.dy > metrics.cell.height as i32) {
            log::warn!("glyph {ch:?} extends past its {} cell", metrics.cell);
        }

        rasterizer.render(ch, pixel_height, &mut atlas, origin)?;
    }
    log::info!("composed atlas {}x{} with {} cells", width, height, charset.len());
    Ok(atlas)
}
