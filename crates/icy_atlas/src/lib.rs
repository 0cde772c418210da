//! Monochrome glyph atlas generation.
//!
//! A font is rasterized for a fixed character set into a single row of
//! uniform cells, thresholded to on/off pixels and packed 8 pixels per byte
//! (MSB first, every row starts on a new byte). The result can be written as
//! a raster image and as a C89 array for freestanding renderers.
//!
//! ```no_run
//! use std::path::Path;
//! use icy_atlas::{export_atlas, generate_atlas, CArrayWriter, CharacterSet, ExportPaths, FontdueRasterizer};
//!
//! let font = FontdueRasterizer::from_path(Path::new("consola.ttf"))?;
//! let atlas = generate_atlas(&CharacterSet::printable_ascii(), 32, &font)?;
//! let paths = ExportPaths {
//!     bitmap: "font_atlas.bmp".into(),
//!     source: "font_data.c".into(),
//! };
//! let report = export_atlas(&atlas.binary, &atlas.packed, atlas.metrics.cell, &paths, &CArrayWriter::default())?;
//! println!("{report}");
//! # Ok::<(), icy_atlas::AtlasError>(())
//! ```
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_lossless,
    clippy::cast_precision_loss,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

mod error;
pub use error::*;

mod charset;
pub use charset::*;

mod rasterizer;
pub use rasterizer::*;

mod metrics;
pub use metrics::*;

mod compose;
pub use compose::*;

mod binarize;
pub use binarize::*;

mod bitpack;
pub use bitpack::*;

mod export;
pub use export::*;

use image::GrayImage;

/// Everything produced for one character set before export.
#[derive(Debug, Clone)]
pub struct Atlas {
    pub metrics: GlyphMetrics,
    /// Coverage image straight from the rasterizer.
    pub coverage: GrayImage,
    pub binary: BinaryImage,
    pub packed: BitPackedAtlas,
}

impl Atlas {
    pub fn width(&self) -> u32 {
        self.binary.width()
    }

    pub fn height(&self) -> u32 {
        self.binary.height()
    }
}

/// Runs scan, compose, binarize and pack in sequence.
pub fn generate_atlas(charset: &CharacterSet, pixel_height: u32, rasterizer: &dyn GlyphRasterizer) -> Result<Atlas> {
    let metrics = scan_metrics(charset, pixel_height, rasterizer)?;
    let coverage = compose_atlas(charset, &metrics, pixel_height, rasterizer)?;
    let binary = binarize(&coverage);
    let packed = pack(&binary);
    log::info!(
        "packed {} foreground pixels into {} bytes ({} per row)",
        binary.count_foreground(),
        packed.len(),
        packed.row_stride()
    );
    Ok(Atlas {
        metrics,
        coverage,
        binary,
        packed,
    })
}
