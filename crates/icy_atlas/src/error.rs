//! Unified error types for icy_atlas

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for atlas generation
#[derive(Debug, Error)]
pub enum AtlasError {
    // === Input Errors ===
    #[error("Failed to load font '{path}': {message}")]
    ResourceLoad { path: PathBuf, message: String },

    #[error("Failed to measure glyph {ch:?}: {message}")]
    GlyphMeasurement { ch: char, message: String },

    #[error("Pixel height must be at least 1, got {0}")]
    InvalidPixelHeight(u32),

    #[error("Character {0:?} is outside the printable ASCII range")]
    UnsupportedCharacter(char),

    #[error("Character {0:?} appears more than once in the character set")]
    DuplicateCharacter(char),

    #[error("All glyphs are empty, the atlas would have no pixels")]
    EmptyAtlas,

    // === Packing Errors ===
    #[error("Packed data length mismatch: expected {expected}, got {actual}")]
    PackedLengthMismatch { expected: usize, actual: usize },

    #[error("Bitmap is {}x{} but the packed atlas is {}x{}", image.0, image.1, packed.0, packed.1)]
    DimensionMismatch { image: (u32, u32), packed: (u32, u32) },

    // === Output Errors ===
    #[error("Invalid array name '{0}': must be a C identifier")]
    InvalidArrayName(String),

    #[error("Failed to write '{path}': {message}")]
    OutputWrite { path: PathBuf, message: String },
}

/// Result type alias for icy_atlas operations
pub type Result<T> = std::result::Result<T, AtlasError>;

// === Convenience constructors ===
impl AtlasError {
    pub fn resource_load(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::ResourceLoad {
            path: path.into(),
            message: msg.to_string(),
        }
    }

    pub fn glyph(ch: char, msg: impl std::fmt::Display) -> Self {
        Self::GlyphMeasurement { ch, message: msg.to_string() }
    }

    pub fn output_write(path: impl Into<PathBuf>, msg: impl std::fmt::Display) -> Self {
        Self::OutputWrite {
            path: path.into(),
            message: msg.to_string(),
        }
    }
}
