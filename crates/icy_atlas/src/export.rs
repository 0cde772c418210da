//! Writes the atlas artifacts: a raster image and a C89 source file.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use crate::{AtlasError, BinaryImage, BitPackedAtlas, CellSize, Result};

pub const DEFAULT_ARRAY_NAME: &str = "font_atlas";

/// Renders packed atlas data as a freestanding C array.
///
/// The output only contains a flat `unsigned char` initializer, so it compiles
/// without any headers or runtime support:
///
/// ```text
/// // Font atlas in C89 style
/// // Generated without using stdlib
///
/// unsigned char font_atlas[] = {
///     0x00, 0x18,
///     0x3C, 0x00
/// };
///
/// // Font atlas size: 16x2
/// // Each glyph size: 8x2
/// ```
#[derive(Debug, Clone)]
pub struct CArrayWriter {
    array_name: String,
}

impl Default for CArrayWriter {
    fn default() -> Self {
        Self {
            array_name: DEFAULT_ARRAY_NAME.to_string(),
        }
    }
}

impl CArrayWriter {
    pub fn new(array_name: &str) -> Result<Self> {
        if !is_c_identifier(array_name) {
            return Err(AtlasError::InvalidArrayName(array_name.to_string()));
        }
        Ok(Self {
            array_name: array_name.to_string(),
        })
    }

    pub fn array_name(&self) -> &str {
        &self.array_name
    }

    /// One source line per image row.
    pub fn render(&self, packed: &BitPackedAtlas, cell: CellSize) -> String {
        let mut out = String::new();
        out.push_str("// Font atlas in C89 style\n");
        out.push_str("// Generated without using stdlib\n\n");
        let _ = writeln!(out, "unsigned char {}[] = {{", self.array_name);

        let last = packed.height().saturating_sub(1);
        for (y, row) in packed.rows().enumerate() {
            out.push_str("    ");
            let hex: Vec<String> = row.iter().map(|b| format!("0x{b:02X}")).collect();
            out.push_str(&hex.join(", "));
            if (y as u32) < last {
                out.push(',');
            }
            out.push('\n');
        }

        out.push_str("};\n\n");
        let _ = writeln!(out, "// Font atlas size: {}x{}", packed.width(), packed.height());
        let _ = writeln!(out, "// Each glyph size: {}x{}", cell.width, cell.height);
        out
    }
}

pub fn is_c_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => chars.all(|c| c.is_ascii_alphanumeric() || c == '_'),
        _ => false,
    }
}

/// Output locations of one export run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub bitmap: PathBuf,
    pub source: PathBuf,
}

/// Summary of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub bitmap: PathBuf,
    pub source: PathBuf,
    pub glyph_size: CellSize,
    pub atlas_size: (u32, u32),
    pub packed_len: usize,
}

impl std::fmt::Display for ExportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Saved bitmap: {}", self.bitmap.display())?;
        writeln!(f, "C89 static array saved to: {} ({} bytes)", self.source.display(), self.packed_len)?;
        writeln!(f, "Each glyph: {}", self.glyph_size)?;
        write!(f, "Total atlas: {}x{}", self.atlas_size.0, self.atlas_size.1)
    }
}

/// Writes both artifacts, bitmap first.
///
/// Each file is written to a sibling temporary file and renamed into place, so
/// a failed run never leaves a truncated artifact under the final name. If the
/// source file fails after the bitmap succeeded, the bitmap stays but the
/// whole export is reported as failed. Nothing is written when `binary` and
/// `packed` disagree on the atlas size.
pub fn export_atlas(binary: &BinaryImage, packed: &BitPackedAtlas, cell: CellSize, paths: &ExportPaths, writer: &CArrayWriter) -> Result<ExportReport> {
    let image = (binary.width(), binary.height());
    let packed_size = (packed.width(), packed.height());
    if image != packed_size {
        return Err(AtlasError::DimensionMismatch { image, packed: packed_size });
    }

    save_bitmap(binary, &paths.bitmap)?;
    log::info!("saved bitmap {}", paths.bitmap.display());

    let source = writer.render(packed, cell);
    write_atomic(&paths.source, |tmp| fs::write(tmp, source.as_bytes()).map_err(|e| e.to_string()))?;
    log::info!("saved C array '{}' to {}", writer.array_name(), paths.source.display());

    Ok(ExportReport {
        bitmap: paths.bitmap.clone(),
        source: paths.source.clone(),
        glyph_size: cell,
        atlas_size: (packed.width(), packed.height()),
        packed_len: packed.len(),
    })
}

/// Saves the two-level image through the image codec, format by extension.
pub fn save_bitmap(binary: &BinaryImage, path: &Path) -> Result<()> {
    let format = image::ImageFormat::from_path(path).map_err(|e| AtlasError::output_write(path, e))?;
    let luma = binary.to_luma();
    write_atomic(path, |tmp| luma.save_with_format(tmp, format).map_err(|e| e.to_string()))
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, write: impl FnOnce(&Path) -> std::result::Result<(), String>) -> Result<()> {
    let tmp = temp_path(path);
    if let Err(message) = write(&tmp) {
        let _ = fs::remove_file(&tmp);
        return Err(AtlasError::output_write(path, message));
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(AtlasError::output_write(path, err));
    }
    Ok(())
}
