use std::{fs, path::Path, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const DEFAULT_PIXEL_HEIGHT: u32 = 32;
pub const DEFAULT_BITMAP: &str = "font_atlas.bmp";
pub const DEFAULT_SOURCE: &str = "font_data.c";

/// Settings read from an optional TOML file. Every field may be omitted.
///
/// ```toml
/// font = "C:/Windows/Fonts/consola.ttf"
/// size = 16
/// bitmap = "out/font_atlas.png"
/// source = "out/font_data.c"
/// array_name = "boot_font"
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileOptions {
    pub font: Option<PathBuf>,
    pub size: Option<u32>,
    pub bitmap: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub array_name: Option<String>,
}

impl FileOptions {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let txt = fs::read_to_string(path).map_err(|e| anyhow::anyhow!("Error reading config file {}: {e}", path.display()))?;
        Self::parse(&txt).map_err(|e| anyhow::anyhow!("Error parsing config file {}: {e}", path.display()))
    }

    pub fn parse(txt: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(txt)
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub font: PathBuf,
    pub size: u32,
    pub bitmap: PathBuf,
    pub source: PathBuf,
    pub array_name: String,
}

impl Options {
    /// Command line values win over the config file, which wins over the defaults.
    pub fn resolve(cli: FileOptions, file: FileOptions) -> anyhow::Result<Self> {
        let Some(font) = cli.font.or(file.font) else {
            anyhow::bail!("No font given, pass a font path or set 'font' in the config file");
        };
        Ok(Self {
            font,
            size: cli.size.or(file.size).unwrap_or(DEFAULT_PIXEL_HEIGHT),
            bitmap: cli.bitmap.or(file.bitmap).unwrap_or_else(|| PathBuf::from(DEFAULT_BITMAP)),
            source: cli.source.or(file.source).unwrap_or_else(|| PathBuf::from(DEFAULT_SOURCE)),
            array_name: cli
                .array_name
                .or(file.array_name)
                .unwrap_or_else(|| icy_atlas::DEFAULT_ARRAY_NAME.to_string()),
        })
    }
}
