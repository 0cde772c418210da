use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, Naming};
use icy_atlas::{export_atlas, generate_atlas, CArrayWriter, CharacterSet, ExportPaths, FontdueRasterizer};

mod options;
use options::{FileOptions, Options};

#[derive(Parser, Debug)]
#[command(author, version, about = "Converts a TTF/OTF font into a monochrome glyph atlas and a C89 byte array.", long_about = None)]
struct Args {
    #[arg(value_name = "FONT", help = "TTF/OTF font to rasterize.")]
    font: Option<PathBuf>,

    #[arg(short, long, value_name = "PIXELS", help = "Font size in pixels (default 32).")]
    size: Option<u32>,

    #[arg(short, long, value_name = "FILE", help = "Raster output, format by extension (default font_atlas.bmp).")]
    bitmap: Option<PathBuf>,

    #[arg(short = 'o', long, value_name = "FILE", help = "C source output (default font_data.c).")]
    source: Option<PathBuf>,

    #[arg(long, value_name = "NAME", help = "Name of the generated C array (default font_atlas).")]
    array_name: Option<String>,

    #[arg(short, long, value_name = "FILE", help = "TOML file with default settings.")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "SPEC", default_value = "info", help = "Log specification, RUST_LOG takes precedence.")]
    log_level: String,

    #[arg(long, value_name = "DIR", help = "Also write a rotating log file into this directory.")]
    log_dir: Option<PathBuf>,
}

impl Args {
    fn file_options(&self) -> FileOptions {
        FileOptions {
            font: self.font.clone(),
            size: self.size,
            bitmap: self.bitmap.clone(),
            source: self.source.clone(),
            array_name: self.array_name.clone(),
        }
    }
}

fn start_logger(args: &Args) -> anyhow::Result<flexi_logger::LoggerHandle> {
    let logger = Logger::try_with_env_or_str(&args.log_level)?;
    let logger = if let Some(log_dir) = &args.log_dir {
        logger
            .log_to_file(FileSpec::default().directory(log_dir).basename("icy_atlas_gen").suffix("log").suppress_timestamp())
            .rotate(Criterion::Size(64 * 1024), Naming::Numbers, Cleanup::KeepLogFiles(3))
            .duplicate_to_stderr(flexi_logger::Duplicate::Info)
    } else {
        logger.log_to_stderr()
    };
    Ok(logger.start()?)
}

fn run(args: &Args) -> anyhow::Result<()> {
    let file = match &args.config {
        Some(path) => FileOptions::load(path)?,
        None => FileOptions::default(),
    };
    let options = Options::resolve(args.file_options(), file)?;
    log::info!("generating {}px atlas from {}", options.size, options.font.display());

    let writer = CArrayWriter::new(&options.array_name)?;
    let font = FontdueRasterizer::from_path(&options.font).context("Loading font")?;
    let atlas = generate_atlas(&CharacterSet::printable_ascii(), options.size, &font).context("Building atlas")?;

    let paths = ExportPaths {
        bitmap: options.bitmap,
        source: options.source,
    };
    let report = export_atlas(&atlas.binary, &atlas.packed, atlas.metrics.cell, &paths, &writer).context("Exporting atlas")?;
    for line in report.to_string().lines() {
        log::info!("{line}");
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    let _logger = match start_logger(&args) {
        Ok(handle) => Some(handle),
        Err(err) => {
            eprintln!("Failed to start logger: {err}");
            None
        }
    };

    if let Err(err) = run(&args) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Args;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["icy_atlas_gen", "consola.ttf", "-s", "16", "-o", "out/font.c", "--array-name", "boot_font"]).unwrap();
        let options = args.file_options();
        assert_eq!(Some("consola.ttf".into()), options.font);
        assert_eq!(Some(16), options.size);
        assert_eq!(Some("out/font.c".into()), options.source);
        assert_eq!(None, options.bitmap);
        assert_eq!(Some("boot_font".to_string()), options.array_name);
        assert_eq!("info", args.log_level);
    }

    #[test]
    fn test_size_must_be_a_number() {
        assert!(Args::try_parse_from(["icy_atlas_gen", "consola.ttf", "--size", "big"]).is_err());
    }
}
