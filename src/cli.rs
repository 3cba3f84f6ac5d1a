use anyhow::Result;
use clap::{Args, Parser};
use console::style;
use std::path::PathBuf;

use crate::image_processing::{
    Dimensions, EngineConfig, GifOptions, DEFAULT_COLORS, DEFAULT_DURATION_MS, DEFAULT_LOOP_COUNT,
};

pub const MIN_COLORS: u16 = 2;
pub const MAX_COLORS: u16 = 256;
/// GIF stores frame sizes as 16-bit values
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Options shared by both converters
#[derive(Args, Debug, Clone, Default)]
pub struct GifArgs {
    /// Time between frames in milliseconds [default: 100]
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "MS",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub duration: Option<u32>,

    /// Number of loops, 0 = loop forever [default: 0]
    #[arg(short = 'l', long = "loop", value_name = "COUNT")]
    pub loop_count: Option<u16>,

    /// Number of palette colors per frame (2-256) [default: 256]
    #[arg(short = 'c', long = "colors", value_name = "N", value_parser = parse_colors)]
    pub colors: Option<u16>,

    /// Resize every frame (format: WIDTHxHEIGHT, e.g., 640x480)
    #[arg(short = 'r', long = "resize", value_name = "WIDTHxHEIGHT", value_parser = parse_resize)]
    pub resize: Option<Dimensions>,

    /// JSON configuration file; command-line options take precedence
    #[arg(long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Keep every palette entry instead of trimming unused colors
    #[arg(long = "no-optimize")]
    pub no_optimize: bool,

    /// Enable verbose output with detailed progress information
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Show what would be generated without writing any file
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Emit progress and results as JSON lines instead of styled output
    #[arg(long = "json-progress")]
    pub json_progress: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "gif-maker",
    version,
    about = "Convert a JPEG image sequence into an animated GIF",
    long_about = "
Convert a JPEG image sequence into an animated GIF.

All .jpg/.jpeg files directly inside INPUT_DIR are sorted in natural order
(frame2.jpg before frame10.jpg), reduced to an adaptive palette and written
as the frames of OUTPUT_FILE.

Example Usage:
  gif-maker ./frames ./out/animation.gif
  gif-maker ./frames out.gif -d 50 -c 128 -r 640x480"
)]
pub struct SingleArgs {
    /// Directory containing the JPEG frames
    #[arg(value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,

    /// GIF file to create
    #[arg(value_name = "OUTPUT_FILE")]
    pub output_file: PathBuf,

    #[command(flatten)]
    pub gif: GifArgs,
}

#[derive(Parser, Debug)]
#[command(
    name = "batch-gif-maker",
    version,
    about = "Convert every JPEG sequence below a directory into animated GIFs",
    long_about = "
Convert every JPEG sequence below a directory into animated GIFs.

Each folder named 'sequence' at least two levels below BASE_DIR becomes one
GIF named after its parent folder:

  BASE_DIR/group/name/sequence/*.jpg  ->  BASE_DIR/group/name.gif

Example Usage:
  batch-gif-maker ./test_images
  batch-gif-maker ./test_images -d 80 -l 3 -r 320x240 --verbose"
)]
pub struct BatchArgs {
    /// Directory to search for 'sequence' folders
    #[arg(value_name = "BASE_DIR")]
    pub base_dir: PathBuf,

    #[command(flatten)]
    pub gif: GifArgs,
}

/// Validate a palette size given as a number
pub fn check_colors(colors: i64) -> Result<u16, String> {
    if colors < i64::from(MIN_COLORS) || colors > i64::from(MAX_COLORS) {
        return Err(format!(
            "Color count must be between {} and {}, got: {}",
            MIN_COLORS, MAX_COLORS, colors
        ));
    }
    Ok(colors as u16)
}

/// Parse and validate a palette size
pub fn parse_colors(value: &str) -> Result<u16, String> {
    let colors = value
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("Invalid color count: '{}'", value))?;
    check_colors(colors)
}

/// Parse a resize string (WIDTHxHEIGHT) into dimensions
pub fn parse_resize(value: &str) -> Result<Dimensions, String> {
    let lowered = value.to_lowercase();
    let parts: Vec<&str> = lowered.split('x').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid size format '{}'. Use WIDTHxHEIGHT (e.g., 640x480)",
            value
        ));
    }

    let width = parts[0]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid width: '{}'", parts[0]))?;
    let height = parts[1]
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("Invalid height: '{}'", parts[1]))?;

    if width == 0 || height == 0 {
        return Err("Width and height must be greater than 0".to_string());
    }

    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(format!(
            "Width and height must be at most {} pixels",
            MAX_DIMENSION
        ));
    }

    Ok(Dimensions { width, height })
}

impl GifArgs {
    /// Resolve the GIF options: command line first, then the config file, then defaults
    pub fn gif_options(&self) -> Result<GifOptions> {
        let file = match &self.config_file {
            Some(path) => Some(crate::config_file::ConfigFile::load(path)?),
            None => None,
        };
        let file = file.unwrap_or_default();

        let duration_ms = match self.duration {
            Some(duration) => duration,
            None => file.duration()?.unwrap_or(DEFAULT_DURATION_MS),
        };
        let colors = match self.colors {
            Some(colors) => colors,
            None => file.colors()?.unwrap_or(DEFAULT_COLORS),
        };
        let resize = match self.resize {
            Some(resize) => Some(resize),
            None => file.resize()?,
        };

        Ok(GifOptions {
            duration_ms,
            loop_count: self
                .loop_count
                .or(file.loop_count)
                .unwrap_or(DEFAULT_LOOP_COUNT),
            colors,
            resize,
            optimize: !self.no_optimize && file.optimize.unwrap_or(true),
        })
    }

    pub fn engine_config(&self) -> Result<EngineConfig> {
        Ok(EngineConfig {
            options: self.gif_options()?,
            verbose: self.verbose,
            dry_run: self.dry_run,
            json_progress: self.json_progress,
        })
    }
}

/// Print the resolved configuration (verbose mode)
pub fn print_configuration(config: &EngineConfig) {
    let options = &config.options;
    println!("{}", style("Configuration:").bold());
    println!("  Frame duration: {}ms", options.duration_ms);
    println!(
        "  Loop count: {}",
        if options.loop_count == 0 {
            "infinite".to_string()
        } else {
            options.loop_count.to_string()
        }
    );
    println!("  Colors: {}", options.colors);
    match options.resize {
        Some(size) => println!("  Resize: {}", size),
        None => println!("  Resize: original size"),
    }
    println!(
        "  Palette optimization: {}",
        if options.optimize { "enabled" } else { "disabled" }
    );
    if config.dry_run {
        println!("  Dry run mode: enabled (simulation only - no files will be created)");
    }
    println!();
}
