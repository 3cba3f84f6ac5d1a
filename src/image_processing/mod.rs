pub mod discovery;
pub mod encode;
pub mod frame;
pub mod natural_sort;

use anyhow::{Context, Result};
use console::style;
use indicatif::ProgressBar;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::json_output::JsonMessage;
use crate::utils::{
    create_progress_bar, error_println, has_valid_extension, is_hidden, success_println,
    verbose_println, warn_println,
};
use discovery::{find_sequence_folders, SequenceFolder};
use frame::{prepare_frame, PreparedFrame};

/// Extensions accepted as JPEG input (compared lowercase)
pub const JPEG_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Regular, non-hidden file with a JPEG extension
fn is_jpeg_file(path: &Path) -> bool {
    path.is_file() && !is_hidden(path) && has_valid_extension(path, JPEG_EXTENSIONS)
}

pub const DEFAULT_DURATION_MS: u32 = 100;
pub const DEFAULT_LOOP_COUNT: u16 = 0;
pub const DEFAULT_COLORS: u16 = 256;

/// Target frame size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Encoding options applied to every GIF of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifOptions {
    /// Display time of each frame in milliseconds
    pub duration_ms: u32,
    /// Number of loops, 0 = forever
    pub loop_count: u16,
    /// Palette size per frame, 2..=256
    pub colors: u16,
    /// Resize every frame to exactly this size, `None` keeps the source size
    pub resize: Option<Dimensions>,
    /// Trim unused palette entries from each frame
    pub optimize: bool,
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            loop_count: DEFAULT_LOOP_COUNT,
            colors: DEFAULT_COLORS,
            resize: None,
            optimize: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub options: GifOptions,
    pub verbose: bool,
    /// Report what would be converted without decoding or writing anything
    pub dry_run: bool,
    /// Emit JSON lines instead of styled console output
    pub json_progress: bool,
}

/// Result of one successful GIF assembly
#[derive(Debug)]
pub struct GifOutcome {
    pub input_dir: PathBuf,
    pub output_path: PathBuf,
    /// Frames encoded (frames planned in dry-run mode)
    pub frame_count: usize,
    /// Logical screen size, `None` in dry-run mode
    pub dimensions: Option<Dimensions>,
    /// Files that could not be decoded, with the reason
    pub skipped_files: Vec<(PathBuf, String)>,
    pub written: bool,
    pub processing_time: Duration,
}

#[derive(Debug)]
pub enum SequenceStatus {
    Converted(GifOutcome),
    /// The sequence folder holds no JPEG files
    Skipped,
    Failed(String),
}

#[derive(Debug)]
pub struct SequenceResult {
    pub folder: SequenceFolder,
    pub status: SequenceStatus,
}

/// Totals for a batch run
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub discovered: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    pub results: Vec<SequenceResult>,
    pub total_time: Duration,
}

pub struct GifEngine {
    config: EngineConfig,
}

impl GifEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// List the JPEG files directly inside `input_dir`, in natural order
    pub fn discover_images(&self, input_dir: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(input_dir)
            .with_context(|| format!("Failed to read directory: {}", input_dir.display()))?;

        let mut image_files = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if is_jpeg_file(&path) {
                image_files.push(path);
            }
        }

        natural_sort::sort_naturally(&mut image_files);

        verbose_println(
            self.config.verbose && !self.config.json_progress,
            &format!(
                "Found {} JPEG files in {}",
                image_files.len(),
                input_dir.display()
            ),
        );
        Ok(image_files)
    }

    /// Whether `dir` directly contains at least one JPEG file.
    ///
    /// Stops at the first match; an unreadable directory has none.
    pub fn has_images(&self, dir: &Path) -> bool {
        std::fs::read_dir(dir)
            .map(|entries| entries.flatten().any(|entry| is_jpeg_file(&entry.path())))
            .unwrap_or(false)
    }

    /// Build one animated GIF from the JPEG files in `input_dir`.
    ///
    /// Files that fail to decode are reported and skipped. Fails when the
    /// directory has no JPEG files, when no file could be decoded, or when
    /// encoding/writing fails. The file is written in one go after encoding,
    /// so a failure never leaves a partial GIF behind.
    pub fn create_gif(&self, input_dir: &Path, output_path: &Path) -> Result<GifOutcome> {
        let start = Instant::now();
        let options = &self.config.options;

        let image_files = self.discover_images(input_dir)?;
        if image_files.is_empty() {
            anyhow::bail!("No JPEG images found in {}", input_dir.display());
        }

        self.info(&format!("Found {} image files", image_files.len()));

        if self.config.dry_run {
            return Ok(GifOutcome {
                input_dir: input_dir.to_path_buf(),
                output_path: output_path.to_path_buf(),
                frame_count: image_files.len(),
                dimensions: None,
                skipped_files: Vec::new(),
                written: false,
                processing_time: start.elapsed(),
            });
        }

        let (frames, skipped_files) = self.load_frames(&image_files);

        if frames.is_empty() {
            anyhow::bail!("No frames to process in {}", input_dir.display());
        }

        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }

        let bytes = encode::encode_gif(
            &frames,
            options.duration_ms,
            options.loop_count,
            options.optimize,
        )
        .with_context(|| format!("Failed to create GIF: {}", output_path.display()))?;

        std::fs::write(output_path, &bytes)
            .with_context(|| format!("Failed to write GIF: {}", output_path.display()))?;

        let (width, height) = encode::screen_size(&frames);
        Ok(GifOutcome {
            input_dir: input_dir.to_path_buf(),
            output_path: output_path.to_path_buf(),
            frame_count: frames.len(),
            dimensions: Some(Dimensions { width, height }),
            skipped_files,
            written: true,
            processing_time: start.elapsed(),
        })
    }

    /// Decode and quantize every file, skipping the ones that fail
    fn load_frames(&self, image_files: &[PathBuf]) -> (Vec<PreparedFrame>, Vec<(PathBuf, String)>) {
        let options = &self.config.options;
        let progress = if self.config.json_progress {
            ProgressBar::hidden()
        } else {
            create_progress_bar(image_files.len() as u64)
        };
        progress.set_message("Loading frames");

        let mut frames = Vec::with_capacity(image_files.len());
        let mut skipped = Vec::new();

        for (index, path) in image_files.iter().enumerate() {
            match prepare_frame(path, options.resize, options.colors) {
                Ok(frame) => frames.push(frame),
                Err(e) => {
                    let reason = format!("{:#}", e);
                    if !self.config.json_progress {
                        progress.suspend(|| {
                            warn_println(&format!(
                                "Skipping {}: {}",
                                path.display(),
                                reason
                            ))
                        });
                    }
                    skipped.push((path.clone(), reason));
                }
            }

            progress.inc(1);
            if self.config.json_progress {
                JsonMessage::progress(
                    index + 1,
                    image_files.len(),
                    format!("Loaded {}", path.display()),
                );
            }
        }

        progress.finish_and_clear();
        (frames, skipped)
    }

    /// Convert every sequence folder found below `base_dir`.
    ///
    /// A failing sequence is reported and counted; the remaining ones are
    /// still processed.
    pub fn process_all_sequences(&self, base_dir: &Path) -> BatchSummary {
        let start = Instant::now();
        let mut summary = BatchSummary::default();

        let folders = find_sequence_folders(
            base_dir,
            self.config.verbose && !self.config.json_progress,
        );
        summary.discovered = folders.len();

        if folders.is_empty() {
            self.warn(&format!(
                "No 'sequence' folders found in {}",
                base_dir.display()
            ));
            summary.total_time = start.elapsed();
            return summary;
        }

        self.info(&format!("Found {} sequence folders", folders.len()));

        for folder in folders {
            let status = self.process_sequence(&folder);
            match &status {
                SequenceStatus::Converted(_) => summary.converted += 1,
                SequenceStatus::Skipped => summary.skipped += 1,
                SequenceStatus::Failed(_) => summary.failed += 1,
            }
            summary.results.push(SequenceResult { folder, status });
        }

        summary.total_time = start.elapsed();
        summary
    }

    fn process_sequence(&self, folder: &SequenceFolder) -> SequenceStatus {
        if !self.has_images(&folder.sequence_path) {
            self.warn(&format!(
                "No JPEG images in {}, skipping",
                folder.sequence_path.display()
            ));
            return SequenceStatus::Skipped;
        }

        let output_path = folder.output_path();
        if !self.config.json_progress {
            println!();
            println!(
                "{} {} -> {}",
                style("Processing:").bold().cyan(),
                folder.sequence_path.display(),
                output_path.display()
            );
        }

        match self.create_gif(&folder.sequence_path, &output_path) {
            Ok(outcome) => {
                self.report_success(&outcome);
                SequenceStatus::Converted(outcome)
            }
            Err(e) => {
                let message = format!("{:#}", e);
                self.report_failure(&folder.sequence_path, &message);
                SequenceStatus::Failed(message)
            }
        }
    }

    /// Print (or emit as JSON) a successful conversion
    pub fn report_success(&self, outcome: &GifOutcome) {
        if self.config.json_progress {
            JsonMessage::sequence_completed(outcome);
            return;
        }

        if outcome.written {
            success_println(&format!(
                "Created {} ({} frames)",
                outcome.output_path.display(),
                outcome.frame_count
            ));
        } else {
            println!(
                "{} would create {} from {} frames",
                style("[DRY RUN]").yellow().bold(),
                outcome.output_path.display(),
                outcome.frame_count
            );
        }
        if !outcome.skipped_files.is_empty() {
            warn_println(&format!(
                "{} file(s) could not be decoded and were skipped",
                outcome.skipped_files.len()
            ));
        }
        if let Some(dimensions) = outcome.dimensions {
            verbose_println(self.config.verbose, &format!("Frame size: {}", dimensions));
        }
    }

    /// Print (or emit as JSON) a failed conversion
    pub fn report_failure(&self, input_dir: &Path, message: &str) {
        if self.config.json_progress {
            JsonMessage::sequence_failed(input_dir, message);
        } else {
            error_println(message);
        }
    }

    fn info(&self, message: &str) {
        if !self.config.json_progress {
            println!("{}", message);
        }
    }

    fn warn(&self, message: &str) {
        if !self.config.json_progress {
            warn_println(message);
        }
    }
}
