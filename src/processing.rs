use crate::constants::{
    COPY_PREFIX, ERROR_PREFIX, MAX_WIDTH, ORIGINALS_DIR, OUTPUT_DIR, SKIP_PREFIX, SUCCESS_PREFIX,
};
use crate::error::{CompressionError, Result};
use crate::formats::{classify, unsupported_reason, FileKind, RasterFormat};
use crate::utils::{format_file_size, format_percent_delta, percent_delta};
use crate::{verbose, warn};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::{fs, task};

/// Where originals are read from and where their compressed copies go.
#[derive(Debug, Clone)]
pub struct CompressionOptions {
    pub originals_dir: PathBuf,
    pub output_dir: PathBuf,
    pub max_width: u32,
}

impl CompressionOptions {
    pub fn new(originals_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            originals_dir: originals_dir.into(),
            output_dir: output_dir.into(),
            max_width: MAX_WIDTH,
        }
    }

    /// Standard site layout below `project_root`.
    pub fn for_project(project_root: &Path) -> Self {
        Self::new(project_root.join(ORIGINALS_DIR), project_root.join(OUTPUT_DIR))
    }

    pub fn with_max_width(mut self, max_width: u32) -> Self {
        self.max_width = max_width;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressStatus {
    Compressed,
    Copied,
    Skipped,
    Failed,
}

impl fmt::Display for CompressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompressStatus::Compressed => "compressed",
            CompressStatus::Copied => "copied",
            CompressStatus::Skipped => "skipped",
            CompressStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Compressed {
        resulting_bytes: u64,
        original_dimensions: (u32, u32),
        final_dimensions: (u32, u32),
    },
    /// Written unchanged, so the resulting size is the original size.
    Copied,
    Skipped {
        reason: String,
    },
    Failed {
        reason: String,
    },
}

/// Outcome of processing one original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressResult {
    /// Path relative to the originals directory.
    pub file: PathBuf,
    pub original_bytes: u64,
    pub outcome: Outcome,
}

impl CompressResult {
    pub fn status(&self) -> CompressStatus {
        match self.outcome {
            Outcome::Compressed { .. } => CompressStatus::Compressed,
            Outcome::Copied => CompressStatus::Copied,
            Outcome::Skipped { .. } => CompressStatus::Skipped,
            Outcome::Failed { .. } => CompressStatus::Failed,
        }
    }

    /// Size of the written output; `None` when nothing was written.
    pub fn resulting_bytes(&self) -> Option<u64> {
        match self.outcome {
            Outcome::Compressed {
                resulting_bytes, ..
            } => Some(resulting_bytes),
            Outcome::Copied => Some(self.original_bytes),
            Outcome::Skipped { .. } | Outcome::Failed { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Skipped { reason } | Outcome::Failed { reason } => Some(reason.as_str()),
            _ => None,
        }
    }

    pub fn delta_percent(&self) -> Option<f64> {
        self.resulting_bytes()
            .map(|after| percent_delta(self.original_bytes, after))
    }
}

impl fmt::Display for CompressResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = self.file.display();
        match &self.outcome {
            Outcome::Compressed {
                resulting_bytes,
                original_dimensions: (ow, oh),
                final_dimensions: (fw, fh),
            } => {
                write!(
                    f,
                    "{} {}: {} → {} ({})",
                    SUCCESS_PREFIX,
                    file,
                    format_file_size(self.original_bytes),
                    format_file_size(*resulting_bytes),
                    format_percent_delta(percent_delta(self.original_bytes, *resulting_bytes))
                )?;
                if (ow, oh) != (fw, fh) {
                    write!(f, " [resized {}x{} → {}x{}]", ow, oh, fw, fh)?;
                }
                Ok(())
            }
            Outcome::Copied => write!(
                f,
                "{} {}: copied {}",
                COPY_PREFIX,
                file,
                format_file_size(self.original_bytes)
            ),
            Outcome::Skipped { reason } => write!(f, "{} {}: skipped ({})", SKIP_PREFIX, file, reason),
            Outcome::Failed { reason } => write!(f, "{} {}: failed ({})", ERROR_PREFIX, file, reason),
        }
    }
}

/// A re-encoded raster, ready to be written.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub bytes: Vec<u8>,
    pub original_dimensions: (u32, u32),
    pub final_dimensions: (u32, u32),
}

/// Maps `source` under `root` to the same relative path under `dest`.
pub fn output_path_for(source: &Path, root: &Path, dest: &Path) -> Result<PathBuf> {
    let relative = source
        .strip_prefix(root)
        .map_err(|_| CompressionError::OutsideRoot(source.to_path_buf()))?;
    Ok(dest.join(relative))
}

/// Target size for a width-bound proportional resize, or `None` when the
/// image already fits.
pub fn scaled_dimensions(width: u32, height: u32, max_width: u32) -> Option<(u32, u32)> {
    if max_width == 0 || width <= max_width {
        return None;
    }
    let (w, h, max) = (u64::from(width), u64::from(height), u64::from(max_width));
    let scaled_height = ((h * max + w / 2) / w).max(1);
    Some((max_width, scaled_height as u32))
}

/// Shrinks `img` to `max_width` if it is wider. Returns whether it resized.
pub fn resize_to_max_width(img: &mut DynamicImage, max_width: u32) -> bool {
    let (width, height) = img.dimensions();
    match scaled_dimensions(width, height, max_width) {
        Some((w, h)) => {
            *img = img.resize_exact(w, h, FilterType::Lanczos3);
            true
        }
        None => false,
    }
}

/// Decode, resize and encode one raster. Blocking; run it off the async workers.
///
/// The decoder is picked from the file contents, so a PNG saved as `.jpg`
/// still decodes. The output is encoded as `format`.
pub fn reencode(source: &Path, format: RasterFormat, max_width: u32) -> Result<Encoded> {
    let reader = ImageReader::open(source)?.with_guessed_format()?;
    if let Some(detected) = reader.format() {
        if detected != format.image_format() {
            verbose!(
                "{}: contents are {:?}, writing {}",
                source.display(),
                detected,
                format
            );
        }
    }

    let mut img = reader.decode()?;
    let original_dimensions = img.dimensions();
    verbose!(
        "{}: {} {}x{}",
        source.display(),
        format,
        original_dimensions.0,
        original_dimensions.1
    );

    if resize_to_max_width(&mut img, max_width) {
        verbose!(
            "{}: resized to {}x{}",
            source.display(),
            img.width(),
            img.height()
        );
    }

    let bytes = format.encode(&img)?;
    Ok(Encoded {
        bytes,
        original_dimensions,
        final_dimensions: img.dimensions(),
    })
}

/// Processes one original. Failures are recorded in the result, never returned.
pub async fn compress_file(source: &Path, options: &CompressionOptions) -> CompressResult {
    let file = relative_name(source, &options.originals_dir);

    let original_bytes = match fs::metadata(source).await {
        Ok(metadata) => metadata.len(),
        Err(e) => return failed_result(source, file, 0, e.into()),
    };

    match process_source(source, options).await {
        Ok(outcome) => CompressResult {
            file,
            original_bytes,
            outcome,
        },
        Err(e) => failed_result(source, file, original_bytes, e),
    }
}

/// `source` relative to `root`, or `source` itself if it lies elsewhere.
pub fn relative_name(source: &Path, root: &Path) -> PathBuf {
    source
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| source.to_path_buf())
}

fn failed_result(
    source: &Path,
    file: PathBuf,
    original_bytes: u64,
    err: CompressionError,
) -> CompressResult {
    warn!("Failed to process {}: {}", source.display(), err);
    CompressResult {
        file,
        original_bytes,
        outcome: Outcome::Failed {
            reason: err.to_string(),
        },
    }
}

async fn process_source(source: &Path, options: &CompressionOptions) -> Result<Outcome> {
    match classify(source) {
        FileKind::Unsupported(ext) => Ok(Outcome::Skipped {
            reason: unsupported_reason(ext.as_deref()),
        }),
        FileKind::CopyOnly => {
            let output_path = prepare_output(source, options).await?;
            fs::copy(source, &output_path).await?;
            Ok(Outcome::Copied)
        }
        FileKind::Raster(format) => {
            let output_path = prepare_output(source, options).await?;

            let input = source.to_path_buf();
            let max_width = options.max_width;
            let encoded = task::spawn_blocking(move || reencode(&input, format, max_width)).await??;

            write_replacing(&output_path, encoded.bytes).await?;
            let resulting_bytes = fs::metadata(&output_path).await?.len();

            Ok(Outcome::Compressed {
                resulting_bytes,
                original_dimensions: encoded.original_dimensions,
                final_dimensions: encoded.final_dimensions,
            })
        }
    }
}

async fn prepare_output(source: &Path, options: &CompressionOptions) -> Result<PathBuf> {
    let output_path = output_path_for(source, &options.originals_dir, &options.output_dir)?;
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|_| CompressionError::DirectoryCreationFailed(parent.to_path_buf()))?;
    }
    Ok(output_path)
}

/// Writes `bytes` to a sibling temp file and renames it over `target`, so an
/// interrupted write never leaves a truncated output behind.
async fn write_replacing(target: &Path, bytes: Vec<u8>) -> Result<()> {
    let target = target.to_path_buf();
    task::spawn_blocking(move || -> Result<()> {
        let dir = target
            .parent()
            .ok_or_else(|| CompressionError::DirectoryCreationFailed(target.clone()))?;
        let mut staged = NamedTempFile::new_in(dir)?;
        staged.write_all(&bytes)?;
        staged.as_file().sync_all()?;
        staged.persist(&target).map_err(|e| e.error)?;
        Ok(())
    })
    .await?
}
