use crate::constants::{ERROR_PREFIX, SKIP_PREFIX, SUMMARY_PREFIX};
use crate::error::Result;
use crate::limiter::{resolve_concurrency, Limiter};
use crate::logger::batch_progress;
use crate::processing::{
    compress_file, relative_name, CompressResult, CompressStatus, CompressionOptions, Outcome,
};
use crate::utils::{format_file_size, format_percent_delta, percent_delta};
use crate::walker::{collect_source_files, ensure_root_dir};
use crate::{info, verbose};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub options: CompressionOptions,
    pub concurrency: usize,
}

impl BatchConfig {
    pub fn new(options: CompressionOptions, concurrency: usize) -> Self {
        Self {
            options,
            concurrency,
        }
    }

    /// Site layout below `project_root`, with `jobs` (or the CPU count)
    /// clamped to the supported concurrency range.
    pub fn for_project(project_root: &Path, jobs: Option<usize>) -> Self {
        Self::new(
            CompressionOptions::for_project(project_root),
            resolve_concurrency(jobs),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub compressed: usize,
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<CompressResult>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for result in &self.results {
            match result.status() {
                CompressStatus::Compressed => counts.compressed += 1,
                CompressStatus::Copied => counts.copied += 1,
                CompressStatus::Skipped => counts.skipped += 1,
                CompressStatus::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// Original bytes of every file that produced output.
    pub fn total_original_bytes(&self) -> u64 {
        self.results
            .iter()
            .filter(|r| r.resulting_bytes().is_some())
            .map(|r| r.original_bytes)
            .sum()
    }

    pub fn total_resulting_bytes(&self) -> u64 {
        self.results.iter().filter_map(|r| r.resulting_bytes()).sum()
    }

    pub fn delta_percent(&self) -> f64 {
        percent_delta(self.total_original_bytes(), self.total_resulting_bytes())
    }

    pub fn with_status(&self, status: CompressStatus) -> impl Iterator<Item = &CompressResult> {
        self.results.iter().filter(move |r| r.status() == status)
    }

    pub fn print(&self) {
        for result in &self.results {
            info!("{}", result);
        }

        let counts = self.counts();
        info!("\n{} Batch Compression Summary:", SUMMARY_PREFIX);
        info!("Compressed: {}", counts.compressed);
        info!("Copied (no compression needed): {}", counts.copied);
        info!("Skipped: {}", counts.skipped);
        for result in self.with_status(CompressStatus::Skipped) {
            info!(
                " {} {}: {}",
                SKIP_PREFIX,
                result.file.display(),
                result.reason().unwrap_or_default()
            );
        }
        info!("Failed: {}", counts.failed);
        for result in self.with_status(CompressStatus::Failed) {
            info!(
                " {} {}: {}",
                ERROR_PREFIX,
                result.file.display(),
                result.reason().unwrap_or_default()
            );
        }
        info!(
            "Total: {} → {} ({})",
            format_file_size(self.total_original_bytes()),
            format_file_size(self.total_resulting_bytes()),
            format_percent_delta(self.delta_percent())
        );
        info!("⏱️  Total time: {:.2?}", self.elapsed);
    }
}

/// Compress every original below `config.options.originals_dir`.
///
/// Fails fast with `RootNotFound` before touching the output tree. Per-file
/// problems never fail the run; they show up as `skipped` or `failed`
/// results in the returned summary, which has already been printed.
pub async fn run_batch(config: &BatchConfig) -> Result<RunSummary> {
    let start_time = Instant::now();
    let root = config.options.originals_dir.clone();
    ensure_root_dir(&root)?;

    let walk_root = root.clone();
    let files = tokio::task::spawn_blocking(move || collect_source_files(&walk_root)).await??;
    if files.is_empty() {
        info!("No originals to compress.");
        return Ok(RunSummary::default());
    }

    let limiter = Limiter::new(config.concurrency)?;
    info!(
        "🚀 Compressing {} originals from {} with {} workers",
        files.len(),
        root.display(),
        limiter.capacity()
    );
    verbose!("Output directory: {}", config.options.output_dir.display());

    let options = Arc::new(config.options.clone());
    let progress = batch_progress(files.len() as u64);

    // Admission happens here, in walk order; each admitted file then runs on
    // its own task and gives its slot back when done.
    let mut pending = Vec::with_capacity(files.len());
    for source in files {
        let slot = limiter.admit().await?;
        let options = Arc::clone(&options);
        let progress = progress.clone();
        let task_source = source.clone();
        let handle = tokio::spawn(async move {
            let _slot = slot;
            let result = compress_file(&task_source, &options).await;
            progress.inc(1);
            result
        });
        pending.push((source, handle));
    }

    let mut results = Vec::with_capacity(pending.len());
    for (source, handle) in pending {
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => CompressResult {
                file: relative_name(&source, &options.originals_dir),
                original_bytes: 0,
                outcome: Outcome::Failed {
                    reason: e.to_string(),
                },
            },
        };
        results.push(result);
    }
    progress.finish_and_clear();

    let summary = RunSummary {
        results,
        elapsed: start_time.elapsed(),
    };
    summary.print();
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompressionError;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn result(file: &str, original_bytes: u64, outcome: Outcome) -> CompressResult {
        CompressResult {
            file: PathBuf::from(file),
            original_bytes,
            outcome,
        }
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 90, 255])
        });
        img.save(path).unwrap();
    }

    #[test]
    fn test_batch_config_for_project() {
        let config = BatchConfig::for_project(Path::new("/site"), Some(100));
        assert_eq!(config.concurrency, 8);
        assert_eq!(
            config.options.originals_dir,
            PathBuf::from("/site/public/images/_original")
        );
    }

    #[test]
    fn test_run_summary_totals() {
        let summary = RunSummary {
            results: vec![
                result(
                    "a.jpg",
                    1000,
                    Outcome::Compressed {
                        resulting_bytes: 400,
                        original_dimensions: (10, 10),
                        final_dimensions: (10, 10),
                    },
                ),
                result("b.svg", 200, Outcome::Copied),
                result(
                    "c.txt",
                    50,
                    Outcome::Skipped {
                        reason: "unsupported extension .txt".to_string(),
                    },
                ),
                result(
                    "d.png",
                    70,
                    Outcome::Failed {
                        reason: "bad".to_string(),
                    },
                ),
            ],
            elapsed: Duration::ZERO,
        };

        assert_eq!(
            summary.counts(),
            StatusCounts {
                compressed: 1,
                copied: 1,
                skipped: 1,
                failed: 1,
            }
        );
        assert_eq!(summary.total_original_bytes(), 1200);
        assert_eq!(summary.total_resulting_bytes(), 600);
        assert_eq!(summary.delta_percent(), -50.0);
        assert_eq!(summary.with_status(CompressStatus::Skipped).count(), 1);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::default();
        assert!(summary.is_empty());
        assert_eq!(summary.counts(), StatusCounts::default());
        assert_eq!(summary.delta_percent(), 0.0);
    }

    #[tokio::test]
    async fn test_run_batch_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let options = CompressionOptions::new(
            temp_dir.path().join("missing"),
            temp_dir.path().join("out"),
        );

        let result = run_batch(&BatchConfig::new(options, 2)).await;

        assert!(matches!(result, Err(CompressionError::RootNotFound(_))));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_run_batch_empty_root() {
        let temp_dir = TempDir::new().unwrap();
        let originals = temp_dir.path().join("originals");
        fs::create_dir(&originals).unwrap();
        let options = CompressionOptions::new(&originals, temp_dir.path().join("out"));

        let summary = run_batch(&BatchConfig::new(options, 2)).await.unwrap();

        assert!(summary.is_empty());
        assert!(!temp_dir.path().join("out").exists());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_run_batch_one_result_per_file_and_failure_is_isolated() {
        let temp_dir = TempDir::new().unwrap();
        let originals = temp_dir.path().join("originals");
        let out = temp_dir.path().join("out");
        fs::create_dir_all(originals.join("nested/deeper")).unwrap();

        write_png(&originals.join("ok.png"), 40, 30);
        write_png(&originals.join("nested/deeper/wide.png"), 200, 50);
        fs::write(originals.join("nested/corrupt.jpg"), b"garbage").unwrap();
        fs::write(originals.join("nested/icon.svg"), b"<svg/>").unwrap();
        fs::write(originals.join("notes.md"), b"# hi").unwrap();

        let options = CompressionOptions::new(&originals, &out).with_max_width(100);
        let summary = run_batch(&BatchConfig::new(options, 3)).await.unwrap();

        assert_eq!(summary.results.len(), 5);
        assert_eq!(
            summary.counts(),
            StatusCounts {
                compressed: 2,
                copied: 1,
                skipped: 1,
                failed: 1,
            }
        );

        let failed: Vec<_> = summary.with_status(CompressStatus::Failed).collect();
        assert_eq!(failed[0].file, PathBuf::from("nested/corrupt.jpg"));

        assert_eq!(
            image::image_dimensions(out.join("nested/deeper/wide.png")).unwrap(),
            (100, 25)
        );
        assert_eq!(fs::read(out.join("nested/icon.svg")).unwrap(), b"<svg/>");
        assert!(!out.join("notes.md").exists());
    }
}
