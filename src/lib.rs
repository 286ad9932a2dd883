pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod formats;
pub mod limiter;
pub mod logger;
pub mod processing;
pub mod utils;
pub mod walker;

pub use batch::{run_batch, BatchConfig, RunSummary, StatusCounts};
pub use error::{CompressionError, Result};
pub use formats::{classify, FileKind, RasterFormat};
pub use limiter::{resolve_concurrency, Limiter, Slot};
pub use processing::{
    compress_file, output_path_for, reencode, resize_to_max_width, scaled_dimensions,
    CompressResult, CompressStatus, CompressionOptions, Outcome,
};
pub use walker::collect_source_files;
