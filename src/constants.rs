/// Originals live here, relative to the project root.
pub const ORIGINALS_DIR: &str = "public/images/_original";
/// Compressed output mirrors the originals tree under this directory.
pub const OUTPUT_DIR: &str = "public/images";

/// Rasters wider than this are scaled down (aspect ratio preserved).
pub const MAX_WIDTH: u32 = 1300;

pub const MIN_CONCURRENCY: usize = 1;
pub const MAX_CONCURRENCY: usize = 8;

// Encoder policy. Changing any of these changes the bytes we publish.
pub const JPEG_QUALITY: u8 = 82;
/// Lossy WebP quality, 0.0..=100.0.
pub const WEBP_QUALITY: f32 = 80.0;
pub const OXIPNG_PRESET: u8 = 4;
pub const LIBDEFLATER_LEVEL: u8 = 12;

/// Passed through untouched: vector, animated, or not decodable by our codec build.
pub const COPY_EXTENSIONS: &[&str] = &["svg", "gif", "avif", "heic", "heif"];
/// Decoded, optionally resized, and re-encoded.
pub const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Common output message prefixes
pub const SUCCESS_PREFIX: &str = "✅";
pub const COPY_PREFIX: &str = "📋";
pub const SKIP_PREFIX: &str = "⏭️ ";
pub const ERROR_PREFIX: &str = "❌";
pub const SUMMARY_PREFIX: &str = "📊";
