//! Extension dispatch and per-format encode strategies
//!
//! Every source file is classified by its (case-insensitive) extension into a
//! `FileKind`. Raster kinds carry a `RasterFormat`, which knows how to encode
//! a decoded image with the publishing policy from `constants`.

use crate::constants::{
    COPY_EXTENSIONS, JPEG_QUALITY, LIBDEFLATER_LEVEL, OXIPNG_PRESET, RASTER_EXTENSIONS,
    WEBP_QUALITY,
};
use crate::error::{CompressionError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder};
use image::{DynamicImage, ImageFormat};
use oxipng::{Deflaters, Options};
use std::fmt;
use std::path::Path;

/// Formats the codec can decode, resize and re-encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterFormat {
    Jpeg,
    Png,
    WebP,
}

/// What to do with a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    Raster(RasterFormat),
    /// Passed through byte-for-byte.
    CopyOnly,
    /// Carries the normalized extension, or `None` when the file has none.
    Unsupported(Option<String>),
}

impl RasterFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Some(RasterFormat::Jpeg),
            "png" => Some(RasterFormat::Png),
            "webp" => Some(RasterFormat::WebP),
            _ => None,
        }
    }

    pub fn image_format(&self) -> ImageFormat {
        match self {
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::WebP => ImageFormat::WebP,
        }
    }

    /// Encode `img` into an in-memory buffer using this format's policy.
    pub fn encode(&self, img: &DynamicImage) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        match self {
            RasterFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
                rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))?;
            }
            RasterFormat::Png => {
                let encoder = PngEncoder::new_with_quality(
                    &mut buf,
                    CompressionType::Best,
                    PngFilterType::Adaptive,
                );
                img.write_with_encoder(encoder)?;
                buf = optimize_png(&buf)?;
            }
            RasterFormat::WebP => {
                let pixels = if img.color().has_alpha() {
                    DynamicImage::ImageRgba8(img.to_rgba8())
                } else {
                    DynamicImage::ImageRgb8(img.to_rgb8())
                };
                buf = encode_webp(&pixels)?;
            }
        }
        Ok(buf)
    }
}

impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RasterFormat::Jpeg => "JPEG",
            RasterFormat::Png => "PNG",
            RasterFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

/// Reason recorded for a skipped file.
pub fn unsupported_reason(extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("unsupported extension .{}", ext),
        None => "unsupported extension (none)".to_string(),
    }
}

/// Classify a path by its extension.
pub fn classify(path: &Path) -> FileKind {
    let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
        return FileKind::Unsupported(None);
    };
    let ext = ext.to_lowercase();

    if COPY_EXTENSIONS.contains(&ext.as_str()) {
        return FileKind::CopyOnly;
    }
    if RASTER_EXTENSIONS.contains(&ext.as_str()) {
        if let Some(format) = RasterFormat::from_extension(&ext) {
            return FileKind::Raster(format);
        }
    }
    FileKind::Unsupported(Some(ext))
}

fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>> {
    let encoder = webp::Encoder::from_image(img)
        .map_err(|e| CompressionError::WebPEncoding(e.to_string()))?;
    let memory = encoder
        .encode_simple(false, WEBP_QUALITY)
        .map_err(|e| CompressionError::WebPEncoding(format!("{:?}", e)))?;
    Ok(memory.to_vec())
}

fn optimize_png(data: &[u8]) -> Result<Vec<u8>> {
    let mut options = Options::from_preset(OXIPNG_PRESET);
    options.deflate = Deflaters::Libdeflater {
        compression: LIBDEFLATER_LEVEL,
    };
    oxipng::optimize_from_memory(data, &options)
        .map_err(|e| CompressionError::PngOptimization(e.to_string()))
}
