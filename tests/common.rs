#![allow(dead_code)]

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};

pub const SVG_LOGO: &[u8] =
    br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#3a7"/></svg>"##;

/// `public/images/_original` below `project_root`, created.
pub fn create_originals_dir(project_root: &Path) -> PathBuf {
    let originals = project_root.join("public/images/_original");
    fs::create_dir_all(&originals).unwrap();
    originals
}

pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 251) as u8, (y % 241) as u8, ((x * y) % 239) as u8])
    });
    img.save(path).unwrap();
}

pub fn write_test_png(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 200, if (x + y) % 2 == 0 { 255 } else { 180 }])
    });
    img.save(path).unwrap();
}

/// The `a.jpg` / `b.svg` / `c.txt` tree used by the end-to-end tests.
pub fn create_mixed_originals(project_root: &Path) -> PathBuf {
    let originals = create_originals_dir(project_root);
    write_test_jpeg(&originals.join("a.jpg"), 1600, 900);
    fs::write(originals.join("b.svg"), SVG_LOGO).unwrap();
    fs::write(originals.join("c.txt"), b"plain text").unwrap();
    originals
}

/// Every regular file below `dir`, relative to it, sorted. Skips nested `skip` subtrees.
pub fn relative_files(dir: &Path, skip: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || e.file_name() != skip)
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect();
    files.sort();
    files
}
