use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgb, RgbImage};
use squeeze_originals::constants::MAX_WIDTH;
use squeeze_originals::formats::RasterFormat;
use squeeze_originals::processing::{reencode, resize_to_max_width, scaled_dimensions};
use std::path::PathBuf;
use tempfile::TempDir;

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
    }))
}

fn create_test_image(width: u32, height: u32) -> (PathBuf, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("original.jpg");
    gradient(width, height).save(&path).unwrap();
    (path, temp_dir)
}

fn bench_scaled_dimensions(c: &mut Criterion) {
    c.bench_function("scaled_dimensions", |b| {
        b.iter(|| scaled_dimensions(black_box(4032), black_box(3024), black_box(MAX_WIDTH)))
    });
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize_to_max_width");
    group.sample_size(10);

    for &(width, height) in &[(1600u32, 900u32), (2600, 1700)] {
        let img = gradient(width, height);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &img,
            |b, img| {
                b.iter(|| {
                    let mut working = img.clone();
                    resize_to_max_width(&mut working, MAX_WIDTH);
                    working
                })
            },
        );
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    group.sample_size(10);

    let img = gradient(800, 600);
    for format in [RasterFormat::Jpeg, RasterFormat::Png, RasterFormat::WebP] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format),
            &img,
            |b, img| b.iter(|| format.encode(black_box(img)).unwrap()),
        );
    }
    group.finish();
}

fn bench_reencode_file(c: &mut Criterion) {
    let (path, _temp_dir) = create_test_image(1600, 900);

    let mut group = c.benchmark_group("reencode");
    group.sample_size(10);
    group.bench_function("jpeg_1600x900", |b| {
        b.iter(|| reencode(black_box(&path), RasterFormat::Jpeg, MAX_WIDTH).unwrap())
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_scaled_dimensions,
    bench_resize,
    bench_encode,
    bench_reencode_file
);
criterion_main!(benches);
