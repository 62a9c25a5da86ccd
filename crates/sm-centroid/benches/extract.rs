use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sm_centroid::{ReduceMode, compute_centroid, extract_points};
use sm_core::Image;

fn sidewalk_frame(width: usize, height: usize) -> (Image<u8>, Image<f32>) {
    let mask = Image::from_fn(width, height, |x, y| {
        let half = (y * width) / (2 * height);
        u8::from(y > height / 3 && x + half > width / 2 && x < width / 2 + half)
    });
    let depth = Image::from_fn(width, height, |_, y| 1.0 + 20.0 / (1 + y) as f32);
    (mask, depth)
}

fn bench_extract(c: &mut Criterion) {
    let (mask, depth) = sidewalk_frame(1024, 1024);
    let (mv, dv) = (mask.as_view(), depth.as_view());

    c.bench_function("extract_points_1024x1024", |b| {
        b.iter(|| {
            let points = extract_points(black_box(&mv), black_box(&dv), 1u8).expect("same dims");
            black_box(points);
        });
    });
}

fn bench_median_centroid(c: &mut Criterion) {
    let (mask, depth) = sidewalk_frame(1024, 1024);
    let (mv, dv) = (mask.as_view(), depth.as_view());

    c.bench_function("compute_centroid_median_1024x1024", |b| {
        b.iter(|| {
            let centroid = compute_centroid(black_box(&mv), black_box(&dv), 1u8, ReduceMode::Median);
            let _ = black_box(centroid);
        });
    });
}

criterion_group!(benches, bench_extract, bench_median_centroid);
criterion_main!(benches);
