use criterion::{Criterion, black_box, criterion_group, criterion_main};
use sm_core::Image;
use sm_morph::{SquareKernel, clean_mask};

fn noisy_mask(width: usize, height: usize) -> Image<u8> {
    Image::from_fn(width, height, |x, y| {
        let band = y > height / 2 && x > width / 4 && x < 3 * width / 4;
        let speck = (x * 31 + y * 17) % 97 == 0;
        u8::from(band ^ speck)
    })
}

fn bench_clean_5x5(c: &mut Criterion) {
    let img = noisy_mask(1024, 1024);
    let view = img.as_view();
    let kernel = SquareKernel::new(5).expect("valid kernel");

    c.bench_function("clean_mask_5x5_1024x1024", |b| {
        b.iter(|| {
            let out = clean_mask(black_box(&view), kernel);
            black_box(out);
        });
    });
}

criterion_group!(benches, bench_clean_5x5);
criterion_main!(benches);
