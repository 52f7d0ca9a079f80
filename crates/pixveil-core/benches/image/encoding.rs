use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pixveil_core::media::image::{embed, EmbeddingPlan};
use pixveil_core::{hide, BitDepth, CodecOptions, Payload, PixelBuffer};

pub fn image_encoding(c: &mut Criterion) {
    let carrier = PixelBuffer::from_fn(512, 512, |x, y| [x as u8, y as u8, (x ^ y) as u8]);
    let secret = PixelBuffer::from_fn(128, 128, |x, y| [y as u8, x as u8, 0x80]);

    c.bench_function("Image Encoding", |b| {
        let payload = Payload::Image(secret.clone());
        let options = CodecOptions::default();

        b.iter(|| hide(&carrier, &payload, &options).expect("Cannot hide secret image"))
    });

    let mut group = c.benchmark_group("Adaptive Embedding");
    for (lsb, msb) in [(1, 1), (4, 4), (8, 8)] {
        let lsb = BitDepth::new(lsb).expect("valid depth");
        let msb = BitDepth::new(msb).expect("valid depth");
        let plan = EmbeddingPlan::spread(
            carrier.channels().len(),
            4096,
            secret.channels().len(),
            lsb,
            msb,
        )
        .expect("secret does not fit");

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("lsb={lsb} msb={msb}")),
            &plan,
            |b, plan| {
                let mut channels = carrier.channels().to_vec();
                b.iter(|| {
                    embed(plan, &mut channels, secret.channels()).expect("Cannot embed secret")
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, image_encoding);
criterion_main!(benches);
