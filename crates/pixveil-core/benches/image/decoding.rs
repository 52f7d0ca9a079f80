use criterion::{criterion_group, criterion_main, Criterion};
use pixveil_core::{hide, unveil, CodecOptions, Payload, PayloadKind, PixelBuffer};

pub fn image_decoding(c: &mut Criterion) {
    let carrier = PixelBuffer::from_fn(512, 512, |x, y| [x as u8, y as u8, (x ^ y) as u8]);
    let options = CodecOptions::default();

    let secret = PixelBuffer::from_fn(128, 128, |x, y| [y as u8, x as u8, 0x80]);
    let with_image =
        hide(&carrier, &Payload::Image(secret), &options).expect("Cannot hide secret image");
    c.bench_function("Image Decoding", |b| {
        b.iter(|| unveil(&with_image, PayloadKind::Image, &options).expect("Cannot unveil image"))
    });

    let with_text = hide(&carrier, &Payload::Text("Hello World!".repeat(100)), &options)
        .expect("Cannot hide secret message");
    c.bench_function("Text Decoding", |b| {
        b.iter(|| unveil(&with_text, PayloadKind::Text, &options).expect("Cannot unveil message"))
    });
}

criterion_group!(benches, image_decoding);
criterion_main!(benches);
