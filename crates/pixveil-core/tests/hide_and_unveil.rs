use pixveil_core::bit_plane::BitDepth;
use pixveil_core::capacity::Capacity;
use pixveil_core::media::header::{HeaderCodec, ImageHeader, IMAGE_HEADER_RESERVED_BITS};
use pixveil_core::media::image::{embed, extract, EmbeddingPlan};
use pixveil_core::*;

fn depth(d: u8) -> BitDepth {
    BitDepth::try_from(d).unwrap()
}

fn carrier(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        let i = x.wrapping_mul(31) ^ y.wrapping_mul(17);
        [i as u8, (i >> 3) as u8, (x + y) as u8]
    })
}

fn secret(width: u32, height: u32) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        [(x * 255 / width.max(1)) as u8, (y * 255 / height.max(1)) as u8, 0x5A]
    })
}

fn options(lsb: u8, msb: u8) -> CodecOptions {
    CodecOptions::default().with_adaptive(AdaptiveOptions::new(depth(lsb), depth(msb)))
}

fn keep_high_bits(image: &PixelBuffer, msb: u8) -> PixelBuffer {
    let keep = !0xFFu8.checked_shr(msb as u32).unwrap_or(0);
    PixelBuffer::new(
        image.width(),
        image.height(),
        image.channels().iter().map(|c| c & keep).collect(),
    )
    .unwrap()
}

#[test]
fn should_round_trip_images_for_all_depths() {
    let carrier = carrier(80, 80);
    let secret = secret(12, 9);

    for lsb in 1..=8 {
        for msb in 1..=8 {
            let options = options(lsb, msb);
            let stego = hide(&carrier, &Payload::Image(secret.clone()), &options).unwrap();
            let unveiled = unveil(&stego, PayloadKind::Image, &options).unwrap();

            assert_eq!(
                unveiled,
                Payload::Image(keep_high_bits(&secret, msb)),
                "lsb={lsb} msb={msb}"
            );
        }
    }
}

#[test]
fn should_store_a_self_describing_header() {
    let carrier = carrier(64, 64);
    let stego = hide(&carrier, &Payload::Image(secret(10, 7)), &options(3, 5)).unwrap();

    let header: ImageHeader = HeaderCodec::new(IMAGE_HEADER_RESERVED_BITS)
        .read_record(stego.channels())
        .unwrap();

    assert_eq!((header.width, header.height), (10, 7));
    assert_eq!((header.lsb.get(), header.msb.get()), (3, 5));
    // 8190 whole group channels at 3 bits, 1050 payload bits make 117 groups of 9 bits
    assert_eq!(header.stride, (8190 * 3) as f64 / (117 * 9) as f64);
}

#[test]
fn should_only_touch_the_low_bits_of_the_carrier() {
    let carrier = carrier(64, 64);

    for lsb in [1, 2, 5] {
        let stego = hide(&carrier, &Payload::Image(secret(16, 16)), &options(lsb, 8)).unwrap();
        let mask = depth(lsb).mask();

        for (before, after) in carrier.channels().iter().zip(stego.channels()) {
            assert_eq!(before & !mask, after & !mask, "lsb={lsb}");
        }
    }
}

#[test]
fn should_reproduce_the_4x4_scenario() {
    // no reserved region, a single payload pixel, one write at the very start
    let mut channels = carrier(4, 4).into_channels();
    let before = channels.clone();
    let payload = [0b1100_0011, 0b0011_1100, 0b1000_0000];
    let plan = EmbeddingPlan::spread(48, 0, 3, depth(1), depth(1)).unwrap();

    assert_eq!(plan.stride(), 16.0);
    embed(&plan, &mut channels, &payload).unwrap();

    let changed: Vec<usize> = (0..48).filter(|i| channels[*i] != before[*i]).collect();
    assert!(changed.iter().all(|i| *i < 3));
    assert_eq!(
        extract(&plan, &channels).unwrap(),
        vec![0b1000_0000, 0b0000_0000, 0b1000_0000]
    );
}

#[test]
fn should_accept_an_exact_fit_and_reject_one_group_more() {
    // lsb = msb means a payload channel per carrier channel
    let carrier = carrier(64, 64);
    let available = Capacity::of(64, 64, IMAGE_HEADER_RESERVED_BITS, depth(2))
        .in_groups_of(3)
        .available_slots();
    let pixels = (available / 3) as u32;

    // 2730 pixels fit exactly in a 2730 x 1 payload
    let exact = secret(pixels, 1);
    let stego = hide(&carrier, &Payload::Image(exact.clone()), &options(2, 2)).unwrap();
    assert_eq!(
        unveil(&stego, PayloadKind::Image, &options(2, 2)).unwrap(),
        Payload::Image(keep_high_bits(&exact, 2))
    );

    match hide(&carrier, &Payload::Image(secret(pixels + 1, 1)), &options(2, 2)) {
        Err(SteganoError::CapacityExceeded {
            required,
            available,
        }) => assert_eq!(required - available, 6),
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
}

#[test]
fn should_reject_a_custom_stride_that_runs_off_the_carrier() {
    let options = CodecOptions::default()
        .with_adaptive(AdaptiveOptions::new(depth(4), depth(4)).with_stride(1000.0));

    assert!(matches!(
        hide(&carrier(64, 64), &Payload::Image(secret(8, 8)), &options),
        Err(SteganoError::InvalidStride { .. })
    ));
}

#[test]
fn should_round_trip_text_and_files_next_to_noise() {
    let carrier = carrier(80, 80);
    let options = CodecOptions::default();

    let text = Payload::Text("Съешь же ещё этих мягких французских булок".into());
    let stego = hide(&carrier, &text, &options).unwrap();
    assert_eq!(unveil(&stego, PayloadKind::Text, &options).unwrap(), text);

    let blob = Payload::Blob(BlobPayload::new("report.pdf", vec![0; 300]));
    let stego = hide(&carrier, &blob, &options).unwrap();
    assert_eq!(unveil(&stego, PayloadKind::Blob, &options).unwrap(), blob);
}

#[test]
fn should_not_find_an_image_in_a_plain_carrier() {
    let plain = PixelBuffer::from_fn(64, 64, |_, _| [0xFE, 0xFE, 0xFE]);

    assert!(matches!(
        unveil(&plain, PayloadKind::Image, &CodecOptions::default()),
        Err(SteganoError::CorruptHeader(_))
    ));
}
