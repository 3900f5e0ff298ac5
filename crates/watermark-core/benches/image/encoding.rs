use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use watermark_core::media::image::{Codec, InvisibleCodec};
use watermark_core::media::Algorithm;
use watermark_core::visible::{render, Mark, NormalizedPoint, TextMark};
use watermark_core::{CodecOptions, Payload};

fn carrier_image() -> RgbaImage {
    RgbaImage::from_fn(256, 256, |x, y| Rgba([(x ^ y) as u8, x as u8, y as u8, 255]))
}

pub fn image_encoding(c: &mut Criterion) {
    let carrier = carrier_image();
    let payload = Payload::Text("Hello World!".to_string());

    for algorithm in [Algorithm::Lsb, Algorithm::Dct] {
        let codec = Codec::from(&CodecOptions::from(algorithm));
        c.bench_function(&format!("Image Encoding {algorithm:?}"), |b| {
            b.iter(|| {
                codec
                    .embed(&carrier, &payload)
                    .expect("Cannot hide the secret message")
            })
        });
    }

    let mark: Mark = TextMark::new("Hello World!")
        .with_rotation(30.0)
        .with_position(NormalizedPoint::CENTER)
        .with_origin(NormalizedPoint::CENTER)
        .into();
    c.bench_function("Visible Tiled Text", |b| {
        b.iter(|| render(&carrier, &mark, true))
    });
}

criterion_group!(benches, image_encoding);
criterion_main!(benches);
