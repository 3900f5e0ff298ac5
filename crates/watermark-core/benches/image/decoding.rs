use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgba, RgbaImage};
use watermark_core::media::image::{Codec, InvisibleCodec};
use watermark_core::media::Algorithm;
use watermark_core::{CodecOptions, Payload};

pub fn image_decoding(c: &mut Criterion) {
    let carrier = RgbaImage::from_fn(256, 256, |x, y| Rgba([(x ^ y) as u8, x as u8, y as u8, 255]));
    let payload = Payload::Text("Hello World!".to_string());

    for algorithm in [Algorithm::Lsb, Algorithm::Dct] {
        let codec = Codec::from(&CodecOptions::from(algorithm));
        let marked = codec
            .embed(&carrier, &payload)
            .expect("Cannot hide the secret message");

        c.bench_function(&format!("Image Decoding {algorithm:?}"), |b| {
            b.iter(|| codec.detect(&marked).expect("Cannot detect the secret message"))
        });
    }
}

criterion_group!(benches, image_decoding);
criterion_main!(benches);
