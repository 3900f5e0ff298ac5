use image::{Rgba, RgbaImage};
use std::io::Cursor;

use watermark_core::api::{WatermarkBuilder, WatermarkDetector};
use watermark_core::commands::save_to_writer;
use watermark_core::media::Algorithm;
use watermark_core::visible::{ImageMark, TextMark};
use watermark_core::WatermarkError;

fn textured_carrier(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (60 + (x * 7 + y * 3) % 120) as u8,
            (80 + (x * y) % 90) as u8,
            (100 + (x + 2 * y) % 70) as u8,
            255,
        ])
    })
}

fn through_png(image: &RgbaImage) -> RgbaImage {
    let mut buf = Cursor::new(Vec::new());
    save_to_writer(image, &mut buf).expect("Cannot encode the png");

    image::load_from_memory(buf.get_ref())
        .expect("Cannot decode the png")
        .to_rgba8()
}

#[test]
fn should_recover_text_after_a_png_round_trip() {
    for algorithm in [Algorithm::Lsb, Algorithm::Dct] {
        let marked = WatermarkBuilder::create(textured_carrier(64, 48))
            .load_text_mark(TextMark::new("Grüße, watermark!"))
            .build_invisible(algorithm, ())
            .wait()
            .expect("Cannot hide the text");

        let found = WatermarkDetector::create(through_png(&marked), algorithm)
            .detect_blocking()
            .expect("Cannot find the text");

        assert_eq!(found.text(), Some("Grüße, watermark!"), "{algorithm:?}");
    }
}

#[test]
fn should_recover_an_image_mark_pixel_exact() {
    let mark = RgbaImage::from_fn(6, 4, |x, y| {
        Rgba([x as u8 * 40, y as u8 * 60, 7, 255 - x as u8])
    });

    let marked = WatermarkBuilder::create(textured_carrier(120, 100))
        .load_image_mark(ImageMark::new(mark.clone()))
        .build_invisible(Algorithm::Lsb, ())
        .wait()
        .expect("Cannot hide the image");

    let found = WatermarkDetector::create(through_png(&marked), Algorithm::Lsb)
        .detect_blocking()
        .expect("Cannot find the image");

    assert_eq!(found.image(), Some(&mark));
}

#[test]
fn should_change_pixels_only_slightly() {
    let carrier = textured_carrier(64, 64);
    let marked = WatermarkBuilder::create(carrier.clone())
        .load_text_mark(TextMark::new("subtle"))
        .build_invisible(Algorithm::Lsb, ())
        .wait()
        .expect("Cannot hide the text");

    let max_change = carrier
        .pixels()
        .zip(marked.pixels())
        .flat_map(|(a, b)| a.0.iter().zip(b.0.iter()).map(|(x, y)| x.abs_diff(*y)))
        .max();
    assert_eq!(max_change, Some(1));
    assert_eq!(marked.dimensions(), carrier.dimensions());
}

#[test]
fn should_find_nothing_in_an_unmarked_image() {
    for algorithm in [Algorithm::Lsb, Algorithm::Dct] {
        let image = RgbaImage::from_pixel(32, 32, Rgba([10, 20, 30, 255]));
        let result = WatermarkDetector::create(image, algorithm).detect_blocking();

        assert!(
            matches!(result, Err(WatermarkError::MarkersNotFound)),
            "{algorithm:?}"
        );
    }
}
