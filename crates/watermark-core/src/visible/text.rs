//! Rasterizes text marks with the 8x8 bitmap font.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{imageops, Rgb, Rgba, RgbaImage};

use super::mark::{Shadow, TextMark};

const GLYPH_SIZE: u32 = 8;

/// glyph pixels are repeated this often in both directions
pub fn glyph_scale(size: f32) -> u32 {
    let scale = (size / GLYPH_SIZE as f32).round();
    if scale.is_finite() && scale >= 1.0 {
        scale as u32
    } else {
        1
    }
}

/// Renders the text of `mark` in its color, fully opaque, on a transparent
/// canvas. The mark alpha is applied when compositing.
///
/// An empty text gives an empty image.
pub fn render_text(mark: &TextMark) -> RgbaImage {
    let glyphs: Vec<[u8; 8]> = mark.text.chars().map(glyph).collect();
    if glyphs.is_empty() {
        return RgbaImage::new(0, 0);
    }
    let scale = glyph_scale(mark.size);
    let (text_width, text_height) = text_dimensions(glyphs.len() as u32, scale);

    let Some(shadow) = mark.shadow.as_ref() else {
        let mut canvas = RgbaImage::from_pixel(text_width, text_height, transparent(mark.color));
        draw_glyphs(&mut canvas, &glyphs, scale, 0, 0, mark.color);
        return canvas;
    };

    let pad = shadow_padding(shadow);
    let width = text_width + 2 * pad + shadow.dx.unsigned_abs();
    let height = text_height + 2 * pad + shadow.dy.unsigned_abs();
    let text_x = pad + (-shadow.dx).max(0) as u32;
    let text_y = pad + (-shadow.dy).max(0) as u32;

    let mut canvas = RgbaImage::from_pixel(width, height, transparent(shadow.color));
    draw_glyphs(
        &mut canvas,
        &glyphs,
        scale,
        text_x.saturating_add_signed(shadow.dx),
        text_y.saturating_add_signed(shadow.dy),
        shadow.color,
    );
    if shadow.blur_radius > 0.0 {
        canvas = imageops::blur(&canvas, shadow.blur_radius);
    }
    draw_glyphs(&mut canvas, &glyphs, scale, text_x, text_y, mark.color);

    canvas
}

/// size of the unshadowed text raster, glyphs are separated by one scaled pixel
fn text_dimensions(glyphs: u32, scale: u32) -> (u32, u32) {
    let glyph = GLYPH_SIZE * scale;
    (glyphs * glyph + (glyphs - 1) * scale, glyph)
}

fn shadow_padding(shadow: &Shadow) -> u32 {
    if shadow.blur_radius > 0.0 {
        (shadow.blur_radius * 3.0).ceil() as u32
    } else {
        0
    }
}

fn glyph(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn transparent(Rgb([r, g, b]): Rgb<u8>) -> Rgba<u8> {
    Rgba([r, g, b, 0])
}

fn draw_glyphs(
    canvas: &mut RgbaImage,
    glyphs: &[[u8; 8]],
    scale: u32,
    x: u32,
    y: u32,
    color: Rgb<u8>,
) {
    let Rgb([r, g, b]) = color;
    let (width, height) = canvas.dimensions();
    let advance = (GLYPH_SIZE + 1) * scale;

    for (i, rows) in glyphs.iter().enumerate() {
        let glyph_x = x + i as u32 * advance;
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // the lowest bit is the leftmost pixel
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let px = glyph_x + col * scale;
                let py = y + row as u32 * scale;
                for dy in (py..py + scale).take_while(|v| *v < height) {
                    for dx in (px..px + scale).take_while(|v| *v < width) {
                        canvas.put_pixel(dx, dy, Rgba([r, g, b, 255]));
                    }
                }
            }
        }
    }
}
