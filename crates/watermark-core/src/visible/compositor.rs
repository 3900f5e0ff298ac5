use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use log::debug;

use super::mark::{ImageMark, Mark};
use super::placement::placed_start;
use super::text::render_text;

/// Draws `mark` onto a copy of `background`.
///
/// In tile mode the mark repeats over the whole background, its position
/// only shifts the grid.
pub fn render(background: &RgbaImage, mark: &Mark, tile: bool) -> RgbaImage {
    let mut out = background.clone();
    let (raster, alpha) = match mark {
        Mark::Text(text) => (rotate(&render_text(text), text.rotation), text.alpha),
        Mark::Image(image) => (
            rotate(&scale_image_mark(background, image), image.rotation),
            image.alpha,
        ),
    };
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 || alpha == 0 {
        return out;
    }

    let (bg_width, bg_height) = background.dimensions();
    let (position, origin) = (mark.position(), mark.origin());
    let left = placed_start(position.x(), origin.x(), bg_width, width) as i64;
    let top = placed_start(position.y(), origin.y(), bg_height, height) as i64;

    if !tile {
        debug!("drawing a {width}x{height} mark at ({left}, {top})");
        blend(&mut out, &raster, left, top, alpha);
        return out;
    }

    let (cell_width, cell_height) = (width as i64, height as i64);
    let mut y = phase(top, cell_height);
    while y < bg_height as i64 {
        let mut x = phase(left, cell_width);
        while x < bg_width as i64 {
            blend(&mut out, &raster, x, y, alpha);
            x += cell_width;
        }
        y += cell_height;
    }

    out
}

/// first grid line at or before `0` that is congruent to `offset`
fn phase(offset: i64, cell: i64) -> i64 {
    let start = offset.rem_euclid(cell);
    if start > 0 {
        start - cell
    } else {
        start
    }
}

/// the image mark resized to `size` times the background width, keeping its aspect ratio
pub fn scale_image_mark(background: &RgbaImage, mark: &ImageMark) -> RgbaImage {
    let (mark_width, mark_height) = mark.image.dimensions();
    if mark_width == 0 || mark_height == 0 {
        return RgbaImage::new(0, 0);
    }
    let width = (background.width() as f64 * mark.size).round().max(1.0);
    let height = (mark_height as f64 * width / mark_width as f64).round().max(1.0);
    let (width, height) = (width as u32, height as u32);
    if (width, height) == (mark_width, mark_height) {
        return mark.image.clone();
    }

    imageops::resize(&mark.image, width, height, FilterType::Triangle)
}

/// Rotates `image` clockwise about its center onto a transparent canvas that
/// holds the whole rotated image.
pub fn rotate(image: &RgbaImage, degrees: f64) -> RgbaImage {
    let degrees = degrees.rem_euclid(360.0);
    if degrees == 0.0 || !degrees.is_finite() || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (width, height) = (image.width() as f64, image.height() as f64);
    // the epsilon keeps right angles from growing by a pixel
    let out_width = (width * cos.abs() + height * sin.abs() - 1e-9).ceil().max(1.0);
    let out_height = (width * sin.abs() + height * cos.abs() - 1e-9).ceil().max(1.0);

    RgbaImage::from_fn(out_width as u32, out_height as u32, |x, y| {
        let dx = x as f64 + 0.5 - out_width / 2.0;
        let dy = y as f64 + 0.5 - out_height / 2.0;
        let sx = (dx * cos + dy * sin + width / 2.0).floor();
        let sy = (-dx * sin + dy * cos + height / 2.0).floor();
        if sx < 0.0 || sy < 0.0 || sx >= width || sy >= height {
            Rgba([0, 0, 0, 0])
        } else {
            *image.get_pixel(sx as u32, sy as u32)
        }
    })
}

/// Alpha blends `src` onto `dst` with its top left corner at `(left, top)`,
/// everything outside of `dst` is clipped.
///
/// `out = src * a + dst * (1 - a)` with `a = alpha / 255 * src_alpha / 255`
pub fn blend(dst: &mut RgbaImage, src: &RgbaImage, left: i64, top: i64, alpha: u8) {
    let (dst_width, dst_height) = (dst.width() as i64, dst.height() as i64);
    let mark_alpha = alpha as f64 / 255.0;

    for (sx, sy, pixel) in src.enumerate_pixels() {
        let (x, y) = (left + sx as i64, top + sy as i64);
        if x < 0 || y < 0 || x >= dst_width || y >= dst_height {
            continue;
        }
        let a = mark_alpha * pixel.0[3] as f64 / 255.0;
        if a <= 0.0 {
            continue;
        }
        let target = dst.get_pixel_mut(x as u32, y as u32);
        let mix = |s: f64, d: f64| (s * a + d * (1.0 - a)).round().clamp(0.0, 255.0) as u8;
        *target = Rgba([
            mix(pixel.0[0] as f64, target.0[0] as f64),
            mix(pixel.0[1] as f64, target.0[1] as f64),
            mix(pixel.0[2] as f64, target.0[2] as f64),
            mix(255.0, target.0[3] as f64),
        ]);
    }
}
