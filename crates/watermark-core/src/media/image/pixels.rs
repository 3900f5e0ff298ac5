//! Conversion between an `RgbaImage` and a flat array of its color channels.
//!
//! Channels are laid out row-major, R→G→B(→A) per pixel. With
//! `skip_alpha` the alpha channel is left out of the array and left untouched
//! when writing back.

use image::RgbaImage;

use super::iterators::{ColorIter, ColorIterMut};
use crate::error::WatermarkError;
use crate::result::Result;

/// number of channels `to_channels` yields for the given image
pub fn channel_count(image: &RgbaImage, skip_alpha: bool) -> usize {
    let per_pixel = if skip_alpha { 3 } else { 4 };
    image.width() as usize * image.height() as usize * per_pixel
}

/// copies all color channels of `image` into a flat array
pub fn to_channels(image: &RgbaImage, skip_alpha: bool) -> Vec<u8> {
    let mut channels = Vec::with_capacity(channel_count(image, skip_alpha));
    channels.extend(ColorIter::from_pixels(image.pixels(), skip_alpha).copied());
    channels
}

/// writes a flat channel array, as produced by `to_channels`, back into `image`
pub fn write_channels(image: &mut RgbaImage, channels: &[u8], skip_alpha: bool) -> Result<()> {
    if channels.len() != channel_count(image, skip_alpha) {
        return Err(WatermarkError::InputInvalid(
            "channel array does not match the image dimensions",
        ));
    }
    for (target, value) in ColorIterMut::from_pixels(image.pixels_mut(), skip_alpha).zip(channels) {
        *target = *value;
    }

    Ok(())
}

/// returns a copy of `image` with its channels replaced by `channels`
pub fn from_channels(image: &RgbaImage, channels: &[u8], skip_alpha: bool) -> Result<RgbaImage> {
    let mut out = image.clone();
    write_channels(&mut out, channels, skip_alpha)?;

    Ok(out)
}
