use image::buffer::{Pixels, PixelsMut};
use image::Pixel;
use std::iter::Take;
use std::slice::{Iter, IterMut};

/// Row-major mutable access to the color channels of every pixel
pub(crate) struct ColorIterMut<'a, P: Pixel + 'a> {
    pixel: PixelsMut<'a, P>,
    colors: Option<Take<IterMut<'a, P::Subpixel>>>,
    take: usize,
}

impl<'a, P: Pixel + 'a> ColorIterMut<'a, P> {
    pub fn from_pixels(pixel: PixelsMut<'a, P>, skip_alpha: bool) -> Self {
        Self {
            pixel,
            colors: None,
            take: channels_per_pixel::<P>(skip_alpha),
        }
    }
}

impl<'a, P: Pixel + 'a> Iterator for ColorIterMut<'a, P> {
    type Item = &'a mut P::Subpixel;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.colors.as_mut().and_then(Iterator::next) {
                return Some(c);
            }
            let pixel = self.pixel.next()?;
            self.colors = Some(pixel.channels_mut().iter_mut().take(self.take));
        }
    }
}

/// Row-major readonly access to the color channels of every pixel
pub(crate) struct ColorIter<'a, P: Pixel + 'a> {
    pixel: Pixels<'a, P>,
    colors: Option<Take<Iter<'a, P::Subpixel>>>,
    take: usize,
}

impl<'a, P: Pixel + 'a> ColorIter<'a, P> {
    pub fn from_pixels(pixel: Pixels<'a, P>, skip_alpha: bool) -> Self {
        Self {
            pixel,
            colors: None,
            take: channels_per_pixel::<P>(skip_alpha),
        }
    }
}

impl<'a, P: Pixel + 'a> Iterator for ColorIter<'a, P> {
    type Item = &'a P::Subpixel;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(c) = self.colors.as_mut().and_then(Iterator::next) {
                return Some(c);
            }
            let pixel = self.pixel.next()?;
            self.colors = Some(pixel.channels().iter().take(self.take));
        }
    }
}

/// alpha is the last channel of the pixel types we deal with
fn channels_per_pixel<P: Pixel>(skip_alpha: bool) -> usize {
    let n = P::CHANNEL_COUNT as usize;
    if skip_alpha {
        n - 1
    } else {
        n
    }
}
