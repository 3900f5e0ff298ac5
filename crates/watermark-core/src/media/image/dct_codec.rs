//! Frequency domain watermark.
//!
//! All RGB channels of the carrier, in row-major order, form one signal that
//! is transformed with an orthonormal DCT-II. The framed payload is written
//! as decimal digits into the leading coefficients, each coefficient moved to
//! the closest value whose rounded magnitude ends in the digit. Detection
//! reads `|round(c)| mod 10` of every coefficient and searches the digit
//! string for a frame.

use image::RgbaImage;
use log::{debug, warn};

use super::pixels::{channel_count, from_channels, to_channels};
use super::transform::{nearest_with_residue, residue_digit, OrthonormalDct, QUANTIZATION_STEP};
use super::{ensure_within_size_limit, InvisibleCodec};
use crate::error::WatermarkError;
use crate::media::codec_options::DctCodecOptions;
use crate::media::payload::{frame, unframe, Payload, DCT_MARKERS};
use crate::result::Result;

/// the alpha channel never carries digits
const SKIP_ALPHA: bool = true;

/// at this headroom every channel is 127 or 128
pub const MAX_HEADROOM: u8 = 127;

#[derive(Debug, Default, Clone)]
pub struct DctCodec {
    options: DctCodecOptions,
}

impl DctCodec {
    pub fn new(options: DctCodecOptions) -> Self {
        Self { options }
    }

    /// Writes `digits` into the leading coefficients of `channels`.
    ///
    /// Channels are first pulled into `[headroom, 255 - headroom]`, where the
    /// headroom is twice the largest change the digits cause, so clamping to
    /// `0..=255` cannot erase them. Should the digits still not survive, the
    /// headroom is doubled until it reaches [`MAX_HEADROOM`].
    pub fn hide(&self, channels: &mut [u8], digits: &[u8]) -> Result<()> {
        if digits.len() > channels.len() {
            return Err(WatermarkError::CapacityExceeded {
                required: digits.len(),
                available: channels.len(),
            });
        }
        let dct = OrthonormalDct::new(channels.len());
        let original = channels.to_vec();
        let mut headroom = required_headroom(&dct, &original, digits);

        loop {
            channels.copy_from_slice(&original);
            channels
                .iter_mut()
                .for_each(|c| *c = (*c).clamp(headroom, u8::MAX - headroom));

            match self.write_digits(&dct, channels, digits) {
                Err(WatermarkError::CarrierSaturated { mismatched })
                    if headroom < MAX_HEADROOM =>
                {
                    debug!("{mismatched} digits lost with a headroom of {headroom}");
                    headroom = headroom.saturating_mul(2).clamp(1, MAX_HEADROOM);
                }
                result => return result,
            }
        }
    }

    /// Rounding and clamping to `0..=255` can shift coefficients again, so the
    /// result is read back and adjusted another time, up to `repair_passes`
    /// times.
    fn write_digits(
        &self,
        dct: &OrthonormalDct,
        channels: &mut [u8],
        digits: &[u8],
    ) -> Result<()> {
        let mut coefficients = dct.coefficients(channels);
        adjust(&mut coefficients, digits);
        dct.channels(&coefficients, channels);

        for pass in 0..self.options.repair_passes {
            let mut coefficients = dct.coefficients(channels);
            let mismatched = adjust(&mut coefficients, digits);
            if mismatched == 0 {
                return Ok(());
            }
            debug!("repair pass {pass} adjusts {mismatched} digits");
            dct.channels(&coefficients, channels);
        }

        let mismatched = mismatches(&dct.coefficients(channels), digits);
        if mismatched > 0 {
            warn!("{mismatched} digits did not survive the embedding");
            return Err(WatermarkError::CarrierSaturated { mismatched });
        }

        Ok(())
    }

    /// the digit of every coefficient of `channels`
    pub fn unveil(channels: &[u8]) -> Vec<u8> {
        OrthonormalDct::new(channels.len())
            .coefficients(channels)
            .into_iter()
            .map(residue_digit)
            .collect()
    }
}

/// Distance to keep from `0` and `255`: twice the largest change, in channel
/// units, that moving the coefficients of `channels` onto `digits` causes.
fn required_headroom(dct: &OrthonormalDct, channels: &[u8], digits: &[u8]) -> u8 {
    let coefficients = dct.coefficients(channels);
    let mut changes = vec![0.0; channels.len()];
    for ((change, c), digit) in changes.iter_mut().zip(&coefficients).zip(digits) {
        *change = (nearest_with_residue(*c, *digit) - c) * QUANTIZATION_STEP;
    }
    dct.inverse(&mut changes);
    let largest = changes.iter().fold(0.0f64, |max, c| max.max(c.abs()));

    (2.0 * largest + 1.0).ceil().min(f64::from(MAX_HEADROOM)) as u8
}

/// Centers every carrying coefficient on an integer with its digit,
/// returns how many carried a wrong digit before.
fn adjust(coefficients: &mut [f64], digits: &[u8]) -> usize {
    let mut wrong = 0;
    for (c, digit) in coefficients.iter_mut().zip(digits) {
        if residue_digit(*c) != *digit {
            wrong += 1;
        }
        *c = nearest_with_residue(*c, *digit);
    }
    wrong
}

fn mismatches(coefficients: &[f64], digits: &[u8]) -> usize {
    coefficients
        .iter()
        .zip(digits)
        .filter(|(c, digit)| residue_digit(**c) != **digit)
        .count()
}

impl InvisibleCodec for DctCodec {
    fn embed(&self, carrier: &RgbaImage, payload: &Payload) -> Result<RgbaImage> {
        ensure_within_size_limit(carrier, self.options.max_image_size)?;
        let digits = frame(payload, &DCT_MARKERS)?;
        let mut channels = to_channels(carrier, SKIP_ALPHA);
        debug!(
            "hiding {} digits in {} coefficients",
            digits.len(),
            channels.len()
        );
        self.hide(&mut channels, &digits)?;

        from_channels(carrier, &channels, SKIP_ALPHA)
    }

    fn detect(&self, carrier: &RgbaImage) -> Result<Payload> {
        ensure_within_size_limit(carrier, self.options.max_image_size)?;
        let digits = Self::unveil(&to_channels(carrier, SKIP_ALPHA));
        debug!("scanning {} digits for a frame", digits.len());

        unframe(&digits, &DCT_MARKERS)
    }

    fn capacity(&self, carrier: &RgbaImage) -> usize {
        channel_count(carrier, SKIP_ALPHA)
    }
}
