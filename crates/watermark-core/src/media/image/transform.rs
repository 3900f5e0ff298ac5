//! Orthonormal DCT over a whole channel array and the digit arithmetic on
//! its coefficients.

use rustdct::{DctPlanner, TransformType2And3};
use std::sync::Arc;

/// Orthonormal coefficients are divided by this before digits are read from them.
/// Larger steps make the digits survive rounding of the pixel values.
pub const QUANTIZATION_STEP: f64 = 8.0;

/// DCT-II / DCT-III pair scaled to be orthonormal, so forward followed by
/// inverse is the identity and energy is preserved
pub struct OrthonormalDct {
    len: usize,
    transform: Option<Arc<dyn TransformType2And3<f64>>>,
}

impl OrthonormalDct {
    pub fn new(len: usize) -> Self {
        let transform = (len > 0).then(|| DctPlanner::new().plan_dct2(len));
        Self { len, transform }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// `buffer` must have the planned length
    pub fn forward(&self, buffer: &mut [f64]) {
        let Some(transform) = self.transform.as_ref() else {
            return;
        };
        transform.process_dct2(buffer);

        let n = self.len as f64;
        buffer[0] *= (1.0 / n).sqrt();
        let scale = (2.0 / n).sqrt();
        buffer[1..].iter_mut().for_each(|c| *c *= scale);
    }

    /// `buffer` must have the planned length
    pub fn inverse(&self, buffer: &mut [f64]) {
        let Some(transform) = self.transform.as_ref() else {
            return;
        };
        let n = self.len as f64;
        buffer[0] *= n.sqrt();
        let scale = (n / 2.0).sqrt();
        buffer[1..].iter_mut().for_each(|c| *c *= scale);

        // DCT-III of a DCT-II output yields the input scaled by n / 2
        transform.process_dct3(buffer);
        let scale = 2.0 / n;
        buffer.iter_mut().for_each(|c| *c *= scale);
    }

    /// channel values to coefficients in the digit domain
    pub fn coefficients(&self, channels: &[u8]) -> Vec<f64> {
        let mut buffer: Vec<f64> = channels.iter().map(|c| f64::from(*c)).collect();
        self.forward(&mut buffer);
        buffer.iter_mut().for_each(|c| *c /= QUANTIZATION_STEP);
        buffer
    }

    /// coefficients in the digit domain back to channel values,
    /// rounded half away from zero and clamped to `0..=255`
    pub fn channels(&self, coefficients: &[f64], channels: &mut [u8]) {
        let mut buffer: Vec<f64> = coefficients.iter().map(|c| c * QUANTIZATION_STEP).collect();
        self.inverse(&mut buffer);
        for (target, value) in channels.iter_mut().zip(buffer) {
            *target = value.round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// the digit a coefficient carries: `|round(c)| mod 10`, rounding half away from zero
pub fn residue_digit(coefficient: f64) -> u8 {
    // `f64::round` rounds half away from zero
    (coefficient.round().abs() as u64 % 10) as u8
}

/// The integer closest to `value` whose magnitude ends in `digit`.
///
/// An integer target sits in the middle of its rounding interval, so small
/// disturbances of the pixels do not change the digit. Ties go to the smaller
/// candidate.
pub fn nearest_with_residue(value: f64, digit: u8) -> f64 {
    debug_assert!(digit < 10, "a digit is expected, got {digit}");
    let center = value.round() as i64;

    (center - 10..=center + 10)
        .filter(|m| (m.unsigned_abs() % 10) as u8 == digit)
        .map(|m| m as f64)
        .min_by(|a, b| (a - value).abs().total_cmp(&(b - value).abs()))
        .unwrap_or(value)
}
