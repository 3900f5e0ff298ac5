use image::RgbaImage;
use log::debug;

use super::pixels::{from_channels, to_channels};
use super::{ensure_within_size_limit, InvisibleCodec};
use crate::error::WatermarkError;
use crate::media::codec_options::LsbCodecOptions;
use crate::media::payload::{frame, unframe, Payload, LSB_MARKERS};
use crate::result::Result;

/// Hides a framed payload in the least significant bit of the color channels
#[derive(Debug, Default, Clone)]
pub struct LsbCodec {
    options: LsbCodecOptions,
}

impl LsbCodec {
    pub fn new(options: LsbCodecOptions) -> Self {
        Self { options }
    }

    /// writes one bit per channel, channels beyond the bits stay untouched
    pub fn hide(channels: &mut [u8], bits: &[u8]) -> Result<()> {
        if bits.len() > channels.len() {
            return Err(WatermarkError::CapacityExceeded {
                required: bits.len(),
                available: channels.len(),
            });
        }
        for (c, bit) in channels.iter_mut().zip(bits) {
            *c = (*c & (u8::MAX - 1)) | (bit & 1);
        }

        Ok(())
    }

    /// reads the least significant bit of at most `max_bits` channels
    pub fn unveil(channels: &[u8], max_bits: usize) -> Vec<u8> {
        channels.iter().take(max_bits).map(|c| c & 1).collect()
    }
}

impl InvisibleCodec for LsbCodec {
    fn embed(&self, carrier: &RgbaImage, payload: &Payload) -> Result<RgbaImage> {
        ensure_within_size_limit(carrier, self.options.max_image_size)?;
        let bits = frame(payload, &LSB_MARKERS)?;
        let mut channels = to_channels(carrier, self.options.skip_alpha_channel);
        debug!(
            "hiding {} bits in {} channels",
            bits.len(),
            channels.len()
        );
        Self::hide(&mut channels, &bits)?;

        from_channels(carrier, &channels, self.options.skip_alpha_channel)
    }

    fn detect(&self, carrier: &RgbaImage) -> Result<Payload> {
        ensure_within_size_limit(carrier, self.options.max_image_size)?;
        let channels = to_channels(carrier, self.options.skip_alpha_channel);
        let bits = Self::unveil(&channels, self.options.max_scan_bits);
        debug!("scanning {} bits for a frame", bits.len());

        unframe(&bits, &LSB_MARKERS)
    }

    fn capacity(&self, carrier: &RgbaImage) -> usize {
        super::pixels::channel_count(carrier, self.options.skip_alpha_channel)
    }
}
