mod dct_codec;
pub(crate) mod iterators;
mod lsb_codec;
pub mod pixels;
pub mod transform;

use enum_dispatch::enum_dispatch;
use image::RgbaImage;

use crate::error::WatermarkError;
use crate::media::codec_options::CodecOptions;
use crate::media::payload::Payload;
use crate::result::Result;

pub use dct_codec::DctCodec;
pub use lsb_codec::LsbCodec;

/// An algorithm that hides a payload inside the pixels of an image
#[enum_dispatch]
pub trait InvisibleCodec {
    /// returns a marked copy of `carrier`, the carrier itself stays untouched
    fn embed(&self, carrier: &RgbaImage, payload: &Payload) -> Result<RgbaImage>;

    /// looks for a payload, never modifies `carrier`
    fn detect(&self, carrier: &RgbaImage) -> Result<Payload>;

    /// number of symbols the carrier can hold, markers included
    fn capacity(&self, carrier: &RgbaImage) -> usize;
}

#[enum_dispatch(InvisibleCodec)]
#[derive(Debug, Clone)]
pub enum Codec {
    LsbCodec,
    DctCodec,
}

impl From<&CodecOptions> for Codec {
    fn from(options: &CodecOptions) -> Self {
        match options {
            CodecOptions::Lsb(o) => LsbCodec::new(o.clone()).into(),
            CodecOptions::Dct(o) => DctCodec::new(o.clone()).into(),
        }
    }
}

/// rejects images wider or taller than `max`
pub fn ensure_within_size_limit(image: &RgbaImage, max: u32) -> Result<()> {
    let (width, height) = image.dimensions();
    if width > max || height > max {
        return Err(WatermarkError::ImageTooLarge { width, height, max });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::codec_options::Algorithm;
    use crate::test_utils::prepare_solid_image;
    use image::Rgba;

    #[test]
    fn should_dispatch_to_the_configured_codec() {
        let carrier = prepare_solid_image(32, 32, Rgba([128, 128, 128, 255]));
        let payload = Payload::Text("both ways".into());

        for algorithm in [Algorithm::Lsb, Algorithm::Dct] {
            let codec = Codec::from(&CodecOptions::from(algorithm));
            let marked = codec.embed(&carrier, &payload).unwrap();

            assert_eq!(codec.detect(&marked).unwrap(), payload, "{algorithm:?}");
            assert_eq!(codec.capacity(&carrier), 32 * 32 * 3);
        }
    }

    #[test]
    fn should_accept_images_at_the_limit() {
        let image = prepare_solid_image(16, 16, Rgba([0, 0, 0, 255]));

        assert!(ensure_within_size_limit(&image, 16).is_ok());
        assert!(matches!(
            ensure_within_size_limit(&image, 15),
            Err(WatermarkError::ImageTooLarge { .. })
        ));
    }
}
