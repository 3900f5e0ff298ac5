pub mod codec_options;
pub mod image;
pub mod payload;

use std::path::Path;

pub use codec_options::{Algorithm, CodecOptions, DctCodecOptions, LsbCodecOptions};

pub trait Persist {
    fn save_as(&self, _: &Path) -> crate::Result<()>;
}
