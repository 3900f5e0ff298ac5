/// Largest width or height the invisible codecs accept
pub const DEFAULT_MAX_IMAGE_SIZE: u32 = 1024;

/// Upper bound of LSB bits read during detection
pub const DEFAULT_MAX_SCAN_BITS: usize = 8 * 1024 * 1024;

/// Verification passes the DCT encoder runs to fix digits lost to clamping
pub const DEFAULT_REPAIR_PASSES: usize = 4;

/// Codec configuration for invisible watermarks
///
/// The codec choice determines where the payload lives:
/// - `Lsb` → least significant bit of the color channels
/// - `Dct` → rounded DCT coefficients of the color channels, modulo 10
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecOptions {
    Lsb(LsbCodecOptions),
    Dct(DctCodecOptions),
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self::Lsb(LsbCodecOptions::default())
    }
}

impl CodecOptions {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            CodecOptions::Lsb(_) => Algorithm::Lsb,
            CodecOptions::Dct(_) => Algorithm::Dct,
        }
    }

    pub fn max_image_size(&self) -> u32 {
        match self {
            CodecOptions::Lsb(o) => o.max_image_size,
            CodecOptions::Dct(o) => o.max_image_size,
        }
    }
}

/// Invisible watermark algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Algorithm {
    #[default]
    Lsb,
    Dct,
}

impl From<Algorithm> for CodecOptions {
    fn from(value: Algorithm) -> Self {
        match value {
            Algorithm::Lsb => CodecOptions::Lsb(LsbCodecOptions::default()),
            Algorithm::Dct => CodecOptions::Dct(DctCodecOptions::default()),
        }
    }
}

/// Options for LSB (Least Significant Bit) image encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsbCodecOptions {
    /// If true no alpha channel would be used for encoding,
    /// this reduces then the capacity by one bit per pixel
    pub skip_alpha_channel: bool,

    /// Detection never reads more bits than this, regardless of the image size
    pub max_scan_bits: usize,

    /// Images wider or taller than this are rejected
    pub max_image_size: u32,
}

impl Default for LsbCodecOptions {
    fn default() -> Self {
        Self {
            skip_alpha_channel: true,
            max_scan_bits: DEFAULT_MAX_SCAN_BITS,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
        }
    }
}

/// Options for DCT coefficient encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DctCodecOptions {
    /// Images wider or taller than this are rejected before any transform work
    pub max_image_size: u32,

    /// How often the encoder re-reads and fixes digits after clamping
    pub repair_passes: usize,
}

impl Default for DctCodecOptions {
    fn default() -> Self {
        Self {
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            repair_passes: DEFAULT_REPAIR_PASSES,
        }
    }
}

impl DctCodecOptions {
    pub fn with_max_image_size(mut self, max_image_size: u32) -> Self {
        self.max_image_size = max_image_size;
        self
    }
}
