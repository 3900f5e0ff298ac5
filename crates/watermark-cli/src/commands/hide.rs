use std::path::PathBuf;

use clap::Args;

use super::{AlgorithmArg, MarkSource};
use crate::CliResult;

/// Hides a text or an image invisibly in an image
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Carrier image, PNG or JPEG, used readonly
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub background: PathBuf,

    /// Final image will be stored as PNG file
    #[arg(short = 'o', long = "out", value_name = "output image file", required = true)]
    pub write_to_file: PathBuf,

    #[command(flatten)]
    pub source: MarkSource,

    #[arg(short, long, value_enum, default_value_t)]
    pub algorithm: AlgorithmArg,
}

impl HideArgs {
    pub fn run(self, max_image_size: u32) -> CliResult<()> {
        watermark_core::commands::hide(
            &self.background,
            self.source.load()?,
            &self.algorithm.options(max_image_size),
            &self.write_to_file,
        )
    }
}
