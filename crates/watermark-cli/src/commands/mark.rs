use std::path::PathBuf;

use clap::Args;
use log::info;

use super::{Appearance, MarkSource, PlacementArg};
use crate::CliResult;

/// Puts a visible text or image onto an image
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Background image, PNG or JPEG, used readonly
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub background: PathBuf,

    /// The marked image is stored as PNG file
    #[arg(short = 'o', long = "out", value_name = "output image file", required = true)]
    pub write_to_file: PathBuf,

    #[command(flatten)]
    pub source: MarkSource,

    #[command(flatten)]
    pub appearance: Appearance,

    /// Where the mark goes, by default the top left corner
    #[arg(short, long, value_enum)]
    pub placement: Option<PlacementArg>,

    /// Repeat the mark over the whole image
    #[arg(long)]
    pub tile: bool,
}

impl MarkArgs {
    pub fn run(self) -> CliResult<()> {
        let mark = self.appearance.apply(self.source.load()?);
        let watermark = watermark_core::commands::mark(
            &self.background,
            mark,
            self.tile,
            self.placement.map(Into::into),
            &self.write_to_file,
        )?;
        info!(
            "marked image written to {:?}, placement {:?}",
            self.write_to_file,
            watermark.placement()
        );

        Ok(())
    }
}
