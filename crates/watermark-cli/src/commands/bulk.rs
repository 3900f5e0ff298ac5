use std::path::PathBuf;

use clap::Args;
use log::info;
use watermark_core::api::{BulkWatermark, CancelToken};
use watermark_core::error::WatermarkError;

use super::{Appearance, MarkSource, PlacementArg};
use crate::CliResult;

/// Puts the same visible mark onto many images
#[derive(Args, Debug)]
pub struct BulkArgs {
    /// Background images, PNG or JPEG, used readonly
    #[arg(short = 'i', long = "in", value_name = "image files", required = true, num_args = 1..)]
    pub backgrounds: Vec<PathBuf>,

    /// Folder the marked images are written to
    #[arg(short = 'o', long = "out", value_name = "output folder", required = true)]
    pub output_folder: PathBuf,

    #[command(flatten)]
    pub source: MarkSource,

    #[command(flatten)]
    pub appearance: Appearance,

    /// Where the mark goes, resolved per image
    #[arg(short, long, value_enum, default_value = "center")]
    pub placement: PlacementArg,

    /// Repeat the mark over the whole image
    #[arg(long)]
    pub tile: bool,
}

impl BulkArgs {
    pub fn run(self) -> CliResult<()> {
        if !self.output_folder.is_dir() {
            return Err(WatermarkError::InputInvalid("the output folder does not exist"));
        }
        let mark = self.appearance.apply(self.source.load()?);
        let bulk = BulkWatermark::new(mark, self.tile, self.placement.into());

        let report = watermark_core::commands::bulk(
            &self.backgrounds,
            &self.output_folder,
            &bulk,
            &CancelToken::new(),
        );
        info!("{report:?}");
        println!(
            "{} of {} images marked",
            report.success_count, report.total_count
        );

        Ok(())
    }
}
