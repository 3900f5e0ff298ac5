use clap::{Parser, Subcommand};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    /// Largest width or height the invisible codecs accept
    #[arg(long = "max-image-size", value_name = "pixels", global = true)]
    pub max_image_size: Option<u32>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Mark(mark::MarkArgs),
    Hide(hide::HideArgs),
    Detect(detect::DetectArgs),
    Bulk(bulk::BulkArgs),
}
