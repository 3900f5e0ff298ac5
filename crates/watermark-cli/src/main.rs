use clap::Parser;
use cli::{CliArgs, Commands};
use watermark_core::media::codec_options::DEFAULT_MAX_IMAGE_SIZE;

mod cli;
mod commands;

pub type CliResult<T> = watermark_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    let max_image_size = args.max_image_size.unwrap_or(DEFAULT_MAX_IMAGE_SIZE);

    match args.command {
        Commands::Mark(mark) => mark.run(),
        Commands::Hide(hide) => hide.run(max_image_size),
        Commands::Detect(detect) => detect.run(max_image_size),
        Commands::Bulk(bulk) => bulk.run(),
    }
}
