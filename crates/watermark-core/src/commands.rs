//! File based entry points, used by the command line tool.

use image::RgbaImage;
use log::{error, info};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::{Path, PathBuf};

use crate::api::{
    BulkReport, BulkWatermark, CancelToken, Watermark, WatermarkBuilder, WatermarkDetector,
};
use crate::error::WatermarkError;
use crate::media::payload::DetectionResult;
use crate::media::{CodecOptions, Persist};
use crate::result::Result;
use crate::visible::{Mark, PlacementOption};

const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Suffix of the file names `bulk` writes
pub const BULK_SUFFIX: &str = "-watermarked";

pub fn is_supported_image(file: &Path) -> bool {
    file.extension()
        .and_then(|e| e.to_str())
        .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// reads a PNG or JPEG file into RGBA pixels
pub fn load_image(file: &Path) -> Result<RgbaImage> {
    if !is_supported_image(file) {
        return Err(WatermarkError::UnsupportedMedia);
    }

    Ok(image::open(file)
        .map_err(|e| {
            error!("Error reading image {file:?}: {e}");
            WatermarkError::InvalidImageMedia
        })?
        .to_rgba8())
}

/// Writes `image` as PNG, whatever the extension of `file`. Invisible marks
/// would not survive a lossy format.
pub fn save_image(image: &RgbaImage, file: &Path) -> Result<()> {
    let f = File::create(file).map_err(|e| {
        error!("Error creating file {file:?}: {e}");
        WatermarkError::WriteError { source: e }
    })?;
    let mut writer = BufWriter::new(f);
    save_to_writer(image, &mut writer)?;

    writer
        .flush()
        .map_err(|source| WatermarkError::WriteError { source })
}

pub fn save_to_writer<W: Write + Seek>(image: &RgbaImage, mut writer: W) -> Result<()> {
    image
        .write_to(&mut writer, image::ImageFormat::Png)
        .map_err(|e| {
            error!("Error saving image: {e}");
            WatermarkError::ImageEncodingError
        })
}

/// composites a visible mark onto the image in `background` and writes the result to `output`
pub fn mark(
    background: &Path,
    mark: Mark,
    tile: bool,
    placement: Option<PlacementOption>,
    output: &Path,
) -> Result<Watermark> {
    let mut builder = WatermarkBuilder::create(load_image(background)?)
        .use_mark(Some(mark))
        .with_tile_mode(tile);
    if let Some(placement) = placement {
        builder = builder.with_placement(placement);
    }
    let watermark = builder.get_watermark()?;
    watermark.save_as(output)?;

    Ok(watermark)
}

pub fn hide(background: &Path, mark: Mark, options: &CodecOptions, output: &Path) -> Result<()> {
    let marked = WatermarkBuilder::create(load_image(background)?)
        .use_mark(Some(mark))
        .embed_invisible(options)?;

    save_image(&marked, output)
}

pub fn detect(image: &Path, options: &CodecOptions) -> Result<DetectionResult> {
    WatermarkDetector::create(load_image(image)?, options.clone()).detect_blocking()
}

/// where `bulk` writes the marked version of `background`
pub fn bulk_target(background: &Path, output_dir: &Path) -> PathBuf {
    output_dir.join(format!("{}{BULK_SUFFIX}.png", file_stem(background)))
}

/// One target per background. A stem that was already used gets the index of
/// the background appended, so no file overwrites another.
pub fn bulk_targets(backgrounds: &[PathBuf], output_dir: &Path) -> Vec<PathBuf> {
    let mut used = HashSet::new();

    backgrounds
        .iter()
        .enumerate()
        .map(|(index, background)| {
            let mut target = bulk_target(background, output_dir);
            if !used.insert(target.clone()) {
                let stem = file_stem(background);
                target = output_dir.join(format!("{stem}{BULK_SUFFIX}-{index}.png"));
                used.insert(target.clone());
            }
            target
        })
        .collect()
}

fn file_stem(file: &Path) -> String {
    file.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string())
}

/// Marks every image of `backgrounds` and saves it to `output_dir`, files
/// are loaded one at a time.
pub fn bulk(
    backgrounds: &[PathBuf],
    output_dir: &Path,
    bulk: &BulkWatermark,
    cancel: &CancelToken,
) -> BulkReport {
    let targets = bulk_targets(backgrounds, output_dir);
    let report = bulk.run(
        backgrounds.iter().map(|f| load_image(f)),
        cancel,
        |index, marked| save_image(&marked, &targets[index]),
    );
    info!(
        "{} of {} images written to {output_dir:?}",
        report.success_count, report.total_count
    );

    report
}
