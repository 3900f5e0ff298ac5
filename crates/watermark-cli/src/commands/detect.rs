use std::path::PathBuf;

use clap::Args;
use watermark_core::commands::save_image;
use watermark_core::Payload;

use super::AlgorithmArg;
use crate::CliResult;

/// Looks for an invisible watermark and prints or stores it
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Image that may contain a watermark
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub media: PathBuf,

    /// A found image watermark is stored here as PNG file
    #[arg(short = 'o', long = "out", value_name = "output image file")]
    pub write_to_file: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t)]
    pub algorithm: AlgorithmArg,
}

impl DetectArgs {
    pub fn run(self, max_image_size: u32) -> CliResult<()> {
        let options = self.algorithm.options(max_image_size);
        let found = watermark_core::commands::detect(&self.media, &options)?;
        println!("{}", self.report(&found)?);

        Ok(())
    }

    fn report(&self, found: &Payload) -> CliResult<String> {
        match found {
            Payload::Text(text) => Ok(text.clone()),
            Payload::Image(image) => {
                let (width, height) = image.dimensions();
                match &self.write_to_file {
                    Some(target) => {
                        save_image(image, target)?;
                        Ok(format!(
                            "{width}x{height} image watermark written to {}",
                            target.display()
                        ))
                    }
                    None => Ok(format!(
                        "{width}x{height} image watermark found, use --out to store it"
                    )),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::hide::HideArgs;
    use crate::commands::MarkSource;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn carrier(dir: &TempDir) -> PathBuf {
        let file = dir.path().join("carrier.png");
        RgbaImage::from_pixel(48, 48, Rgba([90, 120, 150, 255]))
            .save(&file)
            .unwrap();
        file
    }

    #[test]
    fn should_hide_and_detect_a_text() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("hidden.png");

        HideArgs {
            background: carrier(&dir),
            write_to_file: output.clone(),
            source: MarkSource {
                text: Some("cli secret".to_string()),
                image: None,
            },
            algorithm: AlgorithmArg::Dct,
        }
        .run(1024)
        .unwrap();

        let detect = DetectArgs {
            media: output.clone(),
            write_to_file: None,
            algorithm: AlgorithmArg::Dct,
        };
        let found =
            watermark_core::commands::detect(&output, &AlgorithmArg::Dct.options(1024)).unwrap();
        assert_eq!(detect.report(&found).unwrap(), "cli secret");
    }

    #[test]
    fn should_store_a_found_image() {
        let dir = TempDir::new().unwrap();
        let mark_file = dir.path().join("mark.png");
        let mark = RgbaImage::from_fn(3, 2, |x, y| Rgba([x as u8, y as u8, 9, 255]));
        mark.save(&mark_file).unwrap();
        let hidden = dir.path().join("hidden.png");
        let recovered = dir.path().join("recovered.png");

        HideArgs {
            background: carrier(&dir),
            write_to_file: hidden.clone(),
            source: MarkSource {
                text: None,
                image: Some(mark_file),
            },
            algorithm: AlgorithmArg::Lsb,
        }
        .run(1024)
        .unwrap();

        DetectArgs {
            media: hidden,
            write_to_file: Some(recovered.clone()),
            algorithm: AlgorithmArg::Lsb,
        }
        .run(1024)
        .unwrap();

        assert_eq!(image::open(&recovered).unwrap().to_rgba8(), mark);
    }

    #[test]
    fn should_refuse_images_above_the_limit() {
        let dir = TempDir::new().unwrap();
        let result = DetectArgs {
            media: carrier(&dir),
            write_to_file: None,
            algorithm: AlgorithmArg::Lsb,
        }
        .run(32);

        assert!(matches!(
            result,
            Err(watermark_core::WatermarkError::ImageTooLarge { .. })
        ));
    }
}
