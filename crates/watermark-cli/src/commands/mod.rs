use std::path::PathBuf;

use clap::{Args, ValueEnum};
use image::Rgb;
use watermark_core::commands::load_image;
use watermark_core::media::{Algorithm, CodecOptions, DctCodecOptions, LsbCodecOptions};
use watermark_core::visible::{ImageMark, Mark, PlacementOption, TextMark};

use crate::CliResult;

pub mod bulk;
pub mod detect;
pub mod hide;
pub mod mark;

/// What the watermark consists of, a text or an image
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct MarkSource {
    /// Text used as watermark
    #[arg(short, long, value_name = "text")]
    pub text: Option<String>,

    /// Image file used as watermark
    #[arg(long = "mark-image", value_name = "image file")]
    pub image: Option<PathBuf>,
}

impl MarkSource {
    /// the mark with default appearance, as hidden by the invisible codecs
    pub fn load(&self) -> CliResult<Mark> {
        match (&self.text, &self.image) {
            (Some(text), _) => Ok(TextMark::new(text.as_str()).into()),
            (None, Some(image)) => Ok(ImageMark::new(load_image(image)?).into()),
            (None, None) => Err(watermark_core::WatermarkError::InputInvalid(
                "either a text or an image mark is required",
            )),
        }
    }
}

/// How a visible mark looks
#[derive(Args, Debug, Clone)]
pub struct Appearance {
    /// Opacity of the mark, 0 is invisible and 255 fully opaque
    #[arg(long, default_value_t = 50)]
    pub alpha: u8,

    /// Clockwise rotation in degrees
    #[arg(long, default_value_t = 0.0)]
    pub rotation: f64,

    /// Font size of a text mark in pixels
    #[arg(long = "font-size", default_value_t = 20.0)]
    pub font_size: f32,

    /// Text color as `#rrggbb`
    #[arg(long, value_parser = parse_color, default_value = "#000000")]
    pub color: Rgb<u8>,

    /// Width of an image mark relative to the background width
    #[arg(long, default_value_t = 0.2)]
    pub scale: f64,
}

impl Appearance {
    pub fn apply(&self, mark: Mark) -> Mark {
        match mark {
            Mark::Text(text) => text
                .with_alpha(self.alpha)
                .with_rotation(self.rotation)
                .with_size(self.font_size)
                .with_color(self.color)
                .into(),
            Mark::Image(image) => image
                .with_alpha(self.alpha)
                .with_rotation(self.rotation)
                .with_size(self.scale)
                .into(),
        }
    }
}

fn parse_color(value: &str) -> Result<Rgb<u8>, String> {
    let hex = value.strip_prefix('#').unwrap_or(value);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("`{value}` is not a color like #ff8800"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map_err(|_| format!("`{value}` is not a color like #ff8800"))
    };

    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementArg {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    Random,
    Smart,
}

impl From<PlacementArg> for PlacementOption {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::TopLeft => PlacementOption::TopLeft,
            PlacementArg::TopCenter => PlacementOption::TopCenter,
            PlacementArg::TopRight => PlacementOption::TopRight,
            PlacementArg::CenterLeft => PlacementOption::CenterLeft,
            PlacementArg::Center => PlacementOption::Center,
            PlacementArg::CenterRight => PlacementOption::CenterRight,
            PlacementArg::BottomLeft => PlacementOption::BottomLeft,
            PlacementArg::BottomCenter => PlacementOption::BottomCenter,
            PlacementArg::BottomRight => PlacementOption::BottomRight,
            PlacementArg::Random => PlacementOption::Random,
            PlacementArg::Smart => PlacementOption::Smart,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmArg {
    /// least significant bits of the color channels
    #[default]
    Lsb,
    /// digits of the rounded DCT coefficients
    Dct,
}

impl AlgorithmArg {
    pub fn options(self, max_image_size: u32) -> CodecOptions {
        match Algorithm::from(self) {
            Algorithm::Lsb => CodecOptions::Lsb(LsbCodecOptions {
                max_image_size,
                ..Default::default()
            }),
            Algorithm::Dct => {
                CodecOptions::Dct(DctCodecOptions::default().with_max_image_size(max_image_size))
            }
        }
    }
}

impl From<AlgorithmArg> for Algorithm {
    fn from(value: AlgorithmArg) -> Self {
        match value {
            AlgorithmArg::Lsb => Algorithm::Lsb,
            AlgorithmArg::Dct => Algorithm::Dct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_hex_colors() {
        assert_eq!(parse_color("#ff8800"), Ok(Rgb([255, 136, 0])));
        assert_eq!(parse_color("0a0B0c"), Ok(Rgb([10, 11, 12])));
        assert!(parse_color("#ff88").is_err());
        assert!(parse_color("#gg0000").is_err());
        assert!(parse_color("#ää00").is_err());
    }

    #[test]
    fn should_carry_the_size_limit_into_the_options() {
        assert_eq!(AlgorithmArg::Lsb.options(64).max_image_size(), 64);
        assert_eq!(AlgorithmArg::Dct.options(32).max_image_size(), 32);
        assert_eq!(AlgorithmArg::Dct.options(32).algorithm(), Algorithm::Dct);
    }

    #[test]
    fn should_apply_the_appearance() {
        let appearance = Appearance {
            alpha: 120,
            rotation: 45.0,
            font_size: 16.0,
            color: Rgb([1, 2, 3]),
            scale: 0.5,
        };

        let Mark::Text(text) = appearance.apply(TextMark::new("x").into()) else {
            panic!("a text mark was expected");
        };
        assert_eq!((text.alpha, text.size, text.color), (120, 16.0, Rgb([1, 2, 3])));
        assert_eq!(text.rotation, 45.0);
    }
}
