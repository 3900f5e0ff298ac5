use image::{Rgb, RgbaImage};

use super::placement::Placement;

/// A point in the unit square, either on the background (position) or on
/// the mark itself (origin)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedPoint {
    x: f64,
    y: f64,
}

impl NormalizedPoint {
    pub const CENTER: Self = Self { x: 0.5, y: 0.5 };
    pub const TOP_LEFT: Self = Self { x: 0.0, y: 0.0 };

    /// components are clamped to `[0, 1]`, `NaN` becomes `0`
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: unit(x),
            y: unit(y),
        }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl Default for NormalizedPoint {
    fn default() -> Self {
        Self::TOP_LEFT
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// A blurred copy of the text drawn below it
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    /// gaussian blur sigma in pixels, `0` keeps the shadow sharp
    pub blur_radius: f32,
    pub dx: i32,
    pub dy: i32,
    pub color: Rgb<u8>,
}

impl Shadow {
    pub fn new(blur_radius: f32, dx: i32, dy: i32, color: Rgb<u8>) -> Self {
        Self {
            blur_radius,
            dx,
            dy,
            color,
        }
    }
}

pub const DEFAULT_TEXT_SIZE: f32 = 20.0;
pub const DEFAULT_ALPHA: u8 = 50;
pub const DEFAULT_IMAGE_SIZE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct TextMark {
    pub text: String,
    /// glyph height in pixels
    pub size: f32,
    pub alpha: u8,
    pub color: Rgb<u8>,
    pub shadow: Option<Shadow>,
    pub position: NormalizedPoint,
    pub origin: NormalizedPoint,
    /// degrees, clockwise
    pub rotation: f64,
}

impl TextMark {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            size: DEFAULT_TEXT_SIZE,
            alpha: DEFAULT_ALPHA,
            color: Rgb([0, 0, 0]),
            shadow: None,
            position: NormalizedPoint::default(),
            origin: NormalizedPoint::default(),
            rotation: 0.0,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_color(mut self, color: Rgb<u8>) -> Self {
        self.color = color;
        self
    }

    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn with_position(mut self, position: NormalizedPoint) -> Self {
        self.position = position;
        self
    }

    pub fn with_origin(mut self, origin: NormalizedPoint) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageMark {
    pub image: RgbaImage,
    pub alpha: u8,
    /// degrees, clockwise
    pub rotation: f64,
    /// rendered width relative to the background width
    pub size: f64,
    pub position: NormalizedPoint,
    pub origin: NormalizedPoint,
}

impl ImageMark {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            alpha: DEFAULT_ALPHA,
            rotation: 0.0,
            size: DEFAULT_IMAGE_SIZE,
            position: NormalizedPoint::default(),
            origin: NormalizedPoint::default(),
        }
    }

    /// a mostly opaque, slightly tilted, small mark
    pub fn preset(image: RgbaImage) -> Self {
        Self::new(image)
            .with_alpha(80)
            .with_rotation(15.0)
            .with_size(0.1)
    }

    pub fn with_alpha(mut self, alpha: u8) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_position(mut self, position: NormalizedPoint) -> Self {
        self.position = position;
        self
    }

    pub fn with_origin(mut self, origin: NormalizedPoint) -> Self {
        self.origin = origin;
        self
    }
}

/// What gets drawn onto, or hidden in, a background
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Text(TextMark),
    Image(ImageMark),
}

impl Mark {
    pub fn position(&self) -> NormalizedPoint {
        match self {
            Mark::Text(t) => t.position,
            Mark::Image(i) => i.position,
        }
    }

    pub fn origin(&self) -> NormalizedPoint {
        match self {
            Mark::Text(t) => t.origin,
            Mark::Image(i) => i.origin,
        }
    }

    pub fn place(&mut self, placement: Placement) {
        match self {
            Mark::Text(t) => {
                t.position = placement.position;
                t.origin = placement.origin;
            }
            Mark::Image(i) => {
                i.position = placement.position;
                i.origin = placement.origin;
            }
        }
    }
}

impl From<TextMark> for Mark {
    fn from(value: TextMark) -> Self {
        Mark::Text(value)
    }
}

impl From<ImageMark> for Mark {
    fn from(value: ImageMark) -> Self {
        Mark::Image(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_clamp_points_into_the_unit_square() {
        let p = NormalizedPoint::new(-0.3, 1.7);
        assert_eq!((p.x(), p.y()), (0.0, 1.0));

        let p = NormalizedPoint::new(f64::NAN, 0.25);
        assert_eq!((p.x(), p.y()), (0.0, 0.25));
    }

    #[test]
    fn should_use_the_documented_defaults() {
        let text = TextMark::new("hi");
        assert_eq!(text.size, 20.0);
        assert_eq!(text.alpha, 50);
        assert_eq!(text.color, Rgb([0, 0, 0]));
        assert_eq!(text.position, NormalizedPoint::TOP_LEFT);
        assert!(text.shadow.is_none());

        let image = ImageMark::new(RgbaImage::new(2, 2));
        assert_eq!(image.alpha, 50);
        assert_eq!(image.size, 0.2);
        assert_eq!(image.rotation, 0.0);

        let preset = ImageMark::preset(RgbaImage::new(2, 2));
        assert_eq!((preset.alpha, preset.rotation, preset.size), (80, 15.0, 0.1));
    }

    #[test]
    fn should_move_a_mark_to_a_placement() {
        let mut mark = Mark::from(TextMark::new("hi"));
        mark.place(Placement::new(
            NormalizedPoint::new(1.0, 0.5),
            NormalizedPoint::CENTER,
        ));

        assert_eq!(mark.position(), NormalizedPoint::new(1.0, 0.5));
        assert_eq!(mark.origin(), NormalizedPoint::CENTER);
    }
}
