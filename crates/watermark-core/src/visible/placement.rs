//! Decides where on a background a mark goes.
//!
//! A placement is a pair of normalized points: `position` on the background
//! and `origin` on the mark, the mark is drawn so that both points coincide.

use image::RgbaImage;
use log::debug;
use rand::Rng;

use super::mark::NormalizedPoint;

/// width and height ratio used when the mark dimensions are unknown
pub const FALLBACK_MARK_RATIO: f64 = 0.2;

/// number of samples per axis the smart placement takes
const SAMPLES_PER_AXIS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: NormalizedPoint,
    pub origin: NormalizedPoint,
}

impl Placement {
    pub fn new(position: NormalizedPoint, origin: NormalizedPoint) -> Self {
        Self { position, origin }
    }

    pub fn center() -> Self {
        Self::new(NormalizedPoint::CENTER, NormalizedPoint::CENTER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementOption {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
    /// somewhere the whole mark still fits onto the background
    Random,
    /// the flattest of the nine anchors
    Smart,
}

impl PlacementOption {
    /// the fixed anchors in the order smart placement evaluates them
    pub const ANCHORS: [PlacementOption; 9] = [
        PlacementOption::TopLeft,
        PlacementOption::TopCenter,
        PlacementOption::TopRight,
        PlacementOption::CenterLeft,
        PlacementOption::Center,
        PlacementOption::CenterRight,
        PlacementOption::BottomLeft,
        PlacementOption::BottomCenter,
        PlacementOption::BottomRight,
    ];

    /// position and origin of a fixed anchor, they are always the same point
    pub fn anchor(&self) -> Option<Placement> {
        let (x, y) = match self {
            PlacementOption::TopLeft => (0.0, 0.0),
            PlacementOption::TopCenter => (0.5, 0.0),
            PlacementOption::TopRight => (1.0, 0.0),
            PlacementOption::CenterLeft => (0.0, 0.5),
            PlacementOption::Center => (0.5, 0.5),
            PlacementOption::CenterRight => (1.0, 0.5),
            PlacementOption::BottomLeft => (0.0, 1.0),
            PlacementOption::BottomCenter => (0.5, 1.0),
            PlacementOption::BottomRight => (1.0, 1.0),
            PlacementOption::Random | PlacementOption::Smart => return None,
        };
        let point = NormalizedPoint::new(x, y);

        Some(Placement::new(point, point))
    }
}

/// Resolves `option` for a mark that is rendered `size_ratio` times the
/// background width wide.
pub fn resolve(
    option: PlacementOption,
    background: Option<&RgbaImage>,
    mark: Option<&RgbaImage>,
    size_ratio: f64,
) -> Placement {
    resolve_with_rng(option, background, mark, size_ratio, &mut rand::thread_rng())
}

/// like [`resolve`], random placements draw from `rng`
pub fn resolve_with_rng<R: Rng>(
    option: PlacementOption,
    background: Option<&RgbaImage>,
    mark: Option<&RgbaImage>,
    size_ratio: f64,
    rng: &mut R,
) -> Placement {
    if let Some(placement) = option.anchor() {
        return placement;
    }
    let (Some(background), Some(mark)) = (background, mark) else {
        return Placement::center();
    };
    let placement = match option {
        PlacementOption::Random => random_placement(background, mark, size_ratio, rng),
        _ => smart_placement(background, mark, size_ratio),
    };
    debug!("{option:?} placement resolved to {placement:?}");

    placement
}

/// Width and height of the rendered mark relative to the background.
///
/// Unusable input gives `FALLBACK_MARK_RATIO` for both.
pub fn mark_dimensions(background: &RgbaImage, mark: &RgbaImage, size_ratio: f64) -> (f64, f64) {
    if size_ratio <= 0.0 || size_ratio.is_nan() || mark.width() == 0 || background.height() == 0
    {
        return (FALLBACK_MARK_RATIO, FALLBACK_MARK_RATIO);
    }
    let scale = background.width() as f64 * size_ratio / mark.width() as f64;
    let height = mark.height() as f64 * scale;

    (size_ratio, height / background.height() as f64)
}

fn random_placement<R: Rng>(
    background: &RgbaImage,
    mark: &RgbaImage,
    size_ratio: f64,
    rng: &mut R,
) -> Placement {
    let (width_ratio, height_ratio) = mark_dimensions(background, mark, size_ratio);
    let x = random_coordinate(width_ratio, rng);
    let y = random_coordinate(height_ratio, rng);

    Placement::new(NormalizedPoint::new(x, y), NormalizedPoint::CENTER)
}

/// a centered mark with `ratio` stays inside when its center is in `[margin, 1 - margin]`
fn random_coordinate<R: Rng>(ratio: f64, rng: &mut R) -> f64 {
    let margin = (ratio / 2.0).clamp(0.0, 0.5);
    let range = (1.0 - 2.0 * margin).max(0.0);
    if range > 0.0 {
        margin + rng.gen::<f64>() * range
    } else {
        0.5
    }
}

fn smart_placement(background: &RgbaImage, mark: &RgbaImage, size_ratio: f64) -> Placement {
    let (width_ratio, height_ratio) = mark_dimensions(background, mark, size_ratio);
    let (bg_width, bg_height) = background.dimensions();
    let mark_width = (round_half_up(bg_width as f64 * width_ratio) as u32).max(1);
    let mark_height = (round_half_up(bg_height as f64 * height_ratio) as u32).max(1);

    let mut best: Option<(Placement, f64)> = None;
    for option in PlacementOption::ANCHORS {
        let Some(candidate) = option.anchor() else {
            continue;
        };
        let region = Region::of(&candidate, bg_width, bg_height, mark_width, mark_height);
        let score = region_score(background, &region);
        debug!("{option:?} covers {region:?} and scores {score}");
        if score.is_finite() && best.map_or(true, |(_, s)| score < s) {
            best = Some((candidate, score));
        }
    }

    best.map_or_else(Placement::center, |(placement, _)| placement)
}

/// half-open pixel rectangle on the background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Region {
    /// the area a mark of the given size covers at `placement`, moved inside the background
    pub fn of(
        placement: &Placement,
        bg_width: u32,
        bg_height: u32,
        mark_width: u32,
        mark_height: u32,
    ) -> Self {
        let left = placed_start(
            placement.position.x(),
            placement.origin.x(),
            bg_width,
            mark_width,
        );
        let top = placed_start(
            placement.position.y(),
            placement.origin.y(),
            bg_height,
            mark_height,
        );

        Self {
            left,
            top,
            right: bg_width.min(left.saturating_add(mark_width)),
            bottom: bg_height.min(top.saturating_add(mark_height)),
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }
}

pub(crate) fn placed_start(position: f64, origin: f64, bg_len: u32, mark_len: u32) -> u32 {
    let start = round_half_up(position * bg_len as f64 - origin * mark_len as f64);
    let max = bg_len.saturating_sub(mark_len);

    start.clamp(0.0, max as f64) as u32
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Luma variance plus the mean absolute difference to the left and upper
/// sample, over a grid of about 10x10 samples. Flat regions score low.
///
/// An empty region scores infinity, so it never wins.
pub fn region_score(image: &RgbaImage, region: &Region) -> f64 {
    let (width, height) = (region.width(), region.height());
    if width == 0 || height == 0 {
        return f64::INFINITY;
    }
    let step_x = (width / SAMPLES_PER_AXIS).max(1);
    let step_y = (height / SAMPLES_PER_AXIS).max(1);
    let columns = width.div_ceil(step_x) as usize;

    let mut previous_row = vec![0i32; columns];
    let mut sum = 0.0;
    let mut sum_squares = 0.0;
    let mut gradient = 0.0;
    let mut count = 0usize;

    for (row, y) in (region.top..region.bottom).step_by(step_y as usize).enumerate() {
        let mut previous: Option<i32> = None;
        for (column, x) in (region.left..region.right).step_by(step_x as usize).enumerate() {
            let gray = luma(image.get_pixel(x, y).0);
            sum += gray as f64;
            sum_squares += (gray as f64) * (gray as f64);
            if let Some(previous) = previous {
                gradient += (gray - previous).abs() as f64;
            }
            if row > 0 {
                gradient += (gray - previous_row[column]).abs() as f64;
            }
            previous_row[column] = gray;
            previous = Some(gray);
            count += 1;
        }
    }
    if count == 0 {
        return f64::INFINITY;
    }
    let count = count as f64;
    let mean = sum / count;
    let variance = sum_squares / count - mean * mean;

    variance + gradient / count
}

/// perceptual luma, truncated
fn luma([r, g, b, _]: [u8; 4]) -> i32 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) as i32
}
