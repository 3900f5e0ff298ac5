//! Visible watermarks: marks, where they go and how they are drawn.

pub mod compositor;
pub mod mark;
pub mod placement;
pub mod text;

pub use compositor::render;
pub use mark::{ImageMark, Mark, NormalizedPoint, Shadow, TextMark};
pub use placement::{resolve, resolve_with_rng, Placement, PlacementOption};
