//! # Watermark Core API
//!
//! Two kinds of watermarks are supported:
//! - visible marks, a text or an image composited onto a background via
//!   [`WatermarkBuilder::get_watermark`][build]
//! - invisible marks, a text or an image hidden in the pixel values with the
//!   LSB or the DCT codec via [`WatermarkBuilder::build_invisible`][build] and
//!   recovered again by [`WatermarkDetector`][detect]
//!
//! # Usage Examples
//!
//! ## Put a visible text onto an image
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use watermark_core::api::WatermarkBuilder;
//! use watermark_core::visible::{PlacementOption, TextMark};
//!
//! let background = RgbaImage::from_pixel(320, 200, Rgba([200, 200, 200, 255]));
//!
//! let watermark = WatermarkBuilder::create(background)
//!     .load_text_mark(TextMark::new("Hello, World!").with_size(24.0).with_alpha(200))
//!     .with_placement(PlacementOption::BottomRight)
//!     .get_watermark()
//!     .expect("Failed to render the watermark");
//!
//! assert_eq!(watermark.output_image().dimensions(), (320, 200));
//! ```
//!
//! ## Hide a text and find it again
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use watermark_core::api::{WatermarkBuilder, WatermarkDetector};
//! use watermark_core::media::Algorithm;
//! use watermark_core::visible::TextMark;
//!
//! let background = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 0, 255]));
//!
//! let marked = WatermarkBuilder::create(background)
//!     .load_text_mark(TextMark::new("hello"))
//!     .build_invisible(Algorithm::Lsb, ())
//!     .wait()
//!     .expect("Failed to hide the text");
//!
//! let found = WatermarkDetector::create(marked, Algorithm::Lsb)
//!     .detect_blocking()
//!     .expect("Failed to detect the text");
//!
//! assert_eq!(found.text(), Some("hello"));
//! ```
//!
//! [build]: ./api/struct.WatermarkBuilder.html
//! [detect]: ./api/struct.WatermarkDetector.html

#![warn(clippy::redundant_else)]

pub mod api;
pub mod commands;
pub mod error;
pub mod media;
pub mod result;
pub mod visible;

pub use crate::api::{
    BulkReport, BulkWatermark, CancelToken, Watermark, WatermarkBuilder, WatermarkDetector,
    WatermarkListener,
};
pub use crate::error::WatermarkError;
pub use crate::media::image::{Codec, InvisibleCodec};
pub use crate::media::payload::{DetectionResult, Payload};
pub use crate::media::{Algorithm, CodecOptions, Persist};
pub use crate::result::Result;
