use image::RgbaImage;
use log::debug;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;

use super::worker::{dispatch, RequestHandle, WatermarkListener, WorkerPool};
use crate::commands::save_image;
use crate::error::WatermarkError;
use crate::media::image::{Codec, InvisibleCodec};
use crate::media::payload::Payload;
use crate::media::{CodecOptions, Persist};
use crate::result::Result;
use crate::visible::placement::{resolve_with_rng, Placement, PlacementOption};
use crate::visible::text::render_text;
use crate::visible::{render, ImageMark, Mark, TextMark};

/// A rendered visible watermark
#[derive(Debug, Clone, PartialEq)]
pub struct Watermark {
    output: RgbaImage,
    placement: Placement,
}

impl Watermark {
    pub fn output_image(&self) -> &RgbaImage {
        &self.output
    }

    pub fn into_output_image(self) -> RgbaImage {
        self.output
    }

    /// where the mark ended up
    pub fn placement(&self) -> Placement {
        self.placement
    }
}

impl Persist for Watermark {
    fn save_as(&self, target: &Path) -> Result<()> {
        save_image(&self.output, target)
    }
}

/// Puts one mark onto, or into, one background.
///
/// Visible watermarks render right away with [`get_watermark`](Self::get_watermark),
/// invisible ones run on a worker with [`build_invisible`](Self::build_invisible).
#[derive(Debug, Clone, Default)]
pub struct WatermarkBuilder {
    background: Option<RgbaImage>,
    mark: Option<Mark>,
    tile: bool,
    placement: Option<PlacementOption>,
    pool: Option<Arc<WorkerPool>>,
}

impl WatermarkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(background: RgbaImage) -> Self {
        Self::new().use_background(Some(background))
    }

    pub fn use_background(mut self, background: Option<RgbaImage>) -> Self {
        self.background = background;
        self
    }

    pub fn load_text_mark(self, mark: TextMark) -> Self {
        self.use_mark(Some(mark.into()))
    }

    pub fn load_image_mark(self, mark: ImageMark) -> Self {
        self.use_mark(Some(mark.into()))
    }

    pub fn use_mark(mut self, mark: Option<Mark>) -> Self {
        self.mark = mark;
        self
    }

    pub fn with_tile_mode(mut self, tile: bool) -> Self {
        self.tile = tile;
        self
    }

    /// Overrides the position and origin of the mark, resolved when rendering.
    pub fn with_placement(mut self, placement: PlacementOption) -> Self {
        self.placement = Some(placement);
        self
    }

    pub fn with_worker_pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// renders the visible watermark on the calling thread
    pub fn get_watermark(&self) -> Result<Watermark> {
        self.get_watermark_with_rng(&mut rand::thread_rng())
    }

    /// like [`get_watermark`](Self::get_watermark), random placements draw from `rng`
    pub fn get_watermark_with_rng<R: Rng>(&self, rng: &mut R) -> Result<Watermark> {
        let background = self.background()?;
        let mut mark = self.mark()?.clone();
        if let Some(option) = self.placement {
            mark.place(resolve_for_mark(option, background, &mark, rng));
        }
        let placement = Placement::new(mark.position(), mark.origin());
        debug!("rendering a visible mark, tile mode {}", self.tile);

        Ok(Watermark {
            output: render(background, &mark, self.tile),
            placement,
        })
    }

    /// Hides the mark in the background on a worker.
    ///
    /// A text mark hides its text, an image mark its bitmap. The outcome is
    /// reported to `listener` and through the returned handle.
    pub fn build_invisible<L>(
        self,
        options: impl Into<CodecOptions>,
        listener: L,
    ) -> RequestHandle<RgbaImage>
    where
        L: WatermarkListener<RgbaImage>,
    {
        let options = options.into();
        let pool = self.pool.clone();

        dispatch(pool.as_ref(), move || self.embed_invisible(&options), listener)
    }

    /// the blocking counterpart of [`build_invisible`](Self::build_invisible)
    pub fn embed_invisible(&self, options: &CodecOptions) -> Result<RgbaImage> {
        let background = self.background()?;
        let payload = match self.mark()? {
            Mark::Text(text) => Payload::Text(text.text.clone()),
            Mark::Image(image) => Payload::Image(image.image.clone()),
        };
        debug!("hiding a mark with {:?}", options.algorithm());

        Codec::from(options).embed(background, &payload)
    }

    fn background(&self) -> Result<&RgbaImage> {
        match &self.background {
            None => Err(WatermarkError::InputInvalid("no background image")),
            Some(b) if b.width() == 0 || b.height() == 0 => {
                Err(WatermarkError::InputInvalid("the background image is empty"))
            }
            Some(b) => Ok(b),
        }
    }

    fn mark(&self) -> Result<&Mark> {
        match &self.mark {
            None => Err(WatermarkError::InputInvalid("no watermark loaded")),
            Some(Mark::Text(t)) if t.text.is_empty() => {
                Err(WatermarkError::InputInvalid("the watermark text is empty"))
            }
            Some(Mark::Image(i)) if i.image.width() == 0 || i.image.height() == 0 => {
                Err(WatermarkError::InputInvalid("the watermark image is empty"))
            }
            Some(m) => Ok(m),
        }
    }
}

/// Resolves a placement option for a mark. Text marks are measured by their
/// unrotated raster.
pub(crate) fn resolve_for_mark<R: Rng>(
    option: PlacementOption,
    background: &RgbaImage,
    mark: &Mark,
    rng: &mut R,
) -> Placement {
    match mark {
        Mark::Image(image) => {
            resolve_with_rng(option, Some(background), Some(&image.image), image.size, rng)
        }
        Mark::Text(text) => {
            let raster = render_text(text);
            let ratio = raster.width() as f64 / background.width().max(1) as f64;
            resolve_with_rng(option, Some(background), Some(&raster), ratio, rng)
        }
    }
}
