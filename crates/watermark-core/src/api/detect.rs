use image::RgbaImage;
use log::debug;
use std::sync::Arc;

use super::worker::{dispatch, RequestHandle, WatermarkListener, WorkerPool};
use crate::error::WatermarkError;
use crate::media::image::{Codec, InvisibleCodec};
use crate::media::payload::DetectionResult;
use crate::media::CodecOptions;
use crate::result::Result;

/// Looks for an invisible watermark hidden with one specific codec.
#[derive(Debug, Clone, Default)]
pub struct WatermarkDetector {
    image: Option<RgbaImage>,
    options: CodecOptions,
    pool: Option<Arc<WorkerPool>>,
}

impl WatermarkDetector {
    pub fn new(options: impl Into<CodecOptions>) -> Self {
        Self {
            options: options.into(),
            ..Default::default()
        }
    }

    pub fn create(image: RgbaImage, options: impl Into<CodecOptions>) -> Self {
        Self::new(options).use_image(Some(image))
    }

    pub fn use_image(mut self, image: Option<RgbaImage>) -> Self {
        self.image = image;
        self
    }

    pub fn with_worker_pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Runs the detection on a worker. A missing watermark is a failure
    /// with the reason `No watermark found`.
    pub fn detect<L>(self, listener: L) -> RequestHandle<DetectionResult>
    where
        L: WatermarkListener<DetectionResult>,
    {
        let pool = self.pool.clone();

        dispatch(pool.as_ref(), move || self.detect_blocking(), listener)
    }

    pub fn detect_blocking(&self) -> Result<DetectionResult> {
        let image = match &self.image {
            None => return Err(WatermarkError::InputInvalid("no image to inspect")),
            Some(i) if i.width() == 0 || i.height() == 0 => {
                return Err(WatermarkError::InputInvalid("the image to inspect is empty"))
            }
            Some(i) => i,
        };
        debug!(
            "looking for a {:?} watermark in {}x{}",
            self.options.algorithm(),
            image.width(),
            image.height()
        );

        Codec::from(&self.options).detect(image)
    }
}
