use image::RgbaImage;
use log::{error, info, warn};
use std::sync::Arc;

use super::build::WatermarkBuilder;
use super::worker::{dispatch, CancelToken, RequestHandle, WatermarkListener, WorkerPool};
use crate::result::Result;
use crate::visible::{Mark, PlacementOption};

/// How a bulk run went
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BulkReport {
    pub success_count: usize,
    pub total_count: usize,
}

/// Applies one visible mark to many backgrounds, one after the other.
///
/// A background that fails does not stop the run, it is logged and left out
/// of the success count.
#[derive(Debug, Clone)]
pub struct BulkWatermark {
    mark: Mark,
    tile: bool,
    placement: PlacementOption,
    pool: Option<Arc<WorkerPool>>,
}

impl BulkWatermark {
    pub fn new(mark: impl Into<Mark>, tile: bool, placement: PlacementOption) -> Self {
        Self {
            mark: mark.into(),
            tile,
            placement,
            pool: None,
        }
    }

    pub fn with_worker_pool(mut self, pool: Arc<WorkerPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    /// renders the mark onto one background, the placement is resolved for it alone
    pub fn render(&self, background: RgbaImage) -> Result<RgbaImage> {
        let watermark = WatermarkBuilder::create(background)
            .use_mark(Some(self.mark.clone()))
            .with_tile_mode(self.tile)
            .with_placement(self.placement)
            .get_watermark()?;

        Ok(watermark.into_output_image())
    }

    /// Renders every background and hands the result to `save` together with
    /// the index of the background.
    ///
    /// `backgrounds` is only advanced while `cancel` is not set, so lazily
    /// loaded images are not read after a cancellation.
    pub fn run<I, S>(&self, backgrounds: I, cancel: &CancelToken, mut save: S) -> BulkReport
    where
        I: IntoIterator<Item = Result<RgbaImage>>,
        I::IntoIter: ExactSizeIterator,
        S: FnMut(usize, RgbaImage) -> Result<()>,
    {
        let mut backgrounds = backgrounds.into_iter().enumerate();
        let mut report = BulkReport {
            success_count: 0,
            total_count: backgrounds.len(),
        };

        loop {
            if cancel.is_cancelled() {
                info!("bulk run cancelled");
                break;
            }
            let Some((index, background)) = backgrounds.next() else {
                break;
            };
            let background = match background {
                Ok(b) => b,
                Err(e) => {
                    warn!("skipping background {index}: {e}");
                    continue;
                }
            };
            match self.render(background).and_then(|out| save(index, out)) {
                Ok(()) => report.success_count += 1,
                Err(e) => error!("background {index} failed: {e}"),
            }
        }
        info!(
            "bulk run finished, {} of {} succeeded",
            report.success_count, report.total_count
        );

        report
    }

    /// [`run`](Self::run) on a worker, the report goes to `listener`
    pub fn spawn<I, S, L>(
        self,
        backgrounds: I,
        cancel: CancelToken,
        save: S,
        listener: L,
    ) -> RequestHandle<BulkReport>
    where
        I: IntoIterator<Item = Result<RgbaImage>> + Send + 'static,
        I::IntoIter: ExactSizeIterator,
        S: FnMut(usize, RgbaImage) -> Result<()> + Send + 'static,
        L: WatermarkListener<BulkReport>,
    {
        let pool = self.pool.clone();

        dispatch(
            pool.as_ref(),
            move || Ok(self.run(backgrounds, &cancel, save)),
            listener,
        )
    }
}
