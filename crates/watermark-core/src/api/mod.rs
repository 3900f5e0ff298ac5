//! The request level API: builder, detector and bulk runner, plus a single
//! configuration driven entry point.

mod build;
mod bulk;
mod detect;
pub mod worker;

pub use build::*;
pub use bulk::*;
pub use detect::*;
pub use worker::{CancelToken, RequestHandle, RequestState, WatermarkListener, WorkerPool};

use image::RgbaImage;

use crate::media::payload::DetectionResult;
use crate::media::Algorithm;
use crate::visible::{Mark, PlacementOption};
use worker::{dispatch, Completion};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Visible,
    Invisible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubMode {
    #[default]
    Single,
    Tile,
}

/// Everything a single watermark request needs apart from the images
#[derive(Debug, Clone, Default)]
pub struct WatermarkConfig {
    pub mode: Mode,
    /// only used by visible marks
    pub sub_mode: SubMode,
    /// only used by invisible marks
    pub algorithm: Algorithm,
    pub mark: Option<Mark>,
    pub placement: PlacementOption,
}

impl WatermarkConfig {
    fn builder(&self, background: Option<RgbaImage>) -> WatermarkBuilder {
        WatermarkBuilder::new()
            .use_background(background)
            .use_mark(self.mark.clone())
            .with_tile_mode(self.sub_mode == SubMode::Tile)
            .with_placement(self.placement)
    }
}

/// What a configured request produces
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    Image(RgbaImage),
    Detection(DetectionResult),
}

impl Output {
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            Output::Image(i) => Some(i),
            Output::Detection(_) => None,
        }
    }

    pub fn detection(&self) -> Option<&DetectionResult> {
        match self {
            Output::Image(_) => None,
            Output::Detection(d) => Some(d),
        }
    }
}

/// Applies the configured mark to `background`.
///
/// Visible marks are rendered on the calling thread, invisible ones on the
/// shared worker pool. Either way `listener` hears about the outcome once.
pub fn run<L>(
    config: &WatermarkConfig,
    background: Option<RgbaImage>,
    listener: L,
) -> RequestHandle<Output>
where
    L: WatermarkListener<Output>,
{
    let builder = config.builder(background);
    match config.mode {
        Mode::Visible => {
            let (completion, handle) = Completion::new(listener);
            completion.complete(
                builder
                    .get_watermark()
                    .map(|w| Output::Image(w.into_output_image())),
            );
            handle
        }
        Mode::Invisible => {
            let options = config.algorithm.into();
            dispatch(
                None,
                move || builder.embed_invisible(&options).map(Output::Image),
                listener,
            )
        }
    }
}

/// looks for an invisible mark hidden with the configured algorithm
pub fn detect<L>(
    config: &WatermarkConfig,
    image: Option<RgbaImage>,
    listener: L,
) -> RequestHandle<Output>
where
    L: WatermarkListener<Output>,
{
    let detector = WatermarkDetector::new(config.algorithm).use_image(image);

    dispatch(
        None,
        move || detector.detect_blocking().map(Output::Detection),
        listener,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::worker::tests::RecordingListener;
    use crate::error::WatermarkError;
    use crate::test_utils::prepare_solid_image;
    use crate::visible::TextMark;
    use image::Rgba;

    const GRAY: Rgba<u8> = Rgba([128, 128, 128, 255]);

    fn text_config(mode: Mode) -> WatermarkConfig {
        WatermarkConfig {
            mode,
            mark: Some(TextMark::new("config").with_alpha(255).into()),
            ..Default::default()
        }
    }

    #[test]
    fn should_complete_visible_requests_inline() {
        let listener = RecordingListener::new();
        let handle = run(
            &text_config(Mode::Visible),
            Some(prepare_solid_image(80, 40, GRAY)),
            listener.clone(),
        );

        assert_eq!(handle.state(), RequestState::Succeeded);
        assert_eq!(listener.calls(), 1);
        let output = handle.wait().unwrap();
        assert_eq!(output.image().map(|i| i.dimensions()), Some((80, 40)));
    }

    #[test]
    fn should_hide_and_detect_by_config() {
        let config = WatermarkConfig {
            algorithm: Algorithm::Dct,
            ..text_config(Mode::Invisible)
        };

        let marked = run(&config, Some(prepare_solid_image(48, 48, GRAY)), ())
            .wait()
            .unwrap();
        let Output::Image(marked) = marked else {
            panic!("an image was expected");
        };
        let found = detect(&config, Some(marked), ()).wait().unwrap();

        assert_eq!(
            found.detection().and_then(|d| d.text()),
            Some("config")
        );
    }

    #[test]
    fn should_fail_without_a_mark() {
        let listener = RecordingListener::new();
        let config = WatermarkConfig::default();

        let background = Some(prepare_solid_image(8, 8, GRAY));
        let result = run(&config, background, listener.clone()).wait();

        assert!(matches!(result, Err(WatermarkError::InputInvalid(_))));
        assert_eq!(listener.failures.lock().unwrap().len(), 1);
    }

    #[test]
    fn should_fail_without_a_background() {
        let result = run(&text_config(Mode::Invisible), None, ()).wait();
        assert!(matches!(result, Err(WatermarkError::InputInvalid(_))));
    }
}
