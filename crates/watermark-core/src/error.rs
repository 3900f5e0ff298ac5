use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Represents an absent or unusable input. For example a request without background image
    #[error("Invalid input: {0}")]
    InputInvalid(&'static str),

    /// Represents a payload that does not fit into the carrier with the chosen codec
    #[error("Capacity Error: the payload requires {required} carrier slots but only {available} are available")]
    CapacityExceeded { required: usize, available: usize },

    /// Represents an image exceeding the maximum dimension accepted by the invisible codecs
    #[error("The image with dimensions {width}x{height} is too big, at most {max}x{max} is supported")]
    ImageTooLarge { width: u32, height: u32, max: u32 },

    /// Represents a detection run that found no watermark frame
    #[error("No watermark found")]
    MarkersNotFound,

    /// Represents a watermark frame whose body could not be decoded
    #[error("Watermark data is malformed: {0}")]
    DecodeMalformed(String),

    /// Represents a DCT embedding that could not be verified because pixel values saturated
    #[error("The carrier image is too saturated to hold the watermark, {mismatched} digits could not be verified")]
    CarrierSaturated { mismatched: usize },

    /// Represents a worker pool that could not be started or a request that ended without a result
    #[error("Worker error: {0}")]
    WorkerUnavailable(String),

    /// Represents a failure to read an image file. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents a file that is not an image format this crate reads.
    #[error("Media format is not supported")]
    UnsupportedMedia,

    /// Represents a failure when encoding an image.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
