use std::path::PathBuf;

use thiserror::Error;

/// Collaborator error type at the trait seams.
pub type BoxError = Box<dyn std::error::Error>;

/// Everything a clip load can fail with.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("end time {end_sec}s precedes start time {start_sec}s")]
    InvalidWindow { start_sec: f64, end_sec: f64 },

    #[error("source reports no usable frame rate")]
    UnknownFrameRate,

    #[error("could not open {locator}: {source}")]
    SourceUnavailable {
        locator: String,
        #[source]
        source: BoxError,
    },

    #[error("no frames generated")]
    NoFramesProduced,

    #[error("source frame size {width}x{height} has no area")]
    DegenerateSourceSize { width: u32, height: u32 },

    #[error("decode failed: {0}")]
    Decode(#[source] BoxError),

    #[error("frame {index} is {actual_width}x{actual_height}, expected {width}x{height}")]
    InconsistentFrameSize {
        index: usize,
        width: u32,
        height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("invalid size specification '{0}'")]
    InvalidSizeSpec(String),

    #[error("resampling failed: {0}")]
    Resample(#[source] BoxError),

    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("audio extraction failed for {path}: {source}")]
    Audio {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("no audio stream in {0}")]
    NoAudioStream(PathBuf),
}
