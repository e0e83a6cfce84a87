use std::path::Path;

use crate::shared::error::BoxError;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;

/// A seekable, frame-at-a-time decoder session over one clip.
///
/// Implementations handle container and codec details; the acquisition loop
/// only seeks by frame index and reads one frame at a time. A session must
/// not be shared by two acquisitions at once.
pub trait FrameSource: Send {
    /// Opens the clip at `locator` and returns its metadata.
    fn open(&mut self, locator: &Path) -> Result<VideoMetadata, BoxError>;

    /// Positions the session so the next read returns the frame at
    /// `frame_index` (or the nearest one after it). Returns `false` when the
    /// position could not be set.
    fn seek(&mut self, frame_index: u64) -> bool;

    /// Reads the next frame. `Ok(None)` means end of stream.
    fn read_frame(&mut self) -> Result<Option<Frame>, BoxError>;

    /// Releases the decoder. Must be safe to call more than once.
    fn close(&mut self);
}
