use std::ops::{Deref, DerefMut};
use std::path::Path;

use crate::sampling::domain::frame_conversion::to_normalized_rgb;
use crate::sampling::domain::sampling_plan::SamplingPlan;
use crate::shared::error::LoadError;
use crate::shared::frame_batch::FrameBatch;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;

/// An opened [`FrameSource`] that is closed when the guard goes out of
/// scope, whichever way the acquisition ends.
pub struct OpenSource<'a> {
    source: &'a mut dyn FrameSource,
    metadata: VideoMetadata,
}

impl<'a> OpenSource<'a> {
    pub fn open(source: &'a mut dyn FrameSource, locator: &Path) -> Result<Self, LoadError> {
        match source.open(locator) {
            Ok(metadata) => Ok(Self { source, metadata }),
            Err(e) => {
                // A half-opened decoder must not outlive a failed open.
                source.close();
                Err(LoadError::SourceUnavailable {
                    locator: locator.display().to_string(),
                    source: e,
                })
            }
        }
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }
}

impl<'a> Deref for OpenSource<'a> {
    type Target = dyn FrameSource + 'a;

    fn deref(&self) -> &Self::Target {
        &*self.source
    }
}

impl DerefMut for OpenSource<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.source
    }
}

impl Drop for OpenSource<'_> {
    fn drop(&mut self) {
        self.source.close();
    }
}

/// Walks the plan over `source`, collecting at most `cap` frames.
///
/// End of stream stops the walk early. A read error or an unconvertible
/// frame is a stop signal once at least one frame is in hand; before that
/// the whole acquisition fails with [`LoadError::NoFramesProduced`].
pub fn acquire(
    plan: &SamplingPlan,
    cap: u64,
    source: &mut dyn FrameSource,
) -> Result<FrameBatch, LoadError> {
    acquire_with_progress(plan, cap, source, &mut |_| {})
}

/// [`acquire`], calling `on_frame` with the running count after each frame.
pub fn acquire_with_progress(
    plan: &SamplingPlan,
    cap: u64,
    source: &mut dyn FrameSource,
    on_frame: &mut dyn FnMut(u64),
) -> Result<FrameBatch, LoadError> {
    let mut frames = Vec::new();
    let mut frames_added: u64 = 0;
    let mut curr_frame = plan.start_frame;

    loop {
        let frame_index = curr_frame as u64;
        if !source.seek(frame_index) {
            log::debug!("Seek to frame {frame_index} was not honoured");
        }

        let frame = match source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => break,
            Err(e) if frames.is_empty() => {
                log::error!("First read at frame {frame_index} failed: {e}");
                return Err(LoadError::NoFramesProduced);
            }
            Err(e) => {
                log::warn!("Stopping at frame {frame_index} after read error: {e}");
                break;
            }
        };

        match to_normalized_rgb(frame) {
            Ok(pixels) => frames.push(pixels),
            Err(e) if frames.is_empty() => {
                log::error!("First frame at {frame_index} could not be converted: {e}");
                return Err(LoadError::NoFramesProduced);
            }
            Err(e) => {
                log::warn!("Stopping at frame {frame_index} after conversion error: {e}");
                break;
            }
        }
        frames_added += 1;
        on_frame(frames_added);

        if frames_added >= cap || curr_frame >= plan.end_frame {
            break;
        }
        curr_frame += plan.step as f64;
    }

    log::debug!("Acquired {frames_added} frames");
    FrameBatch::from_frames(frames)
}
