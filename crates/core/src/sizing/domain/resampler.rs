use crate::shared::error::BoxError;
use crate::shared::frame_batch::FrameBatch;

/// Interpolation kernel used when resampling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResampleFilter {
    Nearest,
    Bilinear,
    #[default]
    Lanczos,
}

/// How the source is fitted to a target with a different aspect ratio.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CropAnchor {
    /// Stretch the whole frame.
    Disabled,
    /// Crop the excess equally from both sides of the wider axis, then scale.
    #[default]
    Center,
}

/// Resizes every frame of a batch to one target size in a single call.
pub trait Resampler: Send {
    fn batch_resize(
        &self,
        batch: &FrameBatch,
        width: u32,
        height: u32,
        filter: ResampleFilter,
        anchor: CropAnchor,
    ) -> Result<FrameBatch, BoxError>;
}
