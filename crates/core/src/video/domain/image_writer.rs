use std::path::Path;

use ndarray::ArrayView3;

use crate::shared::error::BoxError;

/// Writes one `H x W x 3` frame of a batch to an image file.
pub trait ImageWriter: Send {
    /// Writes `frame` (RGB, values in `[0, 1]`) to `path`, creating parent
    /// directories as needed.
    fn write(&self, path: &Path, frame: ArrayView3<'_, f32>) -> Result<(), BoxError>;
}
