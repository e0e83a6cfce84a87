use std::path::Path;

use ndarray::ArrayView3;

use crate::shared::error::BoxError;
use crate::video::domain::image_writer::ImageWriter;

/// Writes batch frames to image files using the `image` crate. The format
/// follows the file extension.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: ArrayView3<'_, f32>) -> Result<(), BoxError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let (height, width, _) = frame.dim();
        let data = frame
            .iter()
            .map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
            .collect();
        let img = image::RgbImage::from_raw(width as u32, height as u32, data)
            .ok_or("Failed to create image from frame data")?;

        img.save(path)?;
        Ok(())
    }
}
