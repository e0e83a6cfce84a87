use image::imageops::{self, FilterType};
use image::Rgb32FImage;
use ndarray::{Array3, ArrayView3};

use crate::shared::error::BoxError;
use crate::shared::frame_batch::FrameBatch;
use crate::sizing::domain::resampler::{CropAnchor, ResampleFilter, Resampler};

/// CPU resampler backed by the `image` crate, working in `f32` so the batch
/// never round-trips through 8-bit pixels.
pub struct ImageResampler;

impl ImageResampler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageResampler {
    fn default() -> Self {
        Self::new()
    }
}

impl Resampler for ImageResampler {
    fn batch_resize(
        &self,
        batch: &FrameBatch,
        width: u32,
        height: u32,
        filter: ResampleFilter,
        anchor: CropAnchor,
    ) -> Result<FrameBatch, BoxError> {
        if width == 0 || height == 0 {
            return Err(format!("cannot resample to {width}x{height}").into());
        }
        let frames = batch
            .frames()
            .map(|frame| resize_frame(frame, width, height, filter, anchor))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(FrameBatch::from_frames(frames)?)
    }
}

fn resize_frame(
    frame: ArrayView3<'_, f32>,
    width: u32,
    height: u32,
    filter: ResampleFilter,
    anchor: CropAnchor,
) -> Result<Array3<f32>, BoxError> {
    let (src_height, src_width, _) = frame.dim();
    let img = Rgb32FImage::from_raw(
        src_width as u32,
        src_height as u32,
        frame.iter().copied().collect(),
    )
    .ok_or("Failed to create image from frame data")?;

    let img = match anchor {
        CropAnchor::Disabled => img,
        CropAnchor::Center => {
            let (x, y, w, h) = center_crop(img.width(), img.height(), width, height);
            imageops::crop_imm(&img, x, y, w, h).to_image()
        }
    };

    let mut resized = imageops::resize(&img, width, height, filter_type(filter));
    // Lanczos rings past the input range.
    for value in resized.iter_mut() {
        *value = value.clamp(0.0, 1.0);
    }

    Ok(Array3::from_shape_vec(
        (height as usize, width as usize, 3),
        resized.into_raw(),
    )?)
}

fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Bilinear => FilterType::Triangle,
        ResampleFilter::Lanczos => FilterType::Lanczos3,
    }
}

/// Region `(x, y, width, height)` of a `src_width x src_height` frame that
/// has the target's aspect ratio, trimmed evenly from both sides of the
/// axis that is too long.
fn center_crop(src_width: u32, src_height: u32, width: u32, height: u32) -> (u32, u32, u32, u32) {
    let old_aspect = f64::from(src_width) / f64::from(src_height);
    let new_aspect = f64::from(width) / f64::from(height);
    let (w, h) = (f64::from(src_width), f64::from(src_height));

    let mut x = 0;
    let mut y = 0;
    if old_aspect > new_aspect {
        x = ((w - w * (new_aspect / old_aspect)) / 2.0).round() as u32;
    } else if old_aspect < new_aspect {
        y = ((h - h * (old_aspect / new_aspect)) / 2.0).round() as u32;
    }

    let crop_width = src_width.saturating_sub(2 * x).max(1);
    let crop_height = src_height.saturating_sub(2 * y).max(1);
    (x, y, crop_width, crop_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{s, Array4};
    use rstest::rstest;

    fn uniform(count: usize, width: u32, height: u32, value: f32) -> FrameBatch {
        FrameBatch::from_array(Array4::from_elem(
            (count, height as usize, width as usize, 3),
            value,
        ))
    }

    #[rstest]
    #[case::same_aspect(100, 50, 200, 100, (0, 0, 100, 50))]
    #[case::wider_source(200, 100, 100, 100, (50, 0, 100, 100))]
    #[case::taller_source(100, 200, 100, 100, (0, 50, 100, 100))]
    #[case::landscape_to_portrait(1920, 1080, 512, 768, (600, 0, 720, 1080))]
    fn test_center_crop(
        #[case] src_width: u32,
        #[case] src_height: u32,
        #[case] width: u32,
        #[case] height: u32,
        #[case] expected: (u32, u32, u32, u32),
    ) {
        assert_eq!(center_crop(src_width, src_height, width, height), expected);
    }

    #[test]
    fn test_resizes_every_frame() {
        let batch = uniform(3, 64, 32, 0.5);
        let out = ImageResampler::new()
            .batch_resize(&batch, 16, 8, ResampleFilter::Lanczos, CropAnchor::Center)
            .unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!((out.width(), out.height()), (16, 8));
    }

    #[test]
    fn test_uniform_colour_survives_lanczos() {
        let batch = uniform(1, 40, 30, 0.75);
        let out = ImageResampler::new()
            .batch_resize(&batch, 24, 16, ResampleFilter::Lanczos, CropAnchor::Center)
            .unwrap();
        for value in out.as_array().iter() {
            assert_relative_eq!(*value, 0.75, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_center_crop_drops_side_bars() {
        // Left and right quarters are white, the middle half is black.
        let mut pixels = Array4::<f32>::zeros((1, 8, 16, 3));
        pixels.slice_mut(s![.., .., ..4, ..]).fill(1.0);
        pixels.slice_mut(s![.., .., 12.., ..]).fill(1.0);
        let batch = FrameBatch::from_array(pixels);

        let out = ImageResampler::new()
            .batch_resize(&batch, 4, 4, ResampleFilter::Nearest, CropAnchor::Center)
            .unwrap();
        assert!(out.as_array().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_stretch_keeps_side_bars() {
        let mut pixels = Array4::<f32>::zeros((1, 8, 16, 3));
        pixels.slice_mut(s![.., .., ..4, ..]).fill(1.0);
        let batch = FrameBatch::from_array(pixels);

        let out = ImageResampler::new()
            .batch_resize(&batch, 4, 4, ResampleFilter::Nearest, CropAnchor::Disabled)
            .unwrap();
        assert_eq!(out.as_array()[[0, 0, 0, 0]], 1.0);
    }

    #[test]
    fn test_output_is_clamped_to_unit_range() {
        let mut pixels = Array4::<f32>::zeros((1, 16, 16, 3));
        pixels.slice_mut(s![.., .., 8.., ..]).fill(1.0);
        let batch = FrameBatch::from_array(pixels);

        let out = ImageResampler::new()
            .batch_resize(&batch, 40, 40, ResampleFilter::Lanczos, CropAnchor::Center)
            .unwrap();
        assert!(out.as_array().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_zero_target_is_rejected() {
        let batch = uniform(1, 8, 8, 0.0);
        assert!(ImageResampler::new()
            .batch_resize(&batch, 0, 8, ResampleFilter::Lanczos, CropAnchor::Center)
            .is_err());
    }
}
