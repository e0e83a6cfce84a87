use image::{imageops, RgbImage};
use ndarray::Array3;

use crate::shared::error::LoadError;
use crate::shared::frame::{ChannelOrder, Frame, Orientation};

/// Turns a decoded frame into the batch representation: RGB channel order,
/// upright orientation, `H x W x 3` floats in `[0, 1]`.
pub fn to_normalized_rgb(frame: Frame) -> Result<Array3<f32>, LoadError> {
    let (width, height) = (frame.width(), frame.height());
    let (order, orientation, index) = (frame.channel_order(), frame.orientation(), frame.index());

    let mut data = frame.into_data();
    if order == ChannelOrder::Bgr {
        for pixel in data.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }
    }

    let image = RgbImage::from_raw(width, height, data).ok_or_else(|| {
        LoadError::Decode(format!("frame {index} buffer does not match {width}x{height}").into())
    })?;
    let image = match orientation {
        Orientation::Upright => image,
        Orientation::Rotate90 => imageops::rotate90(&image),
        Orientation::Rotate180 => imageops::rotate180(&image),
        Orientation::Rotate270 => imageops::rotate270(&image),
    };

    let shape = (image.height() as usize, image.width() as usize, 3);
    let values: Vec<f32> = image
        .into_raw()
        .into_iter()
        .map(|v| f32::from(v) / 255.0)
        .collect();
    Array3::from_shape_vec(shape, values).map_err(|e| LoadError::Decode(Box::new(e)))
}
