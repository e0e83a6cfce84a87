use ndarray::{Array3, Array4, ArrayView3, Axis};

use crate::shared::error::LoadError;

/// An ordered batch of RGB frames stored as one `N x H x W x 3` array of
/// `f32` in `[0, 1]`. Index 0 is the earliest frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameBatch {
    pixels: Array4<f32>,
}

impl FrameBatch {
    /// Stacks equally sized `H x W x 3` frames in order.
    pub fn from_frames(frames: Vec<Array3<f32>>) -> Result<Self, LoadError> {
        let Some(first) = frames.first() else {
            return Err(LoadError::NoFramesProduced);
        };
        let (height, width, _) = first.dim();

        for (index, frame) in frames.iter().enumerate() {
            let (h, w, _) = frame.dim();
            if h != height || w != width {
                return Err(LoadError::InconsistentFrameSize {
                    index,
                    width: width as u32,
                    height: height as u32,
                    actual_width: w as u32,
                    actual_height: h as u32,
                });
            }
        }

        let views: Vec<ArrayView3<'_, f32>> = frames.iter().map(|f| f.view()).collect();
        let pixels = ndarray::stack(Axis(0), &views)
            .map_err(|e| LoadError::Decode(Box::new(e)))?;
        Ok(Self { pixels })
    }

    /// A batch of black frames.
    pub fn zeros(count: usize, width: u32, height: u32) -> Self {
        Self {
            pixels: Array4::zeros((count, height as usize, width as usize, 3)),
        }
    }

    pub fn from_array(pixels: Array4<f32>) -> Self {
        debug_assert_eq!(pixels.dim().3, 3, "frames must have 3 channels");
        Self { pixels }
    }

    pub fn len(&self) -> usize {
        self.pixels.dim().0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width(&self) -> u32 {
        self.pixels.dim().2 as u32
    }

    pub fn height(&self) -> u32 {
        self.pixels.dim().1 as u32
    }

    pub fn frame(&self, index: usize) -> Option<ArrayView3<'_, f32>> {
        (index < self.len()).then(|| self.pixels.index_axis(Axis(0), index))
    }

    pub fn frames(&self) -> impl Iterator<Item = ArrayView3<'_, f32>> {
        self.pixels.axis_iter(Axis(0))
    }

    pub fn as_array(&self) -> &Array4<f32> {
        &self.pixels
    }

    pub fn into_array(self) -> Array4<f32> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(height: usize, width: usize, value: f32) -> Array3<f32> {
        Array3::from_elem((height, width, 3), value)
    }

    #[test]
    fn test_from_frames_preserves_order() {
        let batch =
            FrameBatch::from_frames(vec![filled(2, 4, 0.1), filled(2, 4, 0.5), filled(2, 4, 0.9)])
                .unwrap();
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.width(), 4);
        assert_eq!(batch.height(), 2);
        let firsts: Vec<f32> = batch.frames().map(|f| f[[0, 0, 0]]).collect();
        assert_eq!(firsts, vec![0.1, 0.5, 0.9]);
    }

    #[test]
    fn test_from_frames_empty_is_no_frames() {
        let result = FrameBatch::from_frames(Vec::new());
        assert!(matches!(result, Err(LoadError::NoFramesProduced)));
    }

    #[test]
    fn test_from_frames_rejects_mismatched_size() {
        let result = FrameBatch::from_frames(vec![filled(2, 4, 0.0), filled(4, 2, 0.0)]);
        match result {
            Err(LoadError::InconsistentFrameSize {
                index,
                width,
                height,
                actual_width,
                actual_height,
            }) => {
                assert_eq!(index, 1);
                assert_eq!((width, height), (4, 2));
                assert_eq!((actual_width, actual_height), (2, 4));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_zeros_shape() {
        let batch = FrameBatch::zeros(5, 64, 32);
        assert_eq!(batch.as_array().shape(), &[5, 32, 64, 3]);
        assert!(batch.as_array().iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_frame_out_of_range_is_none() {
        let batch = FrameBatch::zeros(2, 4, 4);
        assert!(batch.frame(1).is_some());
        assert!(batch.frame(2).is_none());
    }

    #[test]
    fn test_empty_batch() {
        let batch = FrameBatch::zeros(0, 4, 4);
        assert!(batch.is_empty());
    }
}
