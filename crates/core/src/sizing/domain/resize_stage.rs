use crate::shared::error::LoadError;
use crate::shared::frame_batch::FrameBatch;
use crate::sizing::domain::resampler::{CropAnchor, ResampleFilter, Resampler};
use crate::sizing::domain::size_spec::SizeSpec;

/// A batch together with the size its frames ended up at.
#[derive(Debug)]
pub struct ResizedBatch {
    pub frames: FrameBatch,
    pub width: u32,
    pub height: u32,
}

/// Brings `batch` to the size `spec` asks for.
///
/// Returns the batch untouched when resizing is disabled or the resolved
/// size already matches the source; otherwise hands the whole batch to
/// `resampler` once, with a Lanczos kernel and a center anchor.
pub fn resize(
    batch: FrameBatch,
    src_width: u32,
    src_height: u32,
    spec: SizeSpec,
    resampler: &dyn Resampler,
) -> Result<ResizedBatch, LoadError> {
    if spec != SizeSpec::Disabled && (src_width == 0 || src_height == 0) {
        return Err(LoadError::DegenerateSourceSize {
            width: src_width,
            height: src_height,
        });
    }

    let (width, height) = match spec.target_size(src_width, src_height) {
        Some(size) if size != (src_width, src_height) => size,
        _ => {
            return Ok(ResizedBatch {
                frames: batch,
                width: src_width,
                height: src_height,
            })
        }
    };

    log::debug!(
        "Resizing {} frames from {src_width}x{src_height} to {width}x{height}",
        batch.len()
    );
    let frames = resampler
        .batch_resize(
            &batch,
            width,
            height,
            ResampleFilter::Lanczos,
            CropAnchor::Center,
        )
        .map_err(LoadError::Resample)?;
    Ok(ResizedBatch {
        frames,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::BoxError;
    use std::sync::{Arc, Mutex};

    #[allow(clippy::type_complexity)]
    struct RecordingResampler {
        calls: Arc<Mutex<Vec<(usize, u32, u32, ResampleFilter, CropAnchor)>>>,
    }

    impl RecordingResampler {
        fn new() -> Self {
            Self {
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    impl Resampler for RecordingResampler {
        fn batch_resize(
            &self,
            batch: &FrameBatch,
            width: u32,
            height: u32,
            filter: ResampleFilter,
            anchor: CropAnchor,
        ) -> Result<FrameBatch, BoxError> {
            self.calls
                .lock()
                .unwrap()
                .push((batch.len(), width, height, filter, anchor));
            Ok(FrameBatch::zeros(batch.len(), width, height))
        }
    }

    struct FailingResampler;

    impl Resampler for FailingResampler {
        fn batch_resize(
            &self,
            _batch: &FrameBatch,
            _width: u32,
            _height: u32,
            _filter: ResampleFilter,
            _anchor: CropAnchor,
        ) -> Result<FrameBatch, BoxError> {
            Err("out of memory".into())
        }
    }

    fn batch(count: usize, width: u32, height: u32) -> FrameBatch {
        let mut batch = FrameBatch::zeros(count, width, height).into_array();
        batch.fill(0.25);
        FrameBatch::from_array(batch)
    }

    #[test]
    fn test_disabled_is_noop() {
        let resampler = RecordingResampler::new();
        let input = batch(3, 100, 50);
        let out = resize(input.clone(), 100, 50, SizeSpec::Disabled, &resampler).unwrap();
        assert_eq!((out.width, out.height), (100, 50));
        assert_eq!(out.frames, input);
        assert!(resampler.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_ignores_degenerate_source() {
        let out = resize(
            batch(1, 0, 0),
            0,
            0,
            SizeSpec::Disabled,
            &RecordingResampler::new(),
        )
        .unwrap();
        assert_eq!((out.width, out.height), (0, 0));
    }

    #[test]
    fn test_width_wildcard_resizes_whole_batch_once() {
        let resampler = RecordingResampler::new();
        let spec: SizeSpec = "?x100".parse().unwrap();
        let out = resize(batch(4, 101, 50), 101, 50, spec, &resampler).unwrap();
        assert_eq!((out.width, out.height), (200, 100));
        assert_eq!(out.frames.len(), 4);
        assert_eq!(out.frames.width(), 200);
        let calls = resampler.calls.lock().unwrap();
        assert_eq!(
            *calls,
            vec![(4, 200, 100, ResampleFilter::Lanczos, CropAnchor::Center)]
        );
    }

    #[test]
    fn test_matching_size_skips_resampler_and_returns_same_batch() {
        let resampler = RecordingResampler::new();
        let spec: SizeSpec = "?x50".parse().unwrap();
        let input = batch(2, 96, 50);
        let out = resize(input.clone(), 96, 50, spec, &resampler).unwrap();
        assert_eq!(out.frames, input);
        assert_eq!((out.width, out.height), (96, 50));
        assert!(resampler.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_exact_size_is_verbatim() {
        let resampler = RecordingResampler::new();
        let spec: SizeSpec = "64x48".parse().unwrap();
        let out = resize(batch(1, 640, 480), 640, 480, spec, &resampler).unwrap();
        assert_eq!((out.width, out.height), (64, 48));
    }

    #[test]
    fn test_zero_height_is_degenerate() {
        let spec: SizeSpec = "?x100".parse().unwrap();
        let result = resize(batch(1, 100, 0), 100, 0, spec, &RecordingResampler::new());
        assert!(matches!(
            result,
            Err(LoadError::DegenerateSourceSize {
                width: 100,
                height: 0
            })
        ));
    }

    #[test]
    fn test_zero_width_is_degenerate_even_for_exact_size() {
        let spec: SizeSpec = "64x64".parse().unwrap();
        let result = resize(batch(1, 0, 10), 0, 10, spec, &RecordingResampler::new());
        assert!(matches!(result, Err(LoadError::DegenerateSourceSize { .. })));
    }

    #[test]
    fn test_resampler_failure_is_surfaced() {
        let spec: SizeSpec = "64x64".parse().unwrap();
        let result = resize(batch(1, 32, 32), 32, 32, spec, &FailingResampler);
        assert!(matches!(result, Err(LoadError::Resample(_))));
    }
}
