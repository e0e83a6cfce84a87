use crate::sampling::domain::sampling_request::SamplingRequest;
use crate::shared::error::LoadError;
use crate::shared::video_metadata::SourceMeta;

/// Which source frames to visit and at what rate the result plays back.
///
/// `start_frame` and `end_frame` are fractional because they come straight
/// from `fps * seconds`; the acquisition loop truncates when it seeks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingPlan {
    pub start_frame: f64,
    pub end_frame: f64,
    /// Source frames advanced between two samples. Always at least 1.
    pub step: u64,
    pub output_fps: u32,
    pub frame_load_cap: u64,
    pub window_frames: u64,
    /// Set when the rate ceiling could not be met with a whole-number step.
    pub lossy_rate_clamp: bool,
}

/// Computes the sampling plan for one request.
///
/// Fails with [`LoadError::InvalidWindow`] when the (resolved) end time
/// precedes the start time and with [`LoadError::UnknownFrameRate`] when the
/// source reports a zero rate.
pub fn plan(meta: &SourceMeta, request: &SamplingRequest) -> Result<SamplingPlan, LoadError> {
    if meta.fps == 0 {
        return Err(LoadError::UnknownFrameRate);
    }
    let fps = u64::from(meta.fps);
    let cap = request.effective_cap();

    let end_sec = if request.end_sec > 0.0 {
        request.end_sec
    } else {
        meta.duration_sec()
    };
    if end_sec < request.start_sec {
        return Err(LoadError::InvalidWindow {
            start_sec: request.start_sec,
            end_sec,
        });
    }

    let window_frames = ((end_sec - request.start_sec) * fps as f64) as u64;
    let mut step = (window_frames / cap).max(1);
    let mut output_fps = (fps / step).max(1);
    let mut lossy_rate_clamp = false;

    if let Some(max_fps) = request.rate_ceiling().map(u64::from) {
        if max_fps < output_fps {
            let clamped_step = (step as f64 / max_fps as f64 * output_fps as f64) as u64;
            lossy_rate_clamp = (step * output_fps) % max_fps != 0;
            if lossy_rate_clamp {
                log::warn!(
                    "Rate ceiling {max_fps} fps does not divide evenly: output {output_fps} fps, \
                     step {step} -> {clamped_step}"
                );
            }
            step = clamped_step.max(1);
            output_fps = max_fps;
        }
    }

    let plan = SamplingPlan {
        start_frame: fps as f64 * request.start_sec,
        end_frame: fps as f64 * end_sec,
        step,
        output_fps: output_fps as u32,
        frame_load_cap: cap,
        window_frames,
        lossy_rate_clamp,
    };
    log::debug!(
        "Sampling plan: start_frame={} end_frame={} step={} output_fps={}",
        plan.start_frame,
        plan.end_frame,
        plan.step,
        plan.output_fps
    );
    Ok(plan)
}
