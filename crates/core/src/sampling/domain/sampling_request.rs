use crate::shared::constants::{DEFAULT_FRAME_LOAD_CAP, UNBOUNDED_FRAME_LOAD_CAP};

/// Which part of a clip to sample and how densely.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SamplingRequest {
    pub start_sec: f64,
    /// `0.0` means "to the end of the clip".
    pub end_sec: f64,
    /// `0` means unbounded.
    pub frame_load_cap: u32,
    /// Output rate ceiling. `None` (or zero) disables it.
    pub max_fps: Option<u32>,
}

impl Default for SamplingRequest {
    fn default() -> Self {
        Self {
            start_sec: 0.0,
            end_sec: 0.0,
            frame_load_cap: DEFAULT_FRAME_LOAD_CAP,
            max_fps: None,
        }
    }
}

impl SamplingRequest {
    pub fn new(start_sec: f64, end_sec: f64, frame_load_cap: u32, max_fps: Option<u32>) -> Self {
        Self {
            start_sec: start_sec.max(0.0),
            end_sec: end_sec.max(0.0),
            frame_load_cap,
            max_fps,
        }
    }

    /// Builds a request from host-style signed integers, where a
    /// non-positive cap means "unbounded" and a non-positive rate disables
    /// the ceiling.
    pub fn from_signed(start_sec: f64, end_sec: f64, frame_load_cap: i64, max_fps: i64) -> Self {
        Self::new(
            start_sec,
            end_sec,
            u32::try_from(frame_load_cap).unwrap_or(0),
            u32::try_from(max_fps).ok().filter(|fps| *fps > 0),
        )
    }

    /// The cap the acquisition loop actually enforces.
    pub fn effective_cap(&self) -> u64 {
        if self.frame_load_cap > 0 {
            u64::from(self.frame_load_cap)
        } else {
            UNBOUNDED_FRAME_LOAD_CAP
        }
    }

    pub fn rate_ceiling(&self) -> Option<u32> {
        self.max_fps.filter(|fps| *fps > 0)
    }
}
