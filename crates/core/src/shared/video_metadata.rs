/// What a frame source reports about an opened clip.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub total_frames: usize,
    /// Clockwise display rotation in degrees (0, 90, 180 or 270).
    pub rotation: i32,
}

impl VideoMetadata {
    /// The integral view of this metadata that the sampling planner works on.
    pub fn source_meta(&self) -> SourceMeta {
        SourceMeta {
            fps: self.fps.max(0.0) as u32,
            frame_count: self.total_frames as u64,
            width: self.width,
            height: self.height,
        }
    }
}

/// Nominal source rate and size, read once when a clip is opened.
///
/// `fps` is the decoder's rate truncated towards zero, so a 29.97 fps clip
/// plans as 29 fps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceMeta {
    pub fps: u32,
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
}

impl SourceMeta {
    /// Clip length in seconds as implied by frame count and nominal rate.
    pub fn duration_sec(&self) -> f64 {
        if self.fps == 0 {
            return 0.0;
        }
        self.frame_count as f64 / self.fps as f64
    }
}
