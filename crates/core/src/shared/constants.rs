/// Container extensions a host should offer when listing candidate inputs.
pub const VIDEO_EXTENSIONS: &[&str] = &["webm", "mp4", "mkv", "gif"];

/// Size specifications offered to hosts as presets.
pub const SIZE_PRESETS: &[&str] = &[
    "Disabled", "256x?", "?x256", "256x256", "512x?", "?x512", "512x512", "?x768", "768x?",
];

pub const DEFAULT_FRAME_LOAD_CAP: u32 = 50;

/// Stand-in cap used when the caller asks for no cap at all.
pub const UNBOUNDED_FRAME_LOAD_CAP: u64 = 999_999;

/// Derived axes are snapped to multiples of this for latent conversion.
pub const LATENT_ALIGNMENT: u32 = 8;

/// Sub-directory of the output directory that remote downloads land in.
pub const REMOTE_DOWNLOAD_DIR: &str = "remote";

/// Forward distance (in frames) a seek may cover by decoding instead of
/// jumping back to a keyframe.
pub const MAX_DECODE_AHEAD_FRAMES: u64 = 48;
