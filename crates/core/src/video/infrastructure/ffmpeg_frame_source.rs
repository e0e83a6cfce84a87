use std::path::Path;

use ffmpeg_next::format::context::Input;
use ffmpeg_next::software::scaling;
use ffmpeg_next::util::frame::video::Video as VideoFrame;

use crate::shared::constants::MAX_DECODE_AHEAD_FRAMES;
use crate::shared::error::BoxError;
use crate::shared::frame::{Frame, Orientation};
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::frame_source::FrameSource;

/// Decodes frames by index via ffmpeg-next (libavformat + libavcodec).
///
/// Short forward seeks decode through the gap; anything else jumps to the
/// preceding keyframe and decodes up to the target. Frames come out as RGB24.
pub struct FfmpegFrameSource {
    session: Option<Session>,
}

// Safety: FfmpegFrameSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegFrameSource {}

struct Session {
    ictx: Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: scaling::Context,
    stream_index: usize,
    /// Seconds per stream timestamp tick.
    time_base: f64,
    start_pts: i64,
    fps: f64,
    width: u32,
    height: u32,
    orientation: Orientation,
    /// Index of the frame the decoder will yield next, unknown right after a
    /// container seek.
    position: Option<u64>,
    /// Smallest index the next read may return.
    target: u64,
    eof_sent: bool,
}

impl FfmpegFrameSource {
    pub fn new() -> Self {
        Self { session: None }
    }
}

impl Default for FfmpegFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for FfmpegFrameSource {
    fn open(&mut self, locator: &Path) -> Result<VideoMetadata, BoxError> {
        self.session = None;
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(locator)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let fps = rational_to_f64(stream.avg_frame_rate())
            .or_else(|| rational_to_f64(stream.rate()))
            .unwrap_or(0.0);
        let total_frames = if stream.frames() > 0 {
            stream.frames() as usize
        } else {
            let seconds = ictx.duration().max(0) as f64 / f64::from(ffmpeg_next::ffi::AV_TIME_BASE);
            (seconds * fps).round() as usize
        };
        let time_base = rational_to_f64(stream.time_base()).unwrap_or(0.0);
        let start_pts = stream.start_time().max(0);
        let rotation = extract_rotation(&stream);

        let width = decoder.width();
        let height = decoder.height();
        let scaler = scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            scaling::Flags::BILINEAR,
        )?;

        let metadata = VideoMetadata {
            width,
            height,
            fps,
            total_frames,
            rotation,
        };
        log::debug!(
            "Opened {} ({}x{} @ {:.3} fps, {} frames, codec {})",
            locator.display(),
            width,
            height,
            fps,
            total_frames,
            decoder.codec().map(|c| c.name().to_string()).unwrap_or_default()
        );

        self.session = Some(Session {
            ictx,
            decoder,
            scaler,
            stream_index,
            time_base,
            start_pts,
            fps,
            width,
            height,
            orientation: Orientation::from_degrees(rotation),
            position: Some(0),
            target: 0,
            eof_sent: false,
        });

        Ok(metadata)
    }

    fn seek(&mut self, frame_index: u64) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        session.seek(frame_index)
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, BoxError> {
        let session = self
            .session
            .as_mut()
            .ok_or("FfmpegFrameSource: not opened")?;
        session.read_frame()
    }

    fn close(&mut self) {
        self.session = None;
    }
}

impl Session {
    fn seek(&mut self, frame_index: u64) -> bool {
        let decode_ahead = matches!(
            self.position,
            Some(pos) if frame_index >= pos && frame_index - pos <= MAX_DECODE_AHEAD_FRAMES
        );
        if decode_ahead {
            self.target = frame_index;
            return true;
        }
        if self.fps <= 0.0 {
            return false;
        }

        let timestamp = (frame_index as f64 / self.fps
            * f64::from(ffmpeg_next::ffi::AV_TIME_BASE)) as i64;
        if let Err(e) = self.ictx.seek(timestamp, ..timestamp) {
            log::warn!("Container seek to frame {frame_index} failed: {e}");
            return false;
        }
        self.decoder.flush();
        self.eof_sent = false;
        self.position = None;
        self.target = frame_index;
        true
    }

    fn read_frame(&mut self) -> Result<Option<Frame>, BoxError> {
        let mut decoded = VideoFrame::empty();
        loop {
            if !self.next_decoded(&mut decoded)? {
                return Ok(None);
            }

            let index = self.frame_index_of(&decoded);
            self.position = Some(index + 1);
            if index < self.target {
                continue;
            }

            let mut rgb_frame = VideoFrame::empty();
            self.scaler.run(&decoded, &mut rgb_frame)?;
            let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
            self.target = index + 1;
            return Ok(Some(
                Frame::new(pixels, self.width, self.height, index as usize)
                    .with_orientation(self.orientation),
            ));
        }
    }

    /// Pulls the next decoded picture into `decoded`, feeding packets as
    /// needed. Returns `false` once the decoder is drained.
    fn next_decoded(&mut self, decoded: &mut VideoFrame) -> Result<bool, BoxError> {
        loop {
            match self.decoder.receive_frame(decoded) {
                Ok(()) => return Ok(true),
                Err(ffmpeg_next::Error::Eof) => return Ok(false),
                Err(_) if self.eof_sent => return Ok(false),
                Err(_) => {}
            }

            match self.ictx.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        log::debug!("Dropping undecodable packet: {e}");
                    }
                }
                None => {
                    self.decoder.send_eof()?;
                    self.eof_sent = true;
                }
            }
        }
    }

    /// Frame index of a decoded picture, from its best-effort timestamp.
    fn frame_index_of(&self, decoded: &VideoFrame) -> u64 {
        let pts = decoded.timestamp().or_else(|| decoded.pts());
        match pts {
            Some(pts) if self.time_base > 0.0 && self.fps > 0.0 => {
                let seconds = (pts - self.start_pts).max(0) as f64 * self.time_base;
                (seconds * self.fps).round() as u64
            }
            _ => self.position.unwrap_or(self.target),
        }
    }
}

fn rational_to_f64(rate: ffmpeg_next::Rational) -> Option<f64> {
    (rate.numerator() > 0 && rate.denominator() > 0)
        .then(|| f64::from(rate.numerator()) / f64::from(rate.denominator()))
}

/// Extracts the rotation angle from a video stream.
///
/// Tries stream side data (DisplayMatrix) first, then falls back to the
/// `"rotate"` metadata tag. Returns 0, 90, 180, or 270.
fn extract_rotation(stream: &ffmpeg_next::format::stream::Stream) -> i32 {
    for side_data in stream.side_data() {
        if side_data.kind() == ffmpeg_next::codec::packet::side_data::Type::DisplayMatrix {
            if let Some(angle) = parse_display_matrix(side_data.data()) {
                return Orientation::from_degrees(angle).degrees();
            }
        }
    }

    if let Some(rotate_str) = stream.metadata().get("rotate") {
        if let Ok(angle) = rotate_str.parse::<i32>() {
            return Orientation::from_degrees(angle).degrees();
        }
    }

    0
}

/// Parses a 3x3 display matrix (9 x i32, 16.16 fixed-point, little-endian)
/// into a clockwise rotation in degrees.
///
/// The matrix describes the transform needed for display, so the angle of
/// its first row vector is negated.
fn parse_display_matrix(data: &[u8]) -> Option<i32> {
    if data.len() < 36 {
        return None;
    }

    let m00 = i32::from_le_bytes(data[0..4].try_into().ok()?) as f64 / 65536.0;
    let m10 = i32::from_le_bytes(data[4..8].try_into().ok()?) as f64 / 65536.0;

    let angle_deg = -m10.atan2(m00).to_degrees().round() as i32;
    Some(angle_deg)
}

/// Copies pixel data from an ffmpeg frame into a tightly packed RGB buffer,
/// dropping any per-row stride padding.
fn extract_rgb_pixels(rgb_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
