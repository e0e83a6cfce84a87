use std::path::PathBuf;
use std::time::Instant;

use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::sampling::domain::frame_acquirer::{acquire_with_progress, OpenSource};
use crate::sampling::domain::sampling_plan::plan;
use crate::sampling::domain::sampling_request::SamplingRequest;
use crate::shared::error::LoadError;
use crate::shared::frame_batch::FrameBatch;
use crate::sizing::domain::resampler::Resampler;
use crate::sizing::domain::resize_stage::resize;
use crate::sizing::domain::size_spec::SizeSpec;
use crate::video::domain::audio_extractor::AudioClip;
use crate::video::domain::frame_source::FrameSource;
use crate::video::domain::video_downloader::VideoDownloader;
use crate::video::domain::video_source::{AssetDirectories, EmptyClip, VideoSource};

/// The result of one load: the sampled frames and how to play them back.
#[derive(Debug)]
pub struct LoadedVideo {
    pub frames: FrameBatch,
    pub frame_count: usize,
    /// Playback rate of `frames`, after the sampling step and rate ceiling.
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    /// The matching span of the clip's audio. `None` for synthetic clips.
    pub audio: Option<AudioClip>,
}

/// Clip loading pipeline: locate → open → plan → acquire → close → resize.
pub struct LoadVideoUseCase {
    source: Box<dyn FrameSource>,
    resampler: Box<dyn Resampler>,
    downloader: Box<dyn VideoDownloader>,
    directories: AssetDirectories,
    logger: Box<dyn PipelineLogger>,
}

impl LoadVideoUseCase {
    pub fn new(
        source: Box<dyn FrameSource>,
        resampler: Box<dyn Resampler>,
        downloader: Box<dyn VideoDownloader>,
        directories: AssetDirectories,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            source,
            resampler,
            downloader,
            directories,
            logger,
        }
    }

    /// Loads the frames `request` selects from `video`, sized per `size`.
    pub fn load(
        &mut self,
        video: &VideoSource,
        request: &SamplingRequest,
        size: SizeSpec,
    ) -> Result<LoadedVideo, LoadError> {
        if let VideoSource::Empty(clip) = video {
            return empty_clip(clip);
        }
        let locator = self.locate(video)?;

        let t0 = Instant::now();
        let mut open = OpenSource::open(self.source.as_mut(), &locator)?;
        let meta = open.metadata().source_meta();
        self.logger
            .timing("open", t0.elapsed().as_secs_f64() * 1000.0);

        let t0 = Instant::now();
        let plan = plan(&meta, request)?;
        self.logger
            .timing("plan", t0.elapsed().as_secs_f64() * 1000.0);
        self.logger.metric("step", plan.step as f64);
        self.logger.metric("output_fps", f64::from(plan.output_fps));
        if plan.lossy_rate_clamp {
            self.logger.info(&format!(
                "Rate ceiling applied approximately: step {} at {} fps",
                plan.step, plan.output_fps
            ));
        }

        let expected = (plan.window_frames / plan.step + 1).min(plan.frame_load_cap) as usize;
        let logger = &mut self.logger;
        let t0 = Instant::now();
        let batch = acquire_with_progress(&plan, plan.frame_load_cap, &mut *open, &mut |n| {
            logger.progress(n as usize, expected)
        });
        drop(open);
        let batch = batch?;
        self.logger
            .timing("acquire", t0.elapsed().as_secs_f64() * 1000.0);

        let frame_count = batch.len();
        let t0 = Instant::now();
        let (src_width, src_height) = (batch.width(), batch.height());
        let resized = resize(batch, src_width, src_height, size, self.resampler.as_ref())?;
        self.logger
            .timing("resize", t0.elapsed().as_secs_f64() * 1000.0);

        let window_sec = (plan.end_frame - plan.start_frame) / f64::from(meta.fps);
        let audio = AudioClip::new(locator.clone(), request.start_sec, window_sec);

        let message = format!(
            "Loaded {frame_count} frames from {} at {} fps ({}x{})",
            locator.display(),
            plan.output_fps,
            resized.width,
            resized.height
        );
        self.logger.info(&message);
        self.logger.summary();

        Ok(LoadedVideo {
            frames: resized.frames,
            frame_count,
            fps: plan.output_fps,
            width: resized.width,
            height: resized.height,
            audio: Some(audio),
        })
    }

    /// Turns a source variant into a local path the frame source can open.
    fn locate(&self, video: &VideoSource) -> Result<PathBuf, LoadError> {
        match video {
            VideoSource::File(path) => Ok(path.clone()),
            VideoSource::Upload { name } => Ok(self.directories.resolve_upload(name)),
            VideoSource::Remote { url, output_dir } => {
                let dir = output_dir
                    .clone()
                    .unwrap_or_else(|| self.directories.remote_dir());
                self.downloader
                    .download(url, &dir)
                    .map_err(|source| LoadError::Download {
                        url: url.clone(),
                        source,
                    })
            }
            VideoSource::Empty(_) => Err(LoadError::NoFramesProduced),
        }
    }
}

fn empty_clip(clip: &EmptyClip) -> Result<LoadedVideo, LoadError> {
    if clip.frame_count == 0 {
        return Err(LoadError::NoFramesProduced);
    }
    if clip.width == 0 || clip.height == 0 {
        return Err(LoadError::DegenerateSourceSize {
            width: clip.width,
            height: clip.height,
        });
    }
    log::info!(
        "Generated {} empty {}x{} frames",
        clip.frame_count,
        clip.width,
        clip.height
    );
    Ok(LoadedVideo {
        frames: FrameBatch::zeros(clip.frame_count, clip.width, clip.height),
        frame_count: clip.frame_count,
        fps: clip.fps,
        width: clip.width,
        height: clip.height,
        audio: None,
    })
}
