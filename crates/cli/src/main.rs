mod settings;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};

use frame_sampler_core::pipeline::load_video_use_case::{LoadVideoUseCase, LoadedVideo};
use frame_sampler_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use frame_sampler_core::sampling::domain::sampling_request::SamplingRequest;
use frame_sampler_core::shared::constants::SIZE_PRESETS;
use frame_sampler_core::shared::error::LoadError;
use frame_sampler_core::sizing::domain::size_spec::SizeSpec;
use frame_sampler_core::sizing::infrastructure::image_resampler::ImageResampler;
use frame_sampler_core::video::domain::image_writer::ImageWriter;
use frame_sampler_core::video::domain::video_source::{AssetDirectories, EmptyClip, VideoSource};
use frame_sampler_core::video::infrastructure::ffmpeg_audio_extractor::FfmpegAudioExtractor;
use frame_sampler_core::video::infrastructure::ffmpeg_frame_source::FfmpegFrameSource;
use frame_sampler_core::video::infrastructure::http_video_downloader::HttpVideoDownloader;
use frame_sampler_core::video::infrastructure::image_file_writer::ImageFileWriter;
use frame_sampler_core::video::infrastructure::input_directory::list_video_files;

use settings::Settings;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum SourceKind {
    /// A path on the local filesystem.
    File,
    /// A name in the asset input directory, optionally suffixed `[output]` or `[temp]`.
    Upload,
    /// A direct video URL.
    Url,
    /// A synthetic clip of black frames.
    Empty,
}

/// Rate-controlled frame sampling for video clips.
#[derive(Parser)]
#[command(name = "frame-sampler")]
struct Cli {
    /// Clip path, upload name or URL (see --source). Not needed for empty clips.
    input: Option<String>,

    /// How to interpret the input.
    #[arg(long, value_enum, default_value = "file")]
    source: SourceKind,

    /// Directory to write sampled frames to as numbered PNG files.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Write the audio matching the sampled window to this WAV file.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Start of the sampling window in seconds.
    #[arg(long, default_value = "0.0")]
    start_sec: f64,

    /// End of the sampling window in seconds (0 = end of clip).
    #[arg(long, default_value = "0.0")]
    end_sec: f64,

    /// Maximum number of frames to load (0 or negative = unbounded).
    #[arg(long, allow_negative_numbers = true)]
    frame_load_cap: Option<i64>,

    /// Output frame-rate ceiling (0 or negative = off).
    #[arg(long, allow_negative_numbers = true)]
    max_fps: Option<i64>,

    /// Output size, e.g. "512x?", "?x768", "256x256" or "Disabled".
    #[arg(long)]
    force_size: Option<String>,

    /// Root of the input/output/temp asset directories.
    #[arg(long)]
    asset_root: Option<PathBuf>,

    /// Width of an empty clip.
    #[arg(long, default_value_t = EmptyClip::default().width)]
    empty_width: u32,

    /// Height of an empty clip.
    #[arg(long, default_value_t = EmptyClip::default().height)]
    empty_height: u32,

    /// Frame count of an empty clip.
    #[arg(long, default_value_t = EmptyClip::default().frame_count)]
    empty_frames: usize,

    /// Frame rate of an empty clip.
    #[arg(long, default_value_t = EmptyClip::default().fps)]
    empty_fps: u32,

    /// List the clips in the asset input directory and exit.
    #[arg(long)]
    list_inputs: bool,

    /// List the size presets and exit.
    #[arg(long)]
    list_sizes: bool,

    /// Store --frame-load-cap, --max-fps, --force-size and --asset-root as
    /// the new defaults.
    #[arg(long)]
    save_settings: bool,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut settings = Settings::load();
    let size = apply_overrides(&cli, &mut settings)?;
    if cli.save_settings {
        settings.save();
        log::info!("Settings saved");
    }

    let directories = settings
        .asset_root
        .as_deref()
        .map(AssetDirectories::under)
        .unwrap_or_default();

    if cli.list_sizes {
        for preset in SIZE_PRESETS {
            println!("{preset}");
        }
        return Ok(());
    }
    if cli.list_inputs {
        for name in list_video_files(&directories.input)? {
            println!("{name}");
        }
        return Ok(());
    }

    validate(&cli)?;
    let video = video_source(&cli)?;
    let request = SamplingRequest::from_signed(
        cli.start_sec,
        cli.end_sec,
        i64::from(settings.frame_load_cap),
        i64::from(settings.max_fps),
    );

    let mut use_case = LoadVideoUseCase::new(
        Box::new(FfmpegFrameSource::new()),
        Box::new(ImageResampler::new()),
        Box::new(HttpVideoDownloader::new().with_progress(Box::new(download_progress))),
        directories,
        Box::new(StdoutPipelineLogger::default()),
    );
    let loaded = use_case.load(&video, &request, size)?;
    println!(
        "{} frames, {} fps, {}x{}",
        loaded.frame_count, loaded.fps, loaded.width, loaded.height
    );

    if let Some(dir) = &cli.output_dir {
        write_frames(&loaded, dir, &ImageFileWriter::new())?;
        log::info!("Frames written to {}", dir.display());
    }

    if let Some(path) = &cli.audio {
        let clip = loaded
            .audio
            .as_ref()
            .ok_or("Empty clips have no audio")?;
        let wav = clip.fetch(&FfmpegAudioExtractor)?;
        fs::write(path, wav)?;
        log::info!("Audio written to {}", path.display());
    }

    Ok(())
}

/// Folds explicit command-line values into the persisted defaults and
/// returns the resulting size spec. An unparsable size leaves `settings`
/// untouched.
fn apply_overrides(cli: &Cli, settings: &mut Settings) -> Result<SizeSpec, LoadError> {
    let force_size = cli.force_size.as_deref().unwrap_or(&settings.force_size);
    let size: SizeSpec = force_size.parse()?;

    if let Some(cap) = cli.frame_load_cap {
        settings.frame_load_cap = u32::try_from(cap).unwrap_or(0);
    }
    if let Some(fps) = cli.max_fps {
        settings.max_fps = u32::try_from(fps).unwrap_or(0);
    }
    if let Some(size) = &cli.force_size {
        settings.force_size = size.clone();
    }
    if let Some(root) = &cli.asset_root {
        settings.asset_root = Some(root.clone());
    }
    Ok(size)
}

fn validate(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.source != SourceKind::Empty && cli.input.is_none() {
        return Err("An input is required unless --source empty is used".into());
    }
    if cli.start_sec < 0.0 || cli.end_sec < 0.0 {
        return Err(format!(
            "Times must not be negative, got start {} and end {}",
            cli.start_sec, cli.end_sec
        )
        .into());
    }
    if cli.source == SourceKind::File {
        if let Some(input) = &cli.input {
            if !Path::new(input).exists() {
                return Err(format!("Input file not found: {input}").into());
            }
        }
    }
    Ok(())
}

fn video_source(cli: &Cli) -> Result<VideoSource, Box<dyn std::error::Error>> {
    let input = || cli.input.clone().ok_or("Missing input");
    Ok(match cli.source {
        SourceKind::File => VideoSource::File(PathBuf::from(input()?)),
        SourceKind::Upload => VideoSource::Upload { name: input()? },
        SourceKind::Url => VideoSource::Remote {
            url: input()?,
            output_dir: None,
        },
        SourceKind::Empty => VideoSource::Empty(EmptyClip {
            width: cli.empty_width,
            height: cli.empty_height,
            frame_count: cli.empty_frames,
            fps: cli.empty_fps,
        }),
    })
}

fn write_frames(
    loaded: &LoadedVideo,
    dir: &Path,
    writer: &dyn ImageWriter,
) -> Result<(), Box<dyn std::error::Error>> {
    for (i, frame) in loaded.frames.frames().enumerate() {
        writer.write(&dir.join(format!("frame_{i:05}.png")), frame)?;
    }
    Ok(())
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = downloaded as f64 / total as f64 * 100.0;
        eprint!(
            "\rDownloading clip: {:.1}/{:.1} MB ({pct:.0}%)",
            downloaded as f64 / 1_048_576.0,
            total as f64 / 1_048_576.0
        );
    } else {
        eprint!(
            "\rDownloading clip: {:.1} MB",
            downloaded as f64 / 1_048_576.0
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_clip_flags_default_to_empty_clip() {
        let cli = Cli::try_parse_from(["frame-sampler", "--source", "empty"]).unwrap();
        let default = EmptyClip::default();
        assert_eq!(cli.empty_width, default.width);
        assert_eq!(cli.empty_height, default.height);
        assert_eq!(cli.empty_frames, default.frame_count);
        assert_eq!(cli.empty_fps, 10);
    }

    #[test]
    fn test_invalid_force_size_is_rejected_before_saving() {
        let cli = Cli::try_parse_from([
            "frame-sampler",
            "clip.mp4",
            "--force-size",
            "big",
            "--frame-load-cap",
            "7",
            "--save-settings",
        ])
        .unwrap();
        let mut settings = Settings::default();

        let result = apply_overrides(&cli, &mut settings);

        assert!(matches!(result, Err(LoadError::InvalidSizeSpec(_))));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides_apply_valid_values() {
        let cli = Cli::try_parse_from([
            "frame-sampler",
            "clip.mp4",
            "--force-size",
            "?x768",
            "--max-fps",
            "-1",
        ])
        .unwrap();
        let mut settings = Settings::default();

        let size = apply_overrides(&cli, &mut settings).unwrap();

        assert_eq!(size, "?x768".parse::<SizeSpec>().unwrap());
        assert_eq!(settings.force_size, "?x768");
        assert_eq!(settings.max_fps, 0);
    }

    #[test]
    fn test_persisted_size_is_used_without_override() {
        let cli = Cli::try_parse_from(["frame-sampler", "clip.mp4"]).unwrap();
        let mut settings = Settings {
            force_size: "512x?".to_string(),
            ..Settings::default()
        };

        let size = apply_overrides(&cli, &mut settings).unwrap();

        assert_eq!(size, "512x?".parse::<SizeSpec>().unwrap());
    }
}
