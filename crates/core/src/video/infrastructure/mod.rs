pub mod ffmpeg_audio_extractor;
pub mod ffmpeg_frame_source;
pub mod http_video_downloader;
pub mod image_file_writer;
pub mod input_directory;

#[cfg(test)]
pub(crate) mod test_video;
