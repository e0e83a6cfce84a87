use std::path::Path;

use ffmpeg_next::format::sample::Type as SampleType;
use ffmpeg_next::format::Sample;
use ffmpeg_next::util::frame::audio::Audio as AudioFrame;

use crate::shared::error::BoxError;
use crate::video::domain::audio_extractor::AudioExtractor;

const BYTES_PER_SAMPLE: usize = 2;

/// Decodes a clip's best audio stream with ffmpeg-next and re-encodes the
/// requested span as 16-bit PCM WAV at the source rate and channel count.
pub struct FfmpegAudioExtractor;

impl AudioExtractor for FfmpegAudioExtractor {
    fn extract(
        &self,
        path: &Path,
        start_sec: f64,
        duration_sec: f64,
    ) -> Result<Option<Vec<u8>>, BoxError> {
        ffmpeg_next::init()?;

        let mut ictx = ffmpeg_next::format::input(path)?;

        let audio_stream = match ictx.streams().best(ffmpeg_next::media::Type::Audio) {
            Some(stream) => stream,
            None => return Ok(None),
        };

        let audio_stream_index = audio_stream.index();
        let time_base = f64::from(audio_stream.time_base());
        let codec_ctx =
            ffmpeg_next::codec::context::Context::from_parameters(audio_stream.parameters())?;
        let mut decoder = codec_ctx.decoder().audio()?;

        let channels = decoder.channels() as u16;
        let sample_rate = decoder.rate();
        check_stream_layout(channels, sample_rate)?;
        let layout = if decoder.channel_layout().is_empty() {
            ffmpeg_next::ChannelLayout::default(i32::from(channels))
        } else {
            decoder.channel_layout()
        };

        let mut resampler = ffmpeg_next::software::resampling::Context::get(
            decoder.format(),
            layout,
            sample_rate,
            Sample::I16(SampleType::Packed),
            layout,
            sample_rate,
        )?;

        let mut pcm: Vec<u8> = Vec::new();
        let mut first_pts_sec: Option<f64> = None;
        let mut decoded_frame = AudioFrame::empty();
        let mut resampled_frame = AudioFrame::empty();

        let mut drain = |decoder: &mut ffmpeg_next::decoder::Audio,
                         pcm: &mut Vec<u8>|
         -> Result<(), BoxError> {
            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                if first_pts_sec.is_none() {
                    first_pts_sec = decoded_frame.pts().map(|pts| pts as f64 * time_base);
                }
                resampler.run(&decoded_frame, &mut resampled_frame)?;
                extract_packed_bytes(&resampled_frame, channels, pcm);
            }
            Ok(())
        };

        for (stream, packet) in ictx.packets() {
            if stream.index() != audio_stream_index {
                continue;
            }
            decoder.send_packet(&packet)?;
            drain(&mut decoder, &mut pcm)?;
        }

        decoder.send_eof()?;
        drain(&mut decoder, &mut pcm)?;

        if let Ok(Some(delay)) = resampler.flush(&mut resampled_frame) {
            if delay.output > 0 {
                extract_packed_bytes(&resampled_frame, channels, &mut pcm);
            }
        }

        let offset_sec = first_pts_sec.unwrap_or(0.0).max(0.0);
        let span = sample_span(
            pcm.len() / block_align(channels),
            sample_rate,
            start_sec - offset_sec,
            duration_sec,
        );
        let align = block_align(channels);
        let data = &pcm[span.start * align..span.end * align];

        log::debug!(
            "Extracted {} audio samples ({} Hz, {} ch) from {}",
            span.len(),
            sample_rate,
            channels,
            path.display()
        );
        Ok(Some(wav_bytes(data, sample_rate, channels)))
    }
}

/// Rejects streams whose layout cannot be framed as PCM samples.
fn check_stream_layout(channels: u16, sample_rate: u32) -> Result<(), BoxError> {
    if channels == 0 {
        return Err("audio stream reports 0 channels".into());
    }
    if sample_rate == 0 {
        return Err("audio stream reports a 0 Hz sample rate".into());
    }
    Ok(())
}

fn block_align(channels: u16) -> usize {
    usize::from(channels) * BYTES_PER_SAMPLE
}

/// Sample-frame range `[start, end)` of a `total`-frame track that covers
/// `duration_sec` seconds from `start_sec`. Non-positive values mean "from
/// the beginning" and "to the end".
fn sample_span(
    total: usize,
    sample_rate: u32,
    start_sec: f64,
    duration_sec: f64,
) -> std::ops::Range<usize> {
    let rate = f64::from(sample_rate);
    let start = if start_sec > 0.0 {
        ((start_sec * rate).round() as usize).min(total)
    } else {
        0
    };
    let end = if duration_sec > 0.0 {
        (start + (duration_sec * rate).round() as usize).min(total)
    } else {
        total
    };
    start..end
}

/// Appends the interleaved bytes of a packed 16-bit frame to `out`.
fn extract_packed_bytes(frame: &AudioFrame, channels: u16, out: &mut Vec<u8>) {
    let num_bytes = frame.samples() * block_align(channels);
    if num_bytes == 0 {
        return;
    }
    let data = frame.data(0);
    out.extend_from_slice(&data[..num_bytes.min(data.len())]);
}

/// Wraps interleaved native-endian 16-bit PCM in a canonical 44-byte WAV
/// header.
fn wav_bytes(pcm: &[u8], sample_rate: u32, channels: u16) -> Vec<u8> {
    let data_size = pcm.len() as u32;
    let block_align = channels * BYTES_PER_SAMPLE as u16;
    let byte_rate = sample_rate * u32::from(block_align);

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_size).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());

    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for sample in pcm.chunks_exact(BYTES_PER_SAMPLE) {
        let value = i16::from_ne_bytes([sample[0], sample[1]]);
        wav.extend_from_slice(&value.to_le_bytes());
    }
    wav
}
