use std::path::{Path, PathBuf};

use crate::shared::error::{BoxError, LoadError};

/// Extracts a span of a clip's audio track as a 16-bit PCM WAV stream.
pub trait AudioExtractor: Send {
    /// A non-positive `start_sec` starts at the beginning of the track and a
    /// non-positive `duration_sec` runs to its end. Returns `Ok(None)` when
    /// the clip has no audio stream.
    fn extract(
        &self,
        path: &Path,
        start_sec: f64,
        duration_sec: f64,
    ) -> Result<Option<Vec<u8>>, BoxError>;
}

/// Handle to the audio that accompanies a loaded clip.
///
/// Nothing is decoded until [`AudioClip::fetch`] is called.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioClip {
    pub path: PathBuf,
    pub start_sec: f64,
    pub duration_sec: f64,
}

impl AudioClip {
    pub fn new(path: impl Into<PathBuf>, start_sec: f64, duration_sec: f64) -> Self {
        Self {
            path: path.into(),
            start_sec,
            duration_sec,
        }
    }

    /// Pulls the WAV bytes for this span through `extractor`.
    pub fn fetch(&self, extractor: &dyn AudioExtractor) -> Result<Vec<u8>, LoadError> {
        log::debug!(
            "Extracting audio from {} ({}s +{}s)",
            self.path.display(),
            self.start_sec,
            self.duration_sec
        );
        match extractor.extract(&self.path, self.start_sec, self.duration_sec) {
            Ok(Some(bytes)) => Ok(bytes),
            Ok(None) => Err(LoadError::NoAudioStream(self.path.clone())),
            Err(source) => Err(LoadError::Audio {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
