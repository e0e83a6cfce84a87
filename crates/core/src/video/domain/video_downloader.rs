use std::path::{Path, PathBuf};

use crate::shared::error::BoxError;

/// Fetches a remote clip into a local directory.
pub trait VideoDownloader: Send {
    /// Downloads `url` into `dir` and returns the local path of the clip.
    /// An already downloaded clip may be returned without fetching again.
    fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, BoxError>;
}
