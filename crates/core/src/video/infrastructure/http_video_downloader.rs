use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::shared::error::BoxError;
use crate::video::domain::video_downloader::VideoDownloader;

const FALLBACK_FILE_NAME: &str = "download.mp4";

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// Fetches direct video URLs with a blocking HTTP client.
///
/// The clip is named after the URL's last path segment; a file of that name
/// already in the target directory is reused without touching the network.
#[derive(Default)]
pub struct HttpVideoDownloader {
    progress: Option<ProgressFn>,
}

impl HttpVideoDownloader {
    pub fn new() -> Self {
        Self { progress: None }
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl VideoDownloader for HttpVideoDownloader {
    fn download(&self, url: &str, dir: &Path) -> Result<PathBuf, BoxError> {
        let dest = dir.join(file_name_from_url(url));
        if dest.exists() {
            log::info!("Reusing downloaded clip {}", dest.display());
            return Ok(dest);
        }

        fs::create_dir_all(dir)?;
        let temp_path = dest.with_extension("part");
        let result = self.fetch(url, &dest, &temp_path);

        // Clean up .part file on any error
        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
        }
        result?;

        log::info!("Downloaded {url} to {}", dest.display());
        Ok(dest)
    }
}

impl HttpVideoDownloader {
    fn fetch(&self, url: &str, dest: &Path, temp_path: &Path) -> Result<(), BoxError> {
        let mut response = reqwest::blocking::get(url)?.error_for_status()?;
        let total = response.content_length().unwrap_or(0);
        let mut downloaded: u64 = 0;

        let mut file = fs::File::create(temp_path)?;
        let mut buf = vec![0u8; 1024 * 1024];
        loop {
            let n = response.read(&mut buf)?;
            if n == 0 {
                break;
            }
            file.write_all(&buf[..n])?;
            downloaded += n as u64;
            if let Some(ref cb) = self.progress {
                cb(downloaded, total);
            }
        }
        file.flush()?;
        drop(file);

        fs::rename(temp_path, dest)?;
        Ok(())
    }
}

/// Last path segment of `url`, ignoring any query or fragment.
fn file_name_from_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);
    let segment = match path.split_once('/') {
        Some((_host, rest)) => rest.rsplit('/').next().unwrap_or_default(),
        None => "",
    };
    if segment.is_empty() || segment == "." || segment == ".." {
        FALLBACK_FILE_NAME.to_string()
    } else {
        segment.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("https://cdn.example.com/clips/cat.mp4", "cat.mp4")]
    #[case("https://cdn.example.com/clips/cat.webm?token=abc", "cat.webm")]
    #[case("https://cdn.example.com/a/b/dog.mkv#t=10", "dog.mkv")]
    #[case("https://cdn.example.com/", FALLBACK_FILE_NAME)]
    #[case("https://cdn.example.com", FALLBACK_FILE_NAME)]
    #[case("https://cdn.example.com/clips/..", FALLBACK_FILE_NAME)]
    fn test_file_name_from_url(#[case] url: &str, #[case] expected: &str) {
        assert_eq!(file_name_from_url(url), expected);
    }

    #[test]
    fn test_existing_download_is_reused() {
        let tmp = TempDir::new().unwrap();
        let existing = tmp.path().join("cat.mp4");
        fs::write(&existing, b"cached clip").unwrap();

        // The host is unresolvable, so this only passes without a request.
        let path = HttpVideoDownloader::new()
            .download("http://invalid.invalid/cat.mp4", tmp.path())
            .unwrap();
        assert_eq!(path, existing);
        assert_eq!(fs::read(&path).unwrap(), b"cached clip");
    }

    #[test]
    fn test_failed_download_leaves_no_partial_file() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("remote");
        let result = HttpVideoDownloader::new().download("http://invalid.invalid/cat.mp4", &dir);
        assert!(result.is_err());
        assert!(!dir.join("cat.part").exists());
        assert!(!dir.join("cat.mp4").exists());
    }

    #[test]
    #[ignore]
    fn test_download_real_clip() {
        // Skip in CI; requires network access
        let tmp = TempDir::new().unwrap();
        let path = HttpVideoDownloader::new()
            .download(
                "https://interactive-examples.mdn.mozilla.net/media/cc0-videos/flower.webm",
                tmp.path(),
            )
            .unwrap();
        assert!(path.exists());
    }
}
