use std::fs;
use std::io;
use std::path::Path;

use crate::shared::constants::VIDEO_EXTENSIONS;

/// Sorted names of the files in `dir` that look like video clips.
pub fn list_video_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if !is_video_file(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            names.push(name.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Whether the extension of `path` is one of [`VIDEO_EXTENSIONS`]
/// (case-insensitive).
pub fn is_video_file(path: &Path) -> bool {
    extension(path).is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

pub fn is_gif(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ext == "gif")
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}
