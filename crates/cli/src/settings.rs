use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use frame_sampler_core::shared::constants::DEFAULT_FRAME_LOAD_CAP;

/// Persisted CLI defaults. Command-line flags override every field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `0` means unbounded.
    pub frame_load_cap: u32,
    /// `0` disables the rate ceiling.
    pub max_fps: u32,
    /// Size spec such as `"512x?"` or `"Disabled"`.
    pub force_size: String,
    /// Root of the `input`, `output` and `temp` asset directories.
    pub asset_root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            frame_load_cap: DEFAULT_FRAME_LOAD_CAP,
            max_fps: 0,
            force_size: "Disabled".to_string(),
            asset_root: None,
        }
    }
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("FrameSampler").join("settings.json"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Reads settings from `path`, falling back to defaults when the file is
    /// missing or malformed.
    pub fn load_from(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|json| serde_json::from_str(&json).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(self) {
            let _ = fs::write(path, json);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(&dir.path().join("settings.json"));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.frame_load_cap, 50);
    }

    #[test]
    fn test_malformed_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{ "max_fps": 8 }"#).unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.max_fps, 8);
        assert_eq!(settings.frame_load_cap, 50);
        assert_eq!(settings.force_size, "Disabled");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings {
            frame_load_cap: 16,
            max_fps: 12,
            force_size: "?x512".to_string(),
            asset_root: Some(PathBuf::from("/srv/assets")),
        };
        settings.save_to(&path);
        assert_eq!(Settings::load_from(&path), settings);
    }
}
