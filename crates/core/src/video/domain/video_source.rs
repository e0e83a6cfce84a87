use std::path::{Path, PathBuf};

use crate::shared::constants::REMOTE_DOWNLOAD_DIR;

/// Where a clip comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum VideoSource {
    /// A clip on the local filesystem.
    File(PathBuf),
    /// A clip referenced by name inside one of the asset directories, written
    /// `"name"` or `"name [input|output|temp]"`.
    Upload { name: String },
    /// A clip fetched over the network. Downloads land in `output_dir`, or
    /// in `<output>/remote` when unset.
    Remote {
        url: String,
        output_dir: Option<PathBuf>,
    },
    /// A synthetic clip of black frames.
    Empty(EmptyClip),
}

/// Parameters of a synthetic black clip.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmptyClip {
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    pub fps: u32,
}

impl Default for EmptyClip {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            frame_count: 1,
            fps: 10,
        }
    }
}

/// Which asset directory an upload name refers to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AssetKind {
    #[default]
    Input,
    Output,
    Temp,
}

/// The asset directories upload names are resolved against.
#[derive(Clone, Debug, PartialEq)]
pub struct AssetDirectories {
    pub input: PathBuf,
    pub output: PathBuf,
    pub temp: PathBuf,
}

impl AssetDirectories {
    /// Lays out `input`, `output` and `temp` under a common root.
    pub fn under(root: &Path) -> Self {
        Self {
            input: root.join("input"),
            output: root.join("output"),
            temp: root.join("temp"),
        }
    }

    pub fn dir(&self, kind: AssetKind) -> &Path {
        match kind {
            AssetKind::Input => &self.input,
            AssetKind::Output => &self.output,
            AssetKind::Temp => &self.temp,
        }
    }

    /// Resolves an upload name, honouring a trailing `[input]`, `[output]`
    /// or `[temp]` annotation and stripping surrounding quotes.
    pub fn resolve_upload(&self, name: &str) -> PathBuf {
        let (name, kind) = parse_annotated_name(name);
        self.dir(kind).join(name)
    }

    pub fn remote_dir(&self) -> PathBuf {
        self.output.join(REMOTE_DOWNLOAD_DIR)
    }
}

impl Default for AssetDirectories {
    /// Asset directories under the platform data directory.
    ///
    /// - macOS: `~/Library/Application Support/FrameSampler/`
    /// - Linux: `$XDG_DATA_HOME/FrameSampler/` or `~/.local/share/FrameSampler/`
    /// - Windows: `%APPDATA%/FrameSampler/`
    fn default() -> Self {
        let root = dirs::data_dir()
            .map(|d| d.join("FrameSampler"))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::under(&root)
    }
}

/// Splits `"clip.mp4 [temp]"` into `("clip.mp4", AssetKind::Temp)`.
///
/// Unknown annotations are left in the name.
pub fn parse_annotated_name(name: &str) -> (&str, AssetKind) {
    let name = name.trim().trim_matches('"');
    let annotations = [
        (" [input]", AssetKind::Input),
        (" [output]", AssetKind::Output),
        (" [temp]", AssetKind::Temp),
    ];
    for (suffix, kind) in annotations {
        if let Some(stripped) = name.strip_suffix(suffix) {
            return (stripped, kind);
        }
    }
    (name, AssetKind::Input)
}
