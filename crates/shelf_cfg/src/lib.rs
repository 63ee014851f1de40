use std::{io, path::PathBuf, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use tristate::TriState;

mod tristate;

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shelf {
    #[serde(default)]
    pub settings: AppSettings,
    #[serde(default)]
    pub library: Vec<MediaNode>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Base directory for library-relative media files.
    #[serde(default)]
    pub library_root: Option<String>,
    /// Directory holding prefixes for titles without an explicit `prefix_path`.
    #[serde(default)]
    pub prefixes: Option<String>,
    #[serde(default)]
    pub default_wrappers: Vec<LaunchWrapper>,
    #[serde(default)]
    pub emulators: Vec<EmulatorConfig>,
    #[serde(default)]
    pub prefer_portable_launch_paths: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchWrapper {
    pub path: String,
    #[serde(default = "LaunchWrapper::default_args")]
    pub args: String,
}

impl LaunchWrapper {
    pub const FILE: &'static str = "{file}";

    fn default_args() -> String {
        Self::FILE.to_owned()
    }

    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            args: Self::default_args(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: impl Into<String>) -> Self {
        self.args = args.into();
        self
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmulatorConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub path: String,
    /// Argument template, e.g. `-fullscreen {file}`.
    #[serde(default)]
    pub arguments: String,
    #[serde(default, skip_serializing_if = "TriState::is_inherit")]
    pub wrappers: TriState<LaunchWrapper>,
    #[serde(default)]
    pub env: IndexMap<String, String>,
}

#[derive(Serialize, Deserialize, Default, Copy, Clone, PartialEq, Eq, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum MediaType {
    #[default]
    Native,
    Emulator,
}

#[derive(Serialize, Deserialize, Copy, Clone, Hash, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum WineArch {
    Win32,
    Win64,
}

impl std::fmt::Display for WineArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WineArch::Win32 => "win32",
            WineArch::Win64 => "win64",
        })
    }
}

impl FromStr for WineArch {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win32" => Ok(WineArch::Win32),
            "win64" => Ok(WineArch::Win64),
            _ => Err(()),
        }
    }
}

/// One file of a title. Multi-disc titles carry several, ordered by `index`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaFileRef {
    #[serde(default)]
    pub index: u32,
    /// Absolute, or relative to `settings.library_root`.
    pub path: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub files: Vec<MediaFileRef>,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub emulator_id: Option<String>,
    #[serde(default)]
    pub launcher_path: Option<String>,
    #[serde(default)]
    pub launcher_args: Option<String>,
    #[serde(default)]
    pub prefix_path: Option<String>,
    #[serde(default)]
    pub wine_arch: Option<WineArch>,
    #[serde(default)]
    pub working_directory: Option<String>,
    #[serde(default)]
    pub env: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "TriState::is_inherit")]
    pub wrappers: TriState<LaunchWrapper>,
}

impl MediaItem {
    /// The file referenced by `{file}`: the requested disc if it exists, otherwise
    /// the file with the lowest index.
    #[must_use]
    pub fn primary_file(&self, disc: Option<u32>) -> Option<&MediaFileRef> {
        disc.and_then(|disc| self.files.iter().find(|f| f.index == disc))
            .or_else(|| self.files.iter().min_by_key(|f| f.index))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaNode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub children: Vec<MediaNode>,
    #[serde(default)]
    pub items: Vec<MediaItem>,
    #[serde(default, skip_serializing_if = "TriState::is_inherit")]
    pub wrappers: TriState<LaunchWrapper>,
    #[serde(default)]
    pub env: IndexMap<String, String>,
    #[serde(default)]
    pub default_emulator_id: Option<String>,
}

impl Shelf {
    #[must_use]
    pub fn emulator(&self, id: &str) -> Option<&EmulatorConfig> {
        self.settings.emulators.iter().find(|e| e.id == id)
    }

    /// Looks an item up by id, then by exact title.
    #[must_use]
    pub fn find_item(&self, key: &str) -> Option<(&MediaNode, &MediaItem)> {
        find_item(&self.library, |i| i.id == key)
            .or_else(|| find_item(&self.library, |i| i.title == key))
    }
}

/// Depth-first search for the first item matching `predicate`, together with the
/// node that owns it.
#[must_use]
pub fn find_item<'a>(
    forest: &'a [MediaNode],
    predicate: impl Fn(&MediaItem) -> bool + Copy,
) -> Option<(&'a MediaNode, &'a MediaItem)> {
    forest.iter().find_map(|node| {
        node.items
            .iter()
            .find(|i| predicate(i))
            .map(|i| (node, i))
            .or_else(|| find_item(&node.children, predicate))
    })
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO error. {0}")]
    Io(#[from] io::Error),
    #[error("Yaml error. {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Config file does not exist at `{0}`")]
    NoConfig(PathBuf),
}

pub fn read(path: PathBuf) -> Result<Shelf, Error> {
    if !path.exists() {
        return Err(Error::NoConfig(path));
    }

    let cfg = std::fs::read(&path)?;
    parse(&cfg)
}

pub fn parse(cfg: &[u8]) -> Result<Shelf, Error> {
    let mut cfg: serde_yaml::Value = serde_yaml::from_slice(cfg)?;
    cfg.apply_merge()?;
    let cfg: Shelf = serde_yaml::from_value(cfg)?;

    Ok(cfg)
}
