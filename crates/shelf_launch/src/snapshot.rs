use std::{
    borrow::Cow,
    env::VarError,
    io,
    path::{Path, PathBuf},
};

use log::debug;
use path_absolutize::Absolutize;
use shelf_cfg::{EmulatorConfig, LaunchWrapper, MediaItem, MediaType, Shelf};

use crate::{
    chain::{self, NodeLevel},
    Paths,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Item `{0}` not found in the library.")]
    ItemNotFound(String),
    #[error("Unable to expand path. {0}")]
    Expand(#[from] shellexpand::LookupError<VarError>),
    #[error("Unable to resolve path. {0}")]
    Io(#[from] io::Error),
}

/// Everything needed to resolve the launch of one item, copied out of the library
/// and settings. Resolution only ever reads a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub item: MediaItem,
    /// Ancestors of the item's node, nearest first.
    pub chain: Vec<NodeLevel>,
    pub emulator: Option<EmulatorConfig>,
    pub default_wrappers: Vec<LaunchWrapper>,
    /// Resolved primary file, if the item has any.
    pub file: Option<PathBuf>,
    pub prefix_root: PathBuf,
    pub working_dir: Option<PathBuf>,
}

impl Snapshot {
    /// Copies item `key` (an id or a title) from `shelf`, choosing disc `disc` as
    /// the primary file when given.
    pub fn capture(
        shelf: &Shelf,
        paths: &Paths,
        key: &str,
        disc: Option<u32>,
    ) -> Result<Self, Error> {
        let (node, item) = shelf
            .find_item(key)
            .ok_or_else(|| Error::ItemNotFound(key.to_owned()))?;

        let chain = chain::walk(&shelf.library, &node.id)
            .into_iter()
            .rev()
            .map(NodeLevel::from)
            .collect::<Vec<_>>();

        let emulator = effective_emulator(shelf, item, &chain).cloned();

        let settings = &shelf.settings;
        let library_root = settings
            .library_root
            .as_deref()
            .map(expand)
            .transpose()?;

        let file = item
            .primary_file(disc)
            .map(|f| {
                resolve_file(
                    &f.path,
                    library_root.as_deref(),
                    settings.prefer_portable_launch_paths,
                )
            })
            .transpose()?;

        let prefix_root = match non_empty(item.prefix_path.as_deref()) {
            Some(prefix) => expand(prefix)?,
            None => {
                let prefixes = match non_empty(settings.prefixes.as_deref()) {
                    Some(prefixes) => expand(prefixes)?,
                    None => paths.prefixes.clone(),
                };
                prefixes.join(sanitize_directory_name(&item.title))
            }
        };

        let working_dir = non_empty(item.working_directory.as_deref())
            .map(expand)
            .transpose()?;

        Ok(Self {
            item: item.clone(),
            chain,
            emulator,
            default_wrappers: settings.default_wrappers.clone(),
            file,
            prefix_root,
            working_dir,
        })
    }
}

/// Only emulator titles have an emulator. The item's own id wins, an item with a
/// manual launcher has none, otherwise the nearest node default applies. Ids of
/// deleted profiles resolve to no emulator.
fn effective_emulator<'a>(
    shelf: &'a Shelf,
    item: &MediaItem,
    chain: &[NodeLevel],
) -> Option<&'a EmulatorConfig> {
    if item.media_type != MediaType::Emulator {
        return None;
    }

    let id = match non_empty(item.emulator_id.as_deref()) {
        Some(id) => id,
        None if non_empty(item.launcher_path.as_deref()).is_some() => return None,
        None => chain
            .iter()
            .find_map(|n| non_empty(n.default_emulator_id.as_deref()))?,
    };

    let emulator = shelf.emulator(id);
    if emulator.is_none() {
        debug!("Emulator `{id}` of `{}` does not exist, ignoring it", item.id);
    }

    emulator
}

fn resolve_file(path: &str, library_root: Option<&Path>, portable: bool) -> Result<PathBuf, Error> {
    let path = expand(path)?;

    let path = match library_root {
        Some(root) if path.is_relative() => root.join(path),
        _ => path,
    };

    Ok(match portable {
        true => path,
        false => path.absolutize()?.into_owned(),
    })
}

fn expand(path: &str) -> Result<PathBuf, Error> {
    let path = shellexpand::full(path.trim())?;
    Ok(PathBuf::from(Cow::into_owned(path)))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn sanitize_directory_name(dir_name: &str) -> String {
    static ILLEGAL: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    dir_name
        .chars()
        .filter(|&c| !ILLEGAL.contains(&c))
        .collect()
}
