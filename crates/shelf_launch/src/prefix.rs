use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, warn};
use serde::Serialize;

use crate::runtime::RuntimeKind;

const PFX: &str = "pfx";
const DRIVE_C: &str = "drive_c";

/// Read-only view of the filesystem used to recognize existing prefix layouts.
pub trait Probe {
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`Probe`] backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fs;

impl Probe for Fs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Directories a wine-based runtime operates on.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct PrefixPaths {
    /// `STEAM_COMPAT_DATA_PATH` for Proton and UMU.
    pub compat_data: PathBuf,
    /// `WINEPREFIX`, the directory containing `drive_c`.
    pub wine_prefix: PathBuf,
}

impl PrefixPaths {
    /// Maps a configured prefix root onto the layout `kind` expects.
    ///
    /// Tolerates roots pointing at `<root>`, `<root>/pfx` or `<root>/pfx/drive_c`,
    /// and prefixes created with the legacy `<root>/drive_c` layout.
    #[must_use]
    pub fn resolve(root: &Path, kind: RuntimeKind, probe: &impl Probe) -> Self {
        let root = match is_leaf(root, DRIVE_C) {
            true => parent(root),
            false => root,
        };

        let pfx = root.join(PFX);
        let pfx_leaf = is_leaf(root, PFX);

        let (compat_data, wine_prefix) = match kind {
            RuntimeKind::Native => (root.to_path_buf(), root.to_path_buf()),
            RuntimeKind::Umu if pfx_leaf => (parent(root).to_path_buf(), parent(root).to_path_buf()),
            RuntimeKind::Umu => (root.to_path_buf(), root.to_path_buf()),
            RuntimeKind::Proton | RuntimeKind::Wine if pfx_leaf => {
                (parent(root).to_path_buf(), root.to_path_buf())
            }
            RuntimeKind::Proton => {
                let legacy = probe.is_dir(&root.join(DRIVE_C)) && !probe.is_dir(&pfx);
                match legacy {
                    true => (root.to_path_buf(), root.to_path_buf()),
                    false => (root.to_path_buf(), pfx),
                }
            }
            RuntimeKind::Wine => {
                let nested = !probe.is_dir(&root.join(DRIVE_C)) && probe.is_dir(&pfx.join(DRIVE_C));
                match nested {
                    true => (root.to_path_buf(), pfx),
                    false => (root.to_path_buf(), root.to_path_buf()),
                }
            }
        };

        Self {
            compat_data,
            wine_prefix,
        }
    }

    /// Whether wine has already populated the prefix.
    #[must_use]
    pub fn is_initialized(&self, probe: &impl Probe) -> bool {
        probe.is_dir(&self.wine_prefix.join(DRIVE_C))
    }

    /// Creates the prefix directories if they are missing.
    ///
    /// Failures are only logged, the runtime may still be able to create them.
    pub fn ensure(&self) {
        for dir in [&self.compat_data, &self.wine_prefix] {
            if dir.is_dir() {
                continue;
            }

            debug!("Creating prefix directory {}", dir.display());
            if let Err(e) = fs::create_dir_all(dir) {
                warn!("Unable to create prefix directory {}. {e}", dir.display());
            }
        }
    }
}

fn is_leaf(path: &Path, name: &str) -> bool {
    path.file_name()
        .is_some_and(|leaf| leaf.eq_ignore_ascii_case(name))
}

fn parent(path: &Path) -> &Path {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(path)
}
