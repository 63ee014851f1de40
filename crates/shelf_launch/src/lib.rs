use std::path::{Path, PathBuf};

pub use chain::NodeLevel;
pub use launch::{Error as LaunchError, Launcher, Outcome};
pub use plan::LaunchPlan;
pub use prefix::{Fs, PrefixPaths, Probe};
pub use runtime::RuntimeKind;
pub use snapshot::{Error as SnapshotError, Snapshot};

mod chain;
mod command;
mod compose;
mod environment;
mod launch;
mod plan;
mod prefix;
mod runtime;
mod snapshot;
mod template;
mod wrappers;

#[derive(Debug)]
pub struct Paths {
    /// Parent of the default per-title prefixes.
    pub prefixes: PathBuf,
}

impl Paths {
    #[must_use]
    pub fn new(data_home: &Path) -> Self {
        Self {
            prefixes: data_home.join("prefixes"),
        }
    }
}
