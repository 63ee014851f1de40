use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::debug;
use path_absolutize::Absolutize;
use serde::Serialize;
use shelf_cfg::{EmulatorConfig, MediaItem, MediaType};

use crate::{
    compose::compose,
    environment,
    prefix::{PrefixPaths, Probe},
    runtime::{self, RuntimeKind},
    snapshot::Snapshot,
    template::{self, combine, expand, quote, references_file, render, FileParts, Placeholder},
    wrappers,
};

/// The fully resolved launch of a title.
///
/// Both the preview and the spawned process are derived from a plan, so what is
/// shown is what runs.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub runtime: RuntimeKind,
    pub prefix: Option<PrefixPaths>,
    /// The prefix has no `drive_c` yet and will be created by the runtime.
    pub initialize_prefix: bool,
    /// Variables set on top of the inherited process environment.
    pub env: IndexMap<String, String>,
    pub working_dir: Option<PathBuf>,
    pub file_dir: Option<PathBuf>,
    pub command_line: String,
    pub argv: Vec<String>,
}

/// What ultimately runs inside the wrappers.
enum Target<'a> {
    /// The file itself.
    Native,
    Emulator(&'a EmulatorConfig),
    /// An item-specific launcher without an emulator profile.
    Manual(&'a str),
}

impl<'a> Target<'a> {
    fn of(snapshot: &'a Snapshot) -> Self {
        if let Some(emulator) = &snapshot.emulator {
            return Target::Emulator(emulator);
        }

        match snapshot.item.launcher_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() && snapshot.item.media_type == MediaType::Emulator => {
                Target::Manual(path)
            }
            _ => Target::Native,
        }
    }

    fn program(&self) -> Option<&'a str> {
        match self {
            Target::Native => None,
            Target::Emulator(emulator) => Some(emulator.path.trim()),
            Target::Manual(path) => Some(*path),
        }
    }

    /// The inner command, before wrapping.
    fn command(&self, item: &MediaItem, file: Option<&FileParts>) -> Vec<String> {
        let args = item.launcher_args.as_deref().unwrap_or_default();

        let (program, template) = match self {
            Target::Native => {
                let Some(file) = file else {
                    return Vec::new();
                };
                (file.path.as_str(), template::strip_native_file(args).to_owned())
            }
            Target::Emulator(emulator) => (emulator.path.trim(), combine(&emulator.arguments, args)),
            Target::Manual(path) => {
                let template = match args.trim() {
                    "" => Placeholder::File.token(),
                    args => args,
                };
                (*path, template.to_owned())
            }
        };

        let template = match self {
            Target::Emulator(_) | Target::Manual(_) if !references_file(&template) => {
                format!("{template} {}", Placeholder::File.token())
            }
            _ => template,
        };

        std::iter::once(program)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .chain(expand(&template, file))
            .collect()
    }
}

impl LaunchPlan {
    /// Resolves `snapshot` into a plan. Pure apart from `probe`, which is only
    /// asked whether prefix directories exist.
    #[must_use]
    pub fn recompute(snapshot: &Snapshot, probe: &impl Probe) -> Self {
        let item = &snapshot.item;
        let emulator = snapshot.emulator.as_ref();

        let mut env = environment::resolve(item, &snapshot.chain, emulator);
        let wrappers = wrappers::resolve(
            item,
            &snapshot.chain,
            emulator,
            &snapshot.default_wrappers,
        );

        let file_dir = snapshot
            .file
            .as_deref()
            .and_then(Path::parent)
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf);
        let working_dir = snapshot.working_dir.clone().or_else(|| file_dir.clone());

        let file = snapshot
            .file
            .as_deref()
            .map(|f| launch_path(f, working_dir.as_deref(), file_dir.as_deref()))
            .map(|f| FileParts::new(&f));
        let target = Target::of(snapshot);

        let hints = target
            .program()
            .into_iter()
            .chain(wrappers.iter().map(|w| w.path.trim()))
            .collect::<Vec<_>>();
        let prefix_configured = item
            .prefix_path
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());

        let runtime = runtime::detect(&env, hints.iter().copied(), prefix_configured);

        let prefix = runtime
            .needs_prefix()
            .then(|| PrefixPaths::resolve(&snapshot.prefix_root, runtime, probe));
        let initialize_prefix = prefix.as_ref().is_some_and(|p| !p.is_initialized(probe));

        if let Some(prefix) = &prefix {
            env.entry("WINEPREFIX".to_owned())
                .or_insert_with(|| prefix.wine_prefix.to_string_lossy().into_owned());

            if runtime.is_proton() {
                env.entry("STEAM_COMPAT_DATA_PATH".to_owned())
                    .or_insert_with(|| prefix.compat_data.to_string_lossy().into_owned());
            }

            if let Some(arch) = item.wine_arch.filter(|_| initialize_prefix) {
                env.entry("WINEARCH".to_owned())
                    .or_insert_with(|| arch.to_string());
            }
        }

        let inner = target.command(item, file.as_ref());
        let argv = compose(inner, &wrappers, file.as_ref());
        let command_line = render(&argv);

        debug!(
            "Resolved `{}`: runtime {runtime}, {} wrapper(s), {} env var(s)",
            item.id,
            wrappers.len(),
            env.len()
        );

        Self {
            runtime,
            prefix,
            initialize_prefix,
            env,
            working_dir,
            file_dir,
            command_line,
            argv,
        }
    }

    /// Renders the plan as `> [cd <dir> &&] [ENV=value ...] <command>`.
    #[must_use]
    pub fn preview(&self) -> String {
        let mut parts = vec![">".to_owned()];

        if let Some(dir) = self
            .working_dir
            .as_ref()
            .filter(|dir| Some(*dir) != self.file_dir.as_ref())
        {
            parts.push(format!("cd {} &&", quote(&dir.to_string_lossy())));
        }

        for (key, value) in &self.env {
            parts.push(format!("{key}={}", quote(value)));
        }

        parts.push(self.command_line.clone());

        parts.join(" ")
    }
}

/// The process starts in `working_dir`, so a relative file is rebased onto it.
/// Files started from their own directory are referred to as `./<name>`, which
/// keeps portable paths relative.
fn launch_path(file: &Path, working_dir: Option<&Path>, file_dir: Option<&Path>) -> PathBuf {
    if file.is_absolute() {
        return file.to_path_buf();
    }

    match working_dir {
        Some(dir) if Some(dir) != file_dir => file
            .absolutize()
            .map_or_else(|_| file.to_path_buf(), Cow::into_owned),
        _ => Path::new(".").join(file.file_name().unwrap_or(file.as_os_str())),
    }
}
