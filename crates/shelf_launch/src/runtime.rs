use indexmap::IndexMap;
use serde::Serialize;

/// The execution environment a title ends up running in.
#[derive(Serialize, Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "kebab-case")]
pub enum RuntimeKind {
    Native,
    Wine,
    Proton,
    Umu,
}

impl RuntimeKind {
    /// Wine, Proton and UMU all need a prefix.
    #[must_use]
    pub fn needs_prefix(self) -> bool {
        self != RuntimeKind::Native
    }

    /// Proton and UMU share the `STEAM_COMPAT_DATA_PATH` convention.
    #[must_use]
    pub fn is_proton(self) -> bool {
        matches!(self, RuntimeKind::Proton | RuntimeKind::Umu)
    }
}

impl std::fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RuntimeKind::Native => "native",
            RuntimeKind::Wine => "wine",
            RuntimeKind::Proton => "proton",
            RuntimeKind::Umu => "umu",
        })
    }
}

/// Guesses the runtime from the resolved environment and the paths of the
/// programs involved in the launch (emulator or launcher, and wrappers).
///
/// There is no authoritative source for this, so explicit environment keys
/// (`UMU_*`, `PROTONPATH`, `STEAM_COMPAT_DATA_PATH`, `WINEPREFIX`) always take
/// effect, and path names are matched case-insensitively.
pub fn detect<'a>(
    env: &IndexMap<String, String>,
    hints: impl IntoIterator<Item = &'a str> + Clone,
    prefix_configured: bool,
) -> RuntimeKind {
    let hinted = |needle: &str| {
        hints
            .clone()
            .into_iter()
            .any(|hint| hint.to_lowercase().contains(needle))
    };

    if env.keys().any(|k| k.starts_with("UMU_")) || hinted("umu") {
        RuntimeKind::Umu
    } else if env.contains_key("PROTONPATH")
        || env.contains_key("STEAM_COMPAT_DATA_PATH")
        || hinted("proton")
    {
        RuntimeKind::Proton
    } else if prefix_configured || env.contains_key("WINEPREFIX") || hinted("wine") {
        RuntimeKind::Wine
    } else {
        RuntimeKind::Native
    }
}
