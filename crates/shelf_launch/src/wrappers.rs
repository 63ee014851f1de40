use shelf_cfg::{EmulatorConfig, LaunchWrapper, MediaItem, TriState};

use crate::chain::NodeLevel;

/// Resolves the ordered list of wrappers a title is launched through, outermost
/// first.
///
/// * An item which does not inherit decides alone.
/// * Otherwise the base is the emulator's list, or `defaults` when there is no
///   emulator or it inherits.
/// * The nearest node (in `chain`, nearest ancestor first) which does not inherit
///   either clears everything, or puts its wrappers in front of the base.
pub fn resolve(
    item: &MediaItem,
    chain: &[NodeLevel],
    emulator: Option<&EmulatorConfig>,
    defaults: &[LaunchWrapper],
) -> Vec<LaunchWrapper> {
    if let Some(wrappers) = item.wrappers.explicit() {
        return wrappers.to_vec();
    }

    let base = emulator
        .and_then(|e| e.wrappers.explicit())
        .unwrap_or(defaults);

    match TriState::first_explicit(chain.iter().map(|n| &n.wrappers)) {
        None => base.to_vec(),
        Some([]) => Vec::new(),
        Some(node) => node.iter().chain(base).cloned().collect(),
    }
}
