use indexmap::IndexMap;
use shelf_cfg::{EmulatorConfig, MediaItem};

use crate::chain::NodeLevel;

/// Computes the environment variables a title is launched with.
///
/// Emulator variables come first, then those of the nearest node in `chain`
/// (nearest ancestor first) which defines any, and the item's own variables last.
/// Only one node level contributes. Later levels overwrite keys of earlier ones.
pub fn resolve(
    item: &MediaItem,
    chain: &[NodeLevel],
    emulator: Option<&EmulatorConfig>,
) -> IndexMap<String, String> {
    let mut env = IndexMap::new();

    if let Some(emulator) = emulator {
        apply(&mut env, &emulator.env);
    }

    if let Some(node) = chain.iter().find(|n| !n.env.is_empty()) {
        apply(&mut env, &node.env);
    }

    apply(&mut env, &item.env);

    env
}

fn apply(env: &mut IndexMap<String, String>, overrides: &IndexMap<String, String>) {
    for (key, value) in overrides {
        let key = key.trim();
        if key.is_empty() {
            continue;
        }

        env.insert(key.to_owned(), value.trim().to_owned());
    }
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use shelf_cfg::{EmulatorConfig, MediaItem, TriState};

    use super::resolve;
    use crate::chain::NodeLevel;

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    }

    fn level(id: &str, env: &[(&str, &str)]) -> NodeLevel {
        NodeLevel {
            id: id.into(),
            wrappers: TriState::Inherit,
            env: map(env),
            default_emulator_id: None,
        }
    }

    fn emulator(env: &[(&str, &str)]) -> EmulatorConfig {
        EmulatorConfig {
            id: "emu".into(),
            path: "/usr/bin/emu".into(),
            env: map(env),
            ..EmulatorConfig::default()
        }
    }

    fn item(env: &[(&str, &str)]) -> MediaItem {
        MediaItem {
            id: "item".into(),
            env: map(env),
            ..MediaItem::default()
        }
    }

    #[test]
    fn item_overwrites_node_overwrites_emulator() {
        let env = resolve(
            &item(&[("X", "3")]),
            &[level("n", &[("X", "2"), ("N", "n")])],
            Some(&emulator(&[("X", "1"), ("E", "e")])),
        );

        assert_eq!(env, map(&[("X", "3"), ("E", "e"), ("N", "n")]));
    }

    #[test]
    fn only_nearest_node_with_overrides_contributes() {
        let chain = [
            level("game-folder", &[]),
            level("platform", &[("A", "platform")]),
            level("root", &[("A", "root"), ("B", "root")]),
        ];

        let env = resolve(&item(&[]), &chain, None);

        assert_eq!(env, map(&[("A", "platform")]));
    }

    #[test]
    fn trims_and_drops_empty_keys() {
        let env = resolve(
            &item(&[("  KEY ", "  value with space "), ("   ", "dropped"), ("EMPTY", "")]),
            &[],
            None,
        );

        assert_eq!(env, map(&[("KEY", "value with space"), ("EMPTY", "")]));
    }

    #[test]
    fn is_deterministic() {
        let chain = [level("n", &[("B", "2"), ("A", "1")])];
        let emulator = emulator(&[("Z", "0")]);
        let item = item(&[("C", "3")]);

        let first = resolve(&item, &chain, Some(&emulator));
        let second = resolve(&item, &chain, Some(&emulator));

        assert_eq!(
            first.iter().collect::<Vec<_>>(),
            second.iter().collect::<Vec<_>>()
        );
        assert_eq!(first.keys().collect::<Vec<_>>(), ["Z", "B", "A", "C"]);
    }
}
