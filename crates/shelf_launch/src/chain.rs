use indexmap::IndexMap;
use shelf_cfg::{LaunchWrapper, MediaNode, TriState};

/// The overrides a single library node contributes to a launch, copied out of the
/// tree so that resolution never touches the live library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLevel {
    pub id: String,
    pub wrappers: TriState<LaunchWrapper>,
    pub env: IndexMap<String, String>,
    pub default_emulator_id: Option<String>,
}

impl From<&MediaNode> for NodeLevel {
    fn from(node: &MediaNode) -> Self {
        Self {
            id: node.id.clone(),
            wrappers: node.wrappers.clone(),
            env: node.env.clone(),
            default_emulator_id: node.default_emulator_id.clone(),
        }
    }
}

/// Returns the nodes from a root of `forest` down to the node with id `target`,
/// both inclusive. A node which is not part of the forest has no ancestry, so the
/// result is empty.
pub fn walk<'a>(forest: &'a [MediaNode], target: &str) -> Vec<&'a MediaNode> {
    let mut chain = Vec::new();
    match descend(forest, target, &mut chain) {
        true => chain,
        false => Vec::new(),
    }
}

fn descend<'a>(nodes: &'a [MediaNode], target: &str, chain: &mut Vec<&'a MediaNode>) -> bool {
    for node in nodes {
        chain.push(node);
        if node.id == target || descend(&node.children, target, chain) {
            return true;
        }
        chain.pop();
    }

    false
}
