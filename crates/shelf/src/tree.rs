use std::fmt;

use shelf_cfg::{MediaNode, MediaType};

/// The library forest, one node or item per line.
pub struct Tree<'a>(pub &'a [MediaNode]);

impl fmt::Display for Tree<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in self.0 {
            node_lines(f, node, 0)?;
        }
        Ok(())
    }
}

fn node_lines(f: &mut fmt::Formatter<'_>, node: &MediaNode, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node.name.as_deref() {
        Some(name) => writeln!(f, "{indent}{name} ({})", node.id)?,
        None => writeln!(f, "{indent}{}", node.id)?,
    }

    for child in &node.children {
        node_lines(f, child, depth + 1)?;
    }

    for item in &node.items {
        let kind = match item.media_type {
            MediaType::Native => "",
            MediaType::Emulator => " [emulator]",
        };
        writeln!(f, "{indent}  - {}: {}{kind}", item.id, item.title)?;
    }

    Ok(())
}
