use log::debug;

use crate::models::region::RegionNode;

/// Looks `name` up in the tree under `root` and returns its area ID, or
/// `root.id` (the whole country) when nothing matches.
///
/// Matching is exact after trimming and case folding. Regions directly under
/// the root are checked before any town, and within a level the first node
/// in tree order wins, so a town name shared by two regions resolves to the
/// one listed first.
pub fn resolve(name: &str, root: &RegionNode) -> u64 {
    let wanted = name.trim().to_lowercase();
    let matches = |node: &&RegionNode| node.name.to_lowercase() == wanted;

    let found = root
        .children
        .iter()
        .find(matches)
        .or_else(|| root.children.iter().flat_map(|region| &region.children).find(matches));

    match found {
        Some(node) => {
            debug!("resolved '{}' to area {}", name, node.id);
            node.id
        }
        None => {
            debug!("'{}' not found, falling back to {} ({})", name, root.name, root.id);
            root.id
        }
    }
}
