use serde::{Deserialize, Serialize};

/// One country, region or town in a provider's area hierarchy. The root of a
/// tree is the country the provider searches by default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionNode {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub children: Vec<RegionNode>,
}

impl RegionNode {
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RegionNode>) -> Self {
        self.children = children;
        self
    }

    /// Total number of nodes in this subtree, the node itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RegionNode::node_count).sum::<usize>()
    }
}
