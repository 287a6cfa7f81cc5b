//! Layer-size specifications and layers.
//!
//! A [`LayerSpec`] fixes the shape of every network in a run: the number of
//! nodes per layer, input layer first. Networks built from equal specs have
//! identical node and edge identities, so their weights can be compared and
//! bred edge by edge.

use serde::{Deserialize, Serialize};
use slotmap::SlotMap;

use crate::config::ConfigError;
use crate::gene::{Node, NodeId};
use crate::identity::{MAX_LAYER_COUNT, MAX_LAYER_WIDTH};

/// Validated layer-size specification.
///
/// Guarantees at least two layers, no empty layer, and sizes small enough
/// for every node to have a 16-bit depth and index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct LayerSpec {
    sizes: Vec<usize>,
}

impl LayerSpec {
    /// Validate a list of layer sizes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::TooFewLayers`], [`ConfigError::TooManyLayers`],
    /// [`ConfigError::EmptyLayer`] or [`ConfigError::LayerTooWide`].
    pub fn new(sizes: Vec<usize>) -> Result<Self, ConfigError> {
        if sizes.len() < 2 {
            return Err(ConfigError::TooFewLayers(sizes.len()));
        }
        if sizes.len() > MAX_LAYER_COUNT {
            return Err(ConfigError::TooManyLayers(sizes.len()));
        }
        for (depth, &size) in sizes.iter().enumerate() {
            if size == 0 {
                return Err(ConfigError::EmptyLayer(depth));
            }
            if size > MAX_LAYER_WIDTH {
                return Err(ConfigError::LayerTooWide { depth, size });
            }
        }
        Ok(Self { sizes })
    }

    /// Node count of every layer, input first.
    #[must_use]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of layers.
    #[must_use]
    pub fn depth_count(&self) -> usize {
        self.sizes.len()
    }

    /// Nodes in the input layer.
    #[must_use]
    pub fn input_size(&self) -> usize {
        self.sizes[0]
    }

    /// Nodes in the output layer.
    #[must_use]
    pub fn output_size(&self) -> usize {
        self.sizes[self.sizes.len() - 1]
    }

    /// Total nodes across all layers.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.sizes.iter().sum()
    }

    /// Total edges of a fully connected layered network.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.sizes.windows(2).map(|pair| pair[0] * pair[1]).sum()
    }
}

impl TryFrom<Vec<usize>> for LayerSpec {
    type Error = ConfigError;

    fn try_from(sizes: Vec<usize>) -> Result<Self, Self::Error> {
        Self::new(sizes)
    }
}

impl From<LayerSpec> for Vec<usize> {
    fn from(spec: LayerSpec) -> Self {
        spec.sizes
    }
}

impl std::fmt::Display for LayerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.sizes.iter().map(ToString::to_string).collect();
        write!(f, "[{}]", parts.join("-"))
    }
}

/// The nodes at one depth of a network.
///
/// Holds keys into the owning network's node arena. The node list is fixed
/// once the network is built.
#[derive(Debug, Clone)]
pub struct Layer {
    /// 0 for the input layer.
    pub depth: u16,
    /// Node keys in intra-layer index order.
    pub nodes: Vec<NodeId>,
}

impl Layer {
    /// Create an empty layer at `depth`.
    #[must_use]
    pub fn new(depth: u16, capacity: usize) -> Self {
        Self {
            depth,
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the layer has no nodes. Never true for a built network.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Zero the activation of every node in the layer.
    pub fn reset(&self, arena: &mut SlotMap<NodeId, Node>) {
        for &id in &self.nodes {
            arena[id].reset();
        }
    }

    /// Same depth and pairwise structurally equal nodes.
    #[must_use]
    pub fn structurally_eq(
        &self,
        arena: &SlotMap<NodeId, Node>,
        other: &Layer,
        other_arena: &SlotMap<NodeId, Node>,
    ) -> bool {
        self.depth == other.depth
            && self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(&other.nodes)
                .all(|(&a, &b)| arena[a].structurally_eq(&other_arena[b]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_accessors() {
        let spec = LayerSpec::new(vec![3, 5, 2]).unwrap();
        assert_eq!(spec.depth_count(), 3);
        assert_eq!(spec.input_size(), 3);
        assert_eq!(spec.output_size(), 2);
        assert_eq!(spec.node_count(), 10);
        assert_eq!(spec.edge_count(), 3 * 5 + 5 * 2);
        assert_eq!(spec.to_string(), "[3-5-2]");
    }

    #[test]
    fn test_spec_validation() {
        assert_eq!(LayerSpec::new(vec![]), Err(ConfigError::TooFewLayers(0)));
        assert_eq!(LayerSpec::new(vec![2]), Err(ConfigError::TooFewLayers(1)));
        assert_eq!(LayerSpec::new(vec![2, 0]), Err(ConfigError::EmptyLayer(1)));
        assert!(matches!(
            LayerSpec::new(vec![MAX_LAYER_WIDTH + 1, 1]),
            Err(ConfigError::LayerTooWide { depth: 0, .. })
        ));
    }

    #[test]
    fn test_spec_serde_validates() {
        let spec: LayerSpec = serde_json::from_str("[2, 3, 1]").unwrap();
        assert_eq!(spec.sizes(), &[2, 3, 1]);
        assert!(serde_json::from_str::<LayerSpec>("[2]").is_err());
    }

    #[test]
    fn test_layer_reset() {
        let mut arena: SlotMap<NodeId, Node> = SlotMap::with_key();
        let mut layer = Layer::new(0, 2);
        for i in 0..2 {
            let mut node = Node::new(i, 0);
            node.activation = 0.7;
            layer.nodes.push(arena.insert(node));
        }
        layer.reset(&mut arena);
        assert!(layer.nodes.iter().all(|&id| arena[id].activation == 0.0));
        assert_eq!(layer.len(), 2);
    }
}
